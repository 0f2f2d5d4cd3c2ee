use bon::bon;
use num::{Integer, One, Zero};
use tracing::{debug, trace};

use crate::again::{contains_again, replace_agains, AgainEnd, Item};
use crate::mapping::OutcomeMap;
use crate::util::accumulate;
use crate::{Die, Error, Map, Result, Weight};

#[bon]
impl Die {
    /// Builds a die from outcomes, nested dice and sentinels.
    ///
    /// Nested dice are flattened so that each item carries the same total
    /// weight (times its multiplicity). `Item::Reroll` drops its share of the
    /// mass. Items containing `Again` are expanded `again_depth` times before
    /// `again_end` is substituted; without an explicit end the zero of the
    /// non-recursive part is used.
    #[builder]
    pub fn construct(
        #[builder(start_fn)] items: Vec<Item>,
        multiplicities: Option<Vec<u64>>,
        #[builder(default = 1)] again_depth: u32,
        #[builder(into)] again_end: Option<AgainEnd>,
    ) -> Result<Die> {
        let times = match multiplicities {
            Some(times) if times.len() != items.len() => {
                return Err(Error::MultiplicityMismatch {
                    expected: items.len(),
                    actual: times.len(),
                })
            }
            Some(times) => times.into_iter().map(Weight::from).collect(),
            None => vec![Weight::one(); items.len()],
        };
        Self::build(&items, &times, again_depth, again_end)
    }
}

impl Die {
    /// Shortcut for [`Die::construct`] with default options.
    pub fn new<I, T>(items: I) -> Result<Die>
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        Self::construct(items.into_iter().map(Into::into).collect()).call()
    }

    pub(crate) fn build(
        items: &[Item],
        times: &[Weight],
        again_depth: u32,
        again_end: Option<AgainEnd>,
    ) -> Result<Die> {
        if !contains_again(items) {
            return canonicalize(items, times);
        }

        let end = match again_end {
            Some(end) => end,
            None => {
                let probe = canonicalize(&replace_agains(items, &AgainEnd::Reroll)?, times)?;
                if probe.is_empty() {
                    return Err(Error::UnresolvableAgain);
                }
                AgainEnd::Die(probe.zero()?.simplify())
            }
        };

        debug!(depth = again_depth, items = items.len(), "expanding Again");
        let mut tail = canonicalize(&replace_agains(items, &end)?, times)?;
        for level in 0..again_depth {
            trace!(level, outcomes = tail.len(), "Again level");
            tail = canonicalize(&replace_agains(items, &AgainEnd::Die(tail))?, times)?;
        }
        Ok(tail)
    }
}

/// Flattens items with no `Again` left into a single mapping.
fn canonicalize(items: &[Item], times: &[Weight]) -> Result<Die> {
    if let ([Item::Die(die)], [t]) = (items, times) {
        if t.is_one() {
            return Ok(die.clone());
        }
    }

    let lcm = items
        .iter()
        .filter_map(|item| match item {
            Item::Die(die) if !die.denominator().is_zero() => Some(die.denominator()),
            _ => None,
        })
        .fold(Weight::one(), |acc, d| acc.lcm(d));

    let mut map = Map::new();
    for (item, t) in items.iter().zip(times) {
        match item {
            Item::Outcome(outcome) => accumulate(&mut map, outcome.clone(), &lcm * t),
            Item::Die(die) => {
                let factor = if die.denominator().is_zero() {
                    Weight::zero()
                } else {
                    &lcm / die.denominator() * t
                };
                for (outcome, weight) in die {
                    accumulate(&mut map, outcome.clone(), weight * &factor);
                }
            }
            Item::Reroll => {}
            Item::Again(_) => return Err(Error::AgainNotAllowed("canonical construction")),
        }
    }
    Ok(Die::from_map(OutcomeMap::new(map)))
}
