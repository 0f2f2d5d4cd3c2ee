use std::collections::BTreeSet;
use std::fmt::Debug;

use bon::bon;
use num::pow;

use super::compare::ensure_comparable;
use crate::again::{Again, AgainEnd, Item};
use crate::mapping::OutcomeMap;
use crate::ops::BinaryOp;
use crate::util::accumulate;
use crate::{Die, Map, Outcome, Result, Weight, DEFAULT_EXPLODE_DEPTH};

/// Selects outcomes of a die for [`Die::reroll`], [`Die::filter`] and
/// [`Die::explode`].
pub enum Which<'w> {
    Min,
    Max,
    Outcomes(BTreeSet<Outcome>),
    Matching(Box<dyn Fn(&Outcome) -> bool + 'w>),
}

impl<'w> Which<'w> {
    #[must_use]
    pub fn outcomes<I, T>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Outcome>,
    {
        Which::Outcomes(outcomes.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn matching<F>(f: F) -> Self
    where
        F: Fn(&Outcome) -> bool + 'w,
    {
        Which::Matching(Box::new(f))
    }

    fn mask(&self, outcomes: &[Outcome]) -> Vec<bool> {
        let n = outcomes.len();
        match self {
            Which::Min => (0..n).map(|i| i == 0).collect(),
            Which::Max => (0..n).map(|i| i + 1 == n).collect(),
            Which::Outcomes(set) => outcomes.iter().map(|x| set.contains(x)).collect(),
            Which::Matching(f) => outcomes.iter().map(|x| f(x)).collect(),
        }
    }
}

impl Default for Which<'_> {
    fn default() -> Self {
        Which::Min
    }
}

impl Debug for Which<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Which::Min => write!(f, "Min"),
            Which::Max => write!(f, "Max"),
            Which::Outcomes(set) => f.debug_tuple("Outcomes").field(set).finish(),
            Which::Matching(_) => write!(f, "Matching(..)"),
        }
    }
}

impl Die {
    /// Rerolls the selected outcomes.
    ///
    /// With `depth` unset the selected outcomes are removed outright. With
    /// `Some(k)` the die is rerolled at most `k` times and the last roll is
    /// kept whatever it shows.
    #[must_use]
    pub fn reroll(&self, which: Which<'_>, depth: Option<u32>) -> Die {
        let mask = which.mask(self.outcomes());
        let Some(depth) = depth else {
            let (outcomes, quantities): (Vec<_>, Vec<_>) = self
                .iter()
                .zip(&mask)
                .filter(|(_, selected)| !**selected)
                .map(|((o, w), _)| (o.clone(), w.clone()))
                .unzip();
            return Die::from_map(OutcomeMap::from_sorted(outcomes, quantities));
        };

        let denom = self.denominator();
        let rerolled: Weight = self
            .quantities()
            .iter()
            .zip(&mask)
            .filter(|(_, selected)| **selected)
            .map(|(w, _)| w)
            .sum();
        let k = depth as usize;
        let reroll_factor = pow(rerolled.clone(), k);
        let keep_factor: Weight = (0..=k)
            .map(|i| pow(denom.clone(), k - i) * pow(rerolled.clone(), i))
            .sum();

        let quantities = self
            .quantities()
            .iter()
            .zip(&mask)
            .map(|(w, &selected)| {
                if selected {
                    w * &reroll_factor
                } else {
                    w * &keep_factor
                }
            })
            .collect();
        Die::from_map(OutcomeMap::from_sorted(self.outcomes().to_vec(), quantities))
    }

    /// Rerolls everything except the selected outcomes.
    #[must_use]
    pub fn filter(&self, which: Which<'_>, depth: Option<u32>) -> Die {
        let mask = which.mask(self.outcomes());
        let kept: BTreeSet<Outcome> = self
            .outcomes()
            .iter()
            .zip(mask)
            .filter(|(_, selected)| *selected)
            .map(|(o, _)| o.clone())
            .collect();
        self.reroll(Which::matching(|x| !kept.contains(x)), depth)
    }

    /// Drops outcomes outside `[min, max]`.
    pub fn truncate(&self, min: Option<&Outcome>, max: Option<&Outcome>) -> Result<Die> {
        self.check_bounds("truncate", min, max)?;
        let outcomes = self.outcomes();
        let start = min.map_or(0, |m| outcomes.partition_point(|x| x < m));
        let stop = max.map_or(outcomes.len(), |m| outcomes.partition_point(|x| x <= m));
        if start >= stop {
            return Ok(Die::empty());
        }
        Ok(Die::from_map(OutcomeMap::from_sorted(
            outcomes[start..stop].to_vec(),
            self.quantities()[start..stop].to_vec(),
        )))
    }

    /// Moves outcomes outside `[min, max]` onto the nearest bound.
    pub fn clip(&self, min: Option<&Outcome>, max: Option<&Outcome>) -> Result<Die> {
        self.check_bounds("clip", min, max)?;
        let mut map = Map::new();
        for (outcome, weight) in self {
            let outcome = match (min, max) {
                (Some(m), _) if outcome <= m => m.clone(),
                (_, Some(m)) if outcome >= m => m.clone(),
                _ => outcome.clone(),
            };
            accumulate(&mut map, outcome, weight.clone());
        }
        Ok(Die::from_map(OutcomeMap::new(map)))
    }

    fn check_bounds(
        &self,
        op: &'static str,
        min: Option<&Outcome>,
        max: Option<&Outcome>,
    ) -> Result<()> {
        let (Ok(lo), Ok(hi)) = (self.min_outcome(), self.max_outcome()) else {
            return Ok(());
        };
        let bounds: Vec<&Outcome> = min.into_iter().chain(max).collect();
        ensure_comparable(op, &[lo, hi], &bounds)
    }
}

#[bon]
impl Die {
    /// Adds a fresh roll whenever a selected outcome comes up, at most
    /// `depth` times.
    #[builder]
    pub fn explode<'w>(
        &self,
        #[builder(default = Which::Max)] which: Which<'w>,
        #[builder(default = DEFAULT_EXPLODE_DEPTH)] depth: u32,
        #[builder(into)] end: Option<AgainEnd>,
    ) -> Result<Die> {
        if depth == 0 {
            return Ok(self.clone());
        }
        let mask = which.mask(self.outcomes());
        let items: Vec<Item> = self
            .outcomes()
            .iter()
            .zip(mask)
            .map(|(o, selected)| {
                if selected {
                    Item::Again(Again::new().binary_rev(BinaryOp::Add, o.clone()))
                } else {
                    Item::Outcome(o.clone())
                }
            })
            .collect();
        Die::build(&items, self.quantities(), depth, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_reroll_matches_repeated_single_rerolls() {
        let die = Die::from_weights([(1, 1u32), (2, 2), (3, 3)]);
        let twice = die.reroll(Which::Min, Some(2));
        // P(1) = (1/6)^3, P(2) = 2/6 * (1 + 1/6 + 1/36)
        assert_eq!(
            twice.quantities().to_vec(),
            vec![Weight::from(1u32), Weight::from(86u32), Weight::from(129u32)]
        );
        assert_eq!(twice.denominator(), &Weight::from(216u32));
    }

    #[test]
    fn zero_depth_is_identity() {
        let die = Die::numeric(4);
        assert_eq!(die.reroll(Which::Max, Some(0)), die);
        assert_eq!(die.reroll(Which::Max, None), Die::numeric(3));
    }
}
