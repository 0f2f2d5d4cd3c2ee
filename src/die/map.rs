use std::collections::BTreeMap;
use std::fmt::Debug;

use bon::bon;
use num::Zero;
use tracing::{debug, trace};

use crate::again::{AgainEnd, Item};
use crate::markov::AbsorbingChain;
use crate::ops::BinaryOp;
use crate::{Die, Error, Outcome, Result};

type ReplFn<'r> = Box<dyn Fn(&Outcome) -> Result<Item> + 'r>;

/// Replacement rule for [`Die::map`].
pub enum Repl<'r> {
    Func(ReplFn<'r>),
    /// Outcomes missing from the table map to themselves.
    Table(BTreeMap<Outcome, Item>),
}

impl<'r> Repl<'r> {
    #[must_use]
    pub fn new<F, T>(f: F) -> Self
    where
        F: Fn(&Outcome) -> T + 'r,
        T: Into<Item>,
    {
        Repl::Func(Box::new(move |x| Ok(f(x).into())))
    }

    #[must_use]
    pub fn try_new<F>(f: F) -> Self
    where
        F: Fn(&Outcome) -> Result<Item> + 'r,
    {
        Repl::Func(Box::new(f))
    }

    #[must_use]
    pub fn table<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Outcome>,
        V: Into<Item>,
    {
        Repl::Table(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn apply(&self, outcome: &Outcome) -> Result<Item> {
        match self {
            Repl::Func(f) => f(outcome),
            Repl::Table(table) => Ok(table
                .get(outcome)
                .cloned()
                .unwrap_or_else(|| Item::Outcome(outcome.clone()))),
        }
    }
}

impl Debug for Repl<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Repl::Func(_) => write!(f, "Func(..)"),
            Repl::Table(table) => f.debug_tuple("Table").field(table).finish(),
        }
    }
}

/// How many times [`Die::map`] applies its replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Times(u32),
    /// Until the distribution stops changing.
    FixedPoint,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Times(1)
    }
}

impl From<u32> for Repeat {
    fn from(value: u32) -> Self {
        Repeat::Times(value)
    }
}

#[bon]
impl Die {
    /// Replaces every outcome through `repl` and rebuilds the die, keeping
    /// each outcome's weight for its replacement.
    ///
    /// `again_depth` (default 1) and `again_end` only apply to
    /// [`Repeat::Times`]; setting either with [`Repeat::FixedPoint`] is an
    /// error since that mode does not accept `Again`.
    #[builder]
    pub fn map<'r>(
        &self,
        #[builder(start_fn)] repl: Repl<'r>,
        #[builder(default, into)] repeat: Repeat,
        again_depth: Option<u32>,
        #[builder(into)] again_end: Option<AgainEnd>,
    ) -> Result<Die> {
        match repeat {
            Repeat::Times(times) => {
                let again_depth = again_depth.unwrap_or(1);
                let mut result = self.clone();
                for step in 0..times {
                    let next = result.map_step(&repl, again_depth, again_end.clone())?;
                    if next.equals(&result) {
                        trace!(step, "map reached a fixed point early");
                        break;
                    }
                    result = next;
                }
                Ok(result)
            }
            Repeat::FixedPoint if again_depth.is_some() || again_end.is_some() => {
                Err(Error::AgainNotAllowed("fixed-point mapping"))
            }
            Repeat::FixedPoint => AbsorbingChain::default().solve(self, |outcome| {
                match repl.apply(outcome)? {
                    Item::Outcome(x) => Ok(Die::scalar(x)),
                    Item::Die(die) => Ok(die),
                    Item::Reroll => Ok(Die::empty()),
                    Item::Again(_) => Err(Error::AgainNotAllowed("fixed-point mapping")),
                }
            }),
        }
    }
}

impl Die {
    fn map_step(&self, repl: &Repl<'_>, again_depth: u32, again_end: Option<AgainEnd>) -> Result<Die> {
        let items = self
            .outcomes()
            .iter()
            .map(|x| repl.apply(x))
            .collect::<Result<Vec<_>>>()?;
        Die::build(&items, self.quantities(), again_depth, again_end)
    }

    /// Maps `(outcome, steps)` pairs, counting how many applications of
    /// `repl` actually changed each outcome. Stops after `repeat` rounds or
    /// once a round changes nothing.
    pub fn map_and_time(&self, repl: Repl<'_>, repeat: u32) -> Result<Die> {
        let mut result = self.unary_operator(|x| Ok(Outcome::tuple([x.clone(), Outcome::int(0)])))?;
        let timed = Repl::try_new(|pair| {
            let Outcome::Tuple(parts) = pair else {
                return Err(Error::UnsupportedOutcome {
                    op: "map_and_time",
                    outcome: pair.clone(),
                });
            };
            let [value, steps] = parts.as_slice() else {
                return Err(Error::ArityMismatch {
                    lhs: 2,
                    rhs: parts.len(),
                });
            };
            let steps = BinaryOp::Add.apply(steps, &Outcome::int(1))?;
            match repl.apply(value)? {
                Item::Again(_) => Err(Error::AgainNotAllowed("map_and_time")),
                Item::Reroll => Ok(Item::Reroll),
                Item::Outcome(x) if x == *value => Ok(Item::Outcome(pair.clone())),
                Item::Outcome(x) => Ok(Item::Outcome(Outcome::Tuple(vec![x, steps]))),
                Item::Die(die) if concentrated_on(&die, value) => Ok(Item::Outcome(pair.clone())),
                Item::Die(die) => die
                    .unary_operator(|x| Ok(Outcome::Tuple(vec![x.clone(), steps.clone()])))
                    .map(Item::Die),
            }
        });

        for round in 0..repeat {
            let next = result.map_step(&timed, 1, None)?;
            if next.equals(&result) {
                debug!(round, "map_and_time converged");
                return Ok(next);
            }
            result = next;
        }
        Ok(result)
    }
}

/// Whether all of `die`'s mass sits on `outcome`.
fn concentrated_on(die: &Die, outcome: &Outcome) -> bool {
    !die.denominator().is_zero() && die.quantity(outcome) == *die.denominator()
}
