use std::collections::HashMap;
use std::ops::Range;

use num::integer::binomial;
use num::{pow, One, Zero};
use tracing::{debug, trace};

use crate::mapping::OutcomeMap;
use crate::ops::BinaryOp;
use crate::util::accumulate;
use crate::{Die, Error, Map, Outcome, Result, Weight};

/// How [`Pool::middle`] resolves an odd number of dropped dice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tie {
    /// Shift the kept window towards the lower rolls.
    #[default]
    Low,
    High,
    Error,
}

/// A multiset of dice rolled together, summed over selected sorted positions.
#[derive(Clone, Debug)]
pub struct Pool {
    dice: Vec<(Die, u32)>,
    keep: Option<Vec<i64>>,
}

/// DP key: dice placed so far per kind, and the running sum of kept dice.
type State = (Vec<u32>, Option<Outcome>);

impl Pool {
    #[must_use]
    pub fn new<I, D>(dice: I) -> Self
    where
        I: IntoIterator<Item = (D, u32)>,
        D: Into<Die>,
    {
        Self {
            dice: dice
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(die, count)| (die.into(), count))
                .collect(),
            keep: None,
        }
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.dice.iter().map(|(_, count)| count).sum()
    }

    /// Weights each sorted position, lowest first.
    pub fn keep(mut self, keep: Vec<i64>) -> Result<Self> {
        let size = self.size() as usize;
        if keep.len() != size {
            return Err(Error::KeepTupleLength {
                expected: size,
                actual: keep.len(),
            });
        }
        self.keep = Some(keep);
        Ok(self)
    }

    /// Keeps sorted positions in `range` once each and drops the rest.
    #[must_use]
    pub fn keep_range(mut self, range: Range<u32>) -> Self {
        self.keep = Some(
            (0..self.size())
                .map(|i| i64::from(range.contains(&i)))
                .collect(),
        );
        self
    }

    /// Keeps the `keep` middle positions.
    pub fn middle(self, keep: u32, tie: Tie) -> Result<Self> {
        let rolls = self.size();
        let keep = keep.min(rolls);
        let dropped = rolls - keep;
        let start = match (dropped % 2, tie) {
            (0, _) | (_, Tie::Low) => dropped / 2,
            (_, Tie::High) => dropped / 2 + 1,
            (_, Tie::Error) => return Err(Error::MiddleTie { rolls, keep }),
        };
        Ok(self.keep_range(start..start + keep))
    }

    fn coefficient(&self, position: usize) -> i64 {
        match &self.keep {
            Some(keep) => keep[position],
            None => 1,
        }
    }

    /// Distribution of the weighted sum of sorted positions.
    pub fn sum(&self) -> Result<Die> {
        let Some((first, _)) = self.dice.first() else {
            return Ok(Die::empty());
        };
        let size = self.size() as usize;
        let totals: Vec<u32> = self.dice.iter().map(|(_, count)| *count).collect();
        let mut cursors: Vec<Die> = self.dice.iter().map(|(die, _)| die.clone()).collect();
        debug!(kinds = totals.len(), size, "evaluating pool");

        let mut states: HashMap<State, Weight> = HashMap::new();
        states.insert((vec![0; totals.len()], None), Weight::one());

        loop {
            let Some(outcome) = cursors
                .iter()
                .filter_map(|die| die.max_outcome().ok())
                .max()
                .cloned()
            else {
                break;
            };

            let mut weights: Vec<Option<Weight>> = Vec::with_capacity(cursors.len());
            for cursor in &mut cursors {
                match cursor.pop_max() {
                    Some((rest, top, weight)) if top == outcome => {
                        *cursor = rest;
                        weights.push(Some(weight));
                    }
                    _ => weights.push(None),
                }
            }
            trace!(%outcome, states = states.len(), "pool step");

            let mut next: HashMap<State, Weight> = HashMap::new();
            for ((placed, sum), weight) in states {
                self.expand(&outcome, &weights, &totals, size, placed, sum, weight, &mut next)?;
            }
            states = next;
        }

        let zero = first.zero()?.outcomes()[0].clone();
        let mut map = Map::new();
        for ((placed, sum), weight) in states {
            if placed == totals {
                accumulate(&mut map, sum.unwrap_or_else(|| zero.clone()), weight);
            }
        }
        Ok(Die::from_map(OutcomeMap::new(map)))
    }

    /// Every way of showing `outcome` on some of the unplaced dice.
    #[allow(clippy::too_many_arguments)]
    fn expand(
        &self,
        outcome: &Outcome,
        weights: &[Option<Weight>],
        totals: &[u32],
        size: usize,
        placed: Vec<u32>,
        sum: Option<Outcome>,
        weight: Weight,
        next: &mut HashMap<State, Weight>,
    ) -> Result<()> {
        let mut partial = vec![(placed, 0i64, weight)];
        for (kind, w) in weights.iter().enumerate() {
            let Some(w) = w.as_ref().filter(|w| !w.is_zero()) else {
                continue;
            };
            let mut expanded = Vec::new();
            for (placed, coeff, weight) in partial {
                let remaining = totals[kind] - placed[kind];
                let done: usize = placed.iter().map(|&x| x as usize).sum();
                for k in 0..=remaining {
                    let factor = binomial(Weight::from(remaining), Weight::from(k))
                        * pow(w.clone(), k as usize);
                    // Dice are placed from the highest sorted position down.
                    let extra: i64 = (done..done + k as usize)
                        .map(|d| self.coefficient(size - 1 - d))
                        .sum();
                    let mut placed = placed.clone();
                    placed[kind] += k;
                    expanded.push((placed, coeff + extra, &weight * factor));
                }
            }
            partial = expanded;
        }

        for (placed, coeff, weight) in partial {
            let sum = match coeff {
                0 => sum.clone(),
                _ => {
                    let contribution = if coeff == 1 {
                        outcome.clone()
                    } else {
                        BinaryOp::Mul.apply(outcome, &Outcome::int(coeff))?
                    };
                    Some(match &sum {
                        Some(s) => BinaryOp::Add.apply(s, &contribution)?,
                        None => contribution,
                    })
                }
            };
            *next.entry((placed, sum)).or_default() += weight;
        }
        Ok(())
    }
}
