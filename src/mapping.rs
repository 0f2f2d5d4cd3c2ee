use std::iter::Zip;
use std::slice;

use num::{Integer, One, Zero};

use crate::{Map, Outcome, Weight};

pub type Iter<'a> = Zip<slice::Iter<'a, Outcome>, slice::Iter<'a, Weight>>;

/// Canonical outcome to weight mapping.
///
/// Outcomes are unique and ascending. Zero weights are retained: they are
/// enumerated like any other outcome but carry no probability mass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OutcomeMap {
    denom: Weight,
    outcomes: Vec<Outcome>,
    quantities: Vec<Weight>,
}

impl OutcomeMap {
    #[must_use]
    pub fn new(map: Map) -> Self {
        let (outcomes, quantities): (Vec<_>, Vec<_>) = map.into_iter().unzip();
        Self::from_sorted(outcomes, quantities)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the mapping from already ascending, duplicate-free outcomes.
    pub(crate) fn from_sorted(outcomes: Vec<Outcome>, quantities: Vec<Weight>) -> Self {
        debug_assert_eq!(outcomes.len(), quantities.len());
        debug_assert!(outcomes.windows(2).all(|w| w[0] < w[1]));
        let denom = quantities.iter().sum();
        Self {
            denom,
            outcomes,
            quantities,
        }
    }

    /// Rebuilds weights from cumulative weights.
    ///
    /// With `reverse` unset, `cumulative[i]` is the weight at or below
    /// `outcomes[i]`. With `reverse` set it is the weight at or above it.
    #[must_use]
    pub fn from_cumulative(outcomes: Vec<Outcome>, cumulative: Vec<Weight>, reverse: bool) -> Self {
        let n = cumulative.len();
        let quantities = (0..n)
            .map(|i| {
                let previous = if reverse {
                    cumulative.get(i + 1)
                } else {
                    i.checked_sub(1).map(|j| &cumulative[j])
                };
                match previous {
                    Some(p) => &cumulative[i] - p,
                    None => cumulative[i].clone(),
                }
            })
            .collect();
        Self::from_sorted(outcomes, quantities)
    }

    #[must_use]
    pub fn denominator(&self) -> &Weight {
        &self.denom
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn quantities(&self) -> &[Weight] {
        &self.quantities
    }

    pub fn iter(&self) -> Iter<'_> {
        self.outcomes.iter().zip(self.quantities.iter())
    }

    /// Weight of `outcome`, zero if it is absent.
    #[must_use]
    pub fn get(&self, outcome: &Outcome) -> Weight {
        self.outcomes
            .binary_search(outcome)
            .map(|i| self.quantities[i].clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, outcome: &Outcome) -> bool {
        self.outcomes.binary_search(outcome).is_ok()
    }

    #[must_use]
    pub fn min_outcome(&self) -> Option<&Outcome> {
        self.outcomes.first()
    }

    #[must_use]
    pub fn max_outcome(&self) -> Option<&Outcome> {
        self.outcomes.last()
    }

    #[must_use]
    pub fn remove_min(&self) -> Self {
        match self.outcomes.len() {
            0 => Self::empty(),
            _ => Self::from_sorted(self.outcomes[1..].to_vec(), self.quantities[1..].to_vec()),
        }
    }

    #[must_use]
    pub fn remove_max(&self) -> Self {
        match self.outcomes.len() {
            0 => Self::empty(),
            n => Self::from_sorted(
                self.outcomes[..n - 1].to_vec(),
                self.quantities[..n - 1].to_vec(),
            ),
        }
    }

    /// Divides every weight by the GCD of all weights.
    #[must_use]
    pub fn simplify(&self) -> Self {
        let divisor = self
            .quantities
            .iter()
            .fold(Weight::zero(), |acc, x| acc.gcd(x));
        if divisor.is_zero() || divisor.is_one() {
            return self.clone();
        }
        Self {
            denom: &self.denom / &divisor,
            outcomes: self.outcomes.clone(),
            quantities: self.quantities.iter().map(|x| x / &divisor).collect(),
        }
    }

    #[must_use]
    pub fn scale(&self, factor: &Weight) -> Self {
        Self {
            denom: &self.denom * factor,
            outcomes: self.outcomes.clone(),
            quantities: self.quantities.iter().map(|x| x * factor).collect(),
        }
    }

    /// Cumulative weights at or below each outcome.
    #[must_use]
    pub fn quantities_le(&self) -> Vec<Weight> {
        let mut acc = Weight::zero();
        self.quantities
            .iter()
            .map(|x| {
                acc += x;
                acc.clone()
            })
            .collect()
    }

    /// Cumulative weights at or above each outcome.
    #[must_use]
    pub fn quantities_ge(&self) -> Vec<Weight> {
        let mut acc = Weight::zero();
        let mut result: Vec<Weight> = self
            .quantities
            .iter()
            .rev()
            .map(|x| {
                acc += x;
                acc.clone()
            })
            .collect();
        result.reverse();
        result
    }
}

impl<'a> IntoIterator for &'a OutcomeMap {
    type Item = (&'a Outcome, &'a Weight);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
