mod algebra;
mod compare;
mod construct;
mod map;
mod reroll;
mod sum;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use itertools::Itertools;
use num::bigint::RandBigInt;
use num::{BigInt, BigRational, Zero};
use once_cell::unsync::OnceCell;
use rand::{thread_rng, Rng};

pub use compare::DieWithTruth;
pub use map::{Repeat, Repl};
pub use reroll::Which;

use crate::mapping::{Iter, OutcomeMap};
use crate::util::accumulate;
use crate::{Error, Map, Outcome, Ptr, Result, Weight};

/// An immutable weighted distribution over outcomes.
///
/// Cloning is cheap and shares the underlying mapping. Equality and hashing
/// are structural: two dice are equal when their mappings match item for
/// item, zero weights included. For the probability that two dice roll the
/// same outcome see [`Die::eq_to`].
#[derive(Clone)]
pub struct Die(Ptr<DieInner>);

struct DieInner {
    map: OutcomeMap,
    sum_cache: RefCell<HashMap<i64, Die>>,
    popped_min: OnceCell<Die>,
    popped_max: OnceCell<Die>,
}

impl Die {
    #[must_use]
    pub fn from_map(map: OutcomeMap) -> Self {
        Self(Ptr::new(DieInner {
            map,
            sum_cache: RefCell::new(HashMap::new()),
            popped_min: OnceCell::new(),
            popped_max: OnceCell::new(),
        }))
    }

    /// The die with no outcomes and denominator zero.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_map(OutcomeMap::empty())
    }

    #[must_use]
    pub fn scalar<T>(outcome: T) -> Self
    where
        T: Into<Outcome>,
    {
        Self::from_map(OutcomeMap::from_sorted(
            vec![outcome.into()],
            vec![Weight::from(1u32)],
        ))
    }

    /// Each listed outcome gets weight one; repeated outcomes accumulate.
    #[must_use]
    pub fn uniform<I, T>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Outcome>,
    {
        let mut map = Map::new();
        for outcome in outcomes {
            accumulate(&mut map, outcome.into(), Weight::from(1u32));
        }
        Self::from_map(OutcomeMap::new(map))
    }

    /// A fair die numbered `1..=sides`.
    #[must_use]
    pub fn numeric(sides: i64) -> Self {
        Self::uniform(1..=sides)
    }

    #[must_use]
    pub fn from_weights<I, T, W>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, W)>,
        T: Into<Outcome>,
        W: Into<Weight>,
    {
        let mut map = Map::new();
        for (outcome, weight) in pairs {
            accumulate(&mut map, outcome.into(), weight.into());
        }
        Self::from_map(OutcomeMap::new(map))
    }

    #[must_use]
    pub fn mapping(&self) -> &OutcomeMap {
        &self.0.map
    }

    #[must_use]
    pub fn denominator(&self) -> &Weight {
        self.0.map.denominator()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.map.is_empty()
    }

    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        self.0.map.outcomes()
    }

    #[must_use]
    pub fn quantities(&self) -> &[Weight] {
        self.0.map.quantities()
    }

    pub fn iter(&self) -> Iter<'_> {
        self.0.map.iter()
    }

    #[must_use]
    pub fn quantity(&self, outcome: &Outcome) -> Weight {
        self.0.map.get(outcome)
    }

    pub fn min_outcome(&self) -> Result<&Outcome> {
        self.0.map.min_outcome().ok_or(Error::EmptyDie)
    }

    pub fn max_outcome(&self) -> Result<&Outcome> {
        self.0.map.max_outcome().ok_or(Error::EmptyDie)
    }

    /// Exact probability of `outcome`; zero for a die without mass.
    #[must_use]
    pub fn probability(&self, outcome: &Outcome) -> BigRational {
        ratio(self.quantity(outcome), self.denominator())
    }

    #[must_use]
    pub fn probabilities(&self) -> Vec<BigRational> {
        self.quantities()
            .iter()
            .map(|q| ratio(q.clone(), self.denominator()))
            .collect()
    }

    #[must_use]
    pub fn modes(&self) -> Vec<&Outcome> {
        self.iter()
            .max_set_by_key(|(_, q)| *q)
            .into_iter()
            .map(|(o, _)| o)
            .collect()
    }

    /// Divides all weights by their GCD. Not applied implicitly anywhere.
    #[must_use]
    pub fn simplify(&self) -> Self {
        Self::from_map(self.0.map.simplify())
    }

    /// Structural equality, the same relation as `==` on `Die`.
    #[must_use]
    pub fn equals(&self, other: &Die) -> bool {
        Ptr::ptr_eq(&self.0, &other.0) || self.0.map == other.0.map
    }

    /// The die without its lowest outcome, plus that outcome and its weight.
    ///
    /// The remainder is memoized on this instance.
    #[must_use]
    pub fn pop_min(&self) -> Option<(Die, Outcome, Weight)> {
        let outcome = self.0.map.min_outcome()?.clone();
        let weight = self.0.map.quantities()[0].clone();
        let rest = self
            .0
            .popped_min
            .get_or_init(|| Die::from_map(self.0.map.remove_min()))
            .clone();
        Some((rest, outcome, weight))
    }

    /// The die without its highest outcome, plus that outcome and its weight.
    ///
    /// The remainder is memoized on this instance.
    #[must_use]
    pub fn pop_max(&self) -> Option<(Die, Outcome, Weight)> {
        let outcome = self.0.map.max_outcome()?.clone();
        let weight = self.0.map.quantities()[self.len() - 1].clone();
        let rest = self
            .0
            .popped_max
            .get_or_init(|| Die::from_map(self.0.map.remove_max()))
            .clone();
        Some((rest, outcome, weight))
    }

    pub fn mean(&self) -> Result<BigRational> {
        if self.denominator().is_zero() {
            return Err(Error::EmptyDie);
        }
        let mut total = BigRational::zero();
        for (outcome, weight) in self.iter() {
            total += numeric("mean", outcome)? * BigRational::from_integer(BigInt::from(weight.clone()));
        }
        Ok(total / BigRational::from_integer(BigInt::from(self.denominator().clone())))
    }

    pub fn variance(&self) -> Result<BigRational> {
        let mean = self.mean()?;
        let mut total = BigRational::zero();
        for (outcome, weight) in self.iter() {
            let delta = numeric("variance", outcome)? - &mean;
            total += &delta * &delta * BigRational::from_integer(BigInt::from(weight.clone()));
        }
        Ok(total / BigRational::from_integer(BigInt::from(self.denominator().clone())))
    }

    pub fn sample_rng<G>(&self, rng: &mut G) -> Result<&Outcome>
    where
        G: Rng + ?Sized,
    {
        if self.denominator().is_zero() {
            return Err(Error::EmptyDie);
        }
        let x = rng.gen_biguint_below(self.denominator());
        let mut pos = Weight::zero();
        for (outcome, weight) in self.iter() {
            pos += weight;
            if x < pos {
                return Ok(outcome);
            }
        }
        Err(Error::EmptyDie)
    }

    pub fn sample(&self) -> Result<&Outcome> {
        let mut rng = thread_rng();
        self.sample_rng(&mut rng)
    }

    pub(crate) fn sum_cache(&self) -> &RefCell<HashMap<i64, Die>> {
        &self.0.sum_cache
    }
}

fn ratio(numer: Weight, denom: &Weight) -> BigRational {
    if denom.is_zero() {
        return BigRational::zero();
    }
    BigRational::new(BigInt::from(numer), BigInt::from(denom.clone()))
}

fn numeric(op: &'static str, outcome: &Outcome) -> Result<BigRational> {
    outcome
        .numeric()
        .map(|x| x.into_owned())
        .ok_or_else(|| Error::UnsupportedOutcome {
            op,
            outcome: outcome.clone(),
        })
}

impl PartialEq for Die {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Die {}

impl Hash for Die {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.map.hash(state);
    }
}

impl Debug for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Die")
            .field("denom", self.denominator())
            .field("outcomes", &self.outcomes())
            .field("quantities", &self.quantities())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Die {
    type Item = (&'a Outcome, &'a Weight);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

macro_rules! impl_die_from_outcome {
    ($($typ:ty),*) => {
        $(
            impl From<$typ> for Die {
                fn from(value: $typ) -> Self {
                    Die::scalar(value)
                }
            }
        )*
    };
}

impl_die_from_outcome!(Outcome, i32, i64, u32, bool, &str, String);

impl From<&Die> for Die {
    fn from(value: &Die) -> Self {
        value.clone()
    }
}
