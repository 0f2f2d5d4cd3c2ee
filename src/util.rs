use std::collections::BTreeMap;

use num::BigUint;
use thiserror::Error;

use crate::Outcome;

pub type Weight = BigUint;
pub type Map = BTreeMap<Outcome, Weight>;
pub type Result<T> = ::core::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("`{op}` is not defined between {lhs} and {rhs}")]
    IncompatibleOutcomes {
        op: &'static str,
        lhs: Outcome,
        rhs: Outcome,
    },
    #[error("`{op}` is not defined for {outcome}")]
    UnsupportedOutcome { op: &'static str, outcome: Outcome },
    #[error("tuple arity mismatch: {lhs} vs {rhs}")]
    ArityMismatch { lhs: usize, rhs: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("expected an integer outcome, got {0}")]
    NotAnInteger(Outcome),
    #[error("exponent {0} is too large")]
    ExponentTooLarge(Outcome),
    #[error("zero() resolved to {0} outcomes instead of exactly one")]
    AmbiguousZero(usize),
    #[error("every outcome depends on Again, an explicit again_end is required")]
    UnresolvableAgain,
    #[error("Again is not permitted in {0}")]
    AgainNotAllowed(&'static str),
    #[error("expected {expected} multiplicities, got {actual}")]
    MultiplicityMismatch { expected: usize, actual: usize },
    #[error("keep tuple has {actual} entries for a pool of {expected}")]
    KeepTupleLength { expected: usize, actual: usize },
    #[error("operation requires a non-empty die")]
    EmptyDie,
    #[error("middle {keep} of {rolls} has no unique center")]
    MiddleTie { rolls: u32, keep: u32 },
    #[error("chain starting from {0} never reaches an absorbing state")]
    NonAbsorbing(Outcome),
    #[error("chain exceeded {0} reachable states")]
    TooManyStates(usize),
}

#[inline]
pub(crate) fn accumulate(map: &mut Map, outcome: Outcome, weight: Weight) {
    *map.entry(outcome).or_default() += weight;
}
