use crate::mapping::OutcomeMap;
use crate::ops::{BinaryOp, UnaryOp};
use crate::util::accumulate;
use crate::{Die, Error, Map, Outcome, Result};

impl Die {
    /// Applies `f` to every outcome, summing weights of collisions.
    pub fn unary_operator<F>(&self, f: F) -> Result<Die>
    where
        F: Fn(&Outcome) -> Result<Outcome>,
    {
        let mut map = Map::new();
        for (outcome, weight) in self {
            accumulate(&mut map, f(outcome)?, weight.clone());
        }
        Ok(Die::from_map(OutcomeMap::new(map)))
    }

    pub fn unary(&self, op: UnaryOp) -> Result<Die> {
        self.unary_operator(|x| op.apply(x))
    }

    /// Applies `f` to every pair of outcomes. The result's denominator is the
    /// product of both denominators.
    pub fn binary_operator<R, F>(&self, other: R, f: F) -> Result<Die>
    where
        R: Into<Die>,
        F: Fn(&Outcome, &Outcome) -> Result<Outcome>,
    {
        let other = other.into();
        let mut map = Map::new();
        for (lhs, lw) in self {
            for (rhs, rw) in &other {
                accumulate(&mut map, f(lhs, rhs)?, lw * rw);
            }
        }
        Ok(Die::from_map(OutcomeMap::new(map)))
    }

    pub fn binary<R>(&self, op: BinaryOp, other: R) -> Result<Die>
    where
        R: Into<Die>,
    {
        self.binary_operator(other, |x, y| op.apply(x, y))
    }

    /// The additive identity of this die's outcome type, weighted like the
    /// die itself.
    pub fn zero(&self) -> Result<Die> {
        let zero = self.unary(UnaryOp::Zero)?;
        match zero.len() {
            1 => Ok(zero),
            n => Err(Error::AmbiguousZero(n)),
        }
    }

    pub fn abs(&self) -> Result<Die> {
        self.unary(UnaryOp::Abs)
    }

    /// Rounds half to even.
    pub fn round(&self) -> Result<Die> {
        self.unary(UnaryOp::Round)
    }

    pub fn floor(&self) -> Result<Die> {
        self.unary(UnaryOp::Floor)
    }

    pub fn ceil(&self) -> Result<Die> {
        self.unary(UnaryOp::Ceil)
    }

    pub fn trunc(&self) -> Result<Die> {
        self.unary(UnaryOp::Trunc)
    }

    /// 1 for positive outcomes, -1 for negative ones, 0 otherwise.
    pub fn sign(&self) -> Result<Die> {
        self.unary(UnaryOp::Sign)
    }

    /// Logical not for booleans, bitwise not for integers.
    pub fn invert(&self) -> Result<Die> {
        self.unary(UnaryOp::Invert)
    }

    pub fn pow<R>(&self, other: R) -> Result<Die>
    where
        R: Into<Die>,
    {
        self.binary(BinaryOp::Pow, other)
    }

    pub fn floor_div<R>(&self, other: R) -> Result<Die>
    where
        R: Into<Die>,
    {
        self.binary(BinaryOp::FloorDiv, other)
    }

    pub fn min_with<R>(&self, other: R) -> Result<Die>
    where
        R: Into<Die>,
    {
        self.binary(BinaryOp::Min, other)
    }

    pub fn max_with<R>(&self, other: R) -> Result<Die>
    where
        R: Into<Die>,
    {
        self.binary(BinaryOp::Max, other)
    }
}
