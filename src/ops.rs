use std::cmp::Ordering;

use num::{BigInt, BigRational, Integer, One, Signed, ToPrimitive, Zero};

use crate::{Error, Outcome, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Pos,
    Abs,
    Invert,
    Round,
    Floor,
    Ceil,
    Trunc,
    Sign,
    Zero,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Min,
    Max,
    And,
    Or,
    Xor,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl UnaryOp {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Pos => "pos",
            UnaryOp::Abs => "abs",
            UnaryOp::Invert => "invert",
            UnaryOp::Round => "round",
            UnaryOp::Floor => "floor",
            UnaryOp::Ceil => "ceil",
            UnaryOp::Trunc => "trunc",
            UnaryOp::Sign => "sign",
            UnaryOp::Zero => "zero",
        }
    }

    /// Applies the operator, recursing through tuple components.
    pub fn apply(self, outcome: &Outcome) -> Result<Outcome> {
        match outcome {
            Outcome::Tuple(items) => items
                .iter()
                .map(|x| self.apply(x))
                .collect::<Result<Vec<_>>>()
                .map(Outcome::Tuple),
            x => self.apply_scalar(x),
        }
    }

    fn apply_scalar(self, outcome: &Outcome) -> Result<Outcome> {
        match (self, outcome) {
            (UnaryOp::Pos, x) => Ok(x.clone()),
            (UnaryOp::Zero, Outcome::Text(_)) => Ok(Outcome::Text(String::new())),
            (UnaryOp::Invert, Outcome::Bool(b)) => Ok(Outcome::Bool(!b)),
            _ => {
                let x = outcome
                    .numeric()
                    .ok_or_else(|| unsupported(self.name(), outcome))?;
                let result = match self {
                    UnaryOp::Neg => -x.into_owned(),
                    UnaryOp::Abs => x.abs(),
                    UnaryOp::Invert => {
                        if !x.is_integer() {
                            return Err(Error::NotAnInteger(outcome.clone()));
                        }
                        -x.into_owned() - BigRational::one()
                    }
                    UnaryOp::Round => round_half_even(&x),
                    UnaryOp::Floor => x.floor(),
                    UnaryOp::Ceil => x.ceil(),
                    UnaryOp::Trunc => x.trunc(),
                    UnaryOp::Sign => x.signum(),
                    UnaryOp::Zero => BigRational::zero(),
                    UnaryOp::Pos => x.into_owned(),
                };
                Ok(Outcome::Num(result))
            }
        }
    }
}

impl BinaryOp {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::FloorDiv => "floordiv",
            BinaryOp::Mod => "mod",
            BinaryOp::Pow => "pow",
            BinaryOp::Min => "min",
            BinaryOp::Max => "max",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::Lt => "lt",
            BinaryOp::Le => "le",
            BinaryOp::Gt => "gt",
            BinaryOp::Ge => "ge",
            BinaryOp::Eq => "eq",
            BinaryOp::Ne => "ne",
        }
    }

    /// Applies the operator element-wise.
    ///
    /// Two tuples must have the same arity and are zipped. A scalar paired
    /// with a tuple is broadcast across every slot.
    pub fn apply(self, lhs: &Outcome, rhs: &Outcome) -> Result<Outcome> {
        match (lhs, rhs) {
            (Outcome::Tuple(a), Outcome::Tuple(b)) => {
                if a.len() != b.len() {
                    return Err(Error::ArityMismatch {
                        lhs: a.len(),
                        rhs: b.len(),
                    });
                }
                a.iter()
                    .zip(b)
                    .map(|(x, y)| self.apply(x, y))
                    .collect::<Result<Vec<_>>>()
                    .map(Outcome::Tuple)
            }
            (Outcome::Tuple(a), y) => a
                .iter()
                .map(|x| self.apply(x, y))
                .collect::<Result<Vec<_>>>()
                .map(Outcome::Tuple),
            (x, Outcome::Tuple(b)) => b
                .iter()
                .map(|y| self.apply(x, y))
                .collect::<Result<Vec<_>>>()
                .map(Outcome::Tuple),
            (x, y) => self.apply_scalar(x, y),
        }
    }

    fn apply_scalar(self, lhs: &Outcome, rhs: &Outcome) -> Result<Outcome> {
        match self {
            BinaryOp::Lt => Ok(Outcome::Bool(self.compare(lhs, rhs)?.is_lt())),
            BinaryOp::Le => Ok(Outcome::Bool(self.compare(lhs, rhs)?.is_le())),
            BinaryOp::Gt => Ok(Outcome::Bool(self.compare(lhs, rhs)?.is_gt())),
            BinaryOp::Ge => Ok(Outcome::Bool(self.compare(lhs, rhs)?.is_ge())),
            BinaryOp::Eq => Ok(Outcome::Bool(scalar_eq(lhs, rhs))),
            BinaryOp::Ne => Ok(Outcome::Bool(!scalar_eq(lhs, rhs))),
            BinaryOp::Min => Ok(match self.compare(lhs, rhs)? {
                Ordering::Greater => rhs.clone(),
                _ => lhs.clone(),
            }),
            BinaryOp::Max => Ok(match self.compare(lhs, rhs)? {
                Ordering::Less => rhs.clone(),
                _ => lhs.clone(),
            }),
            BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => self.bitwise(lhs, rhs),
            BinaryOp::Add => match (lhs, rhs) {
                (Outcome::Text(a), Outcome::Text(b)) => Ok(Outcome::Text(format!("{a}{b}"))),
                _ => self.arithmetic(lhs, rhs),
            },
            _ => self.arithmetic(lhs, rhs),
        }
    }

    fn compare(self, lhs: &Outcome, rhs: &Outcome) -> Result<Ordering> {
        if let (Some(a), Some(b)) = (lhs.numeric(), rhs.numeric()) {
            return Ok(a.cmp(&b));
        }
        match (lhs, rhs) {
            (Outcome::Text(a), Outcome::Text(b)) => Ok(a.cmp(b)),
            _ => Err(incompatible(self.name(), lhs, rhs)),
        }
    }

    fn bitwise(self, lhs: &Outcome, rhs: &Outcome) -> Result<Outcome> {
        if let (Outcome::Bool(a), Outcome::Bool(b)) = (lhs, rhs) {
            return Ok(Outcome::Bool(match self {
                BinaryOp::And => *a && *b,
                BinaryOp::Or => *a || *b,
                _ => *a ^ *b,
            }));
        }
        let a = lhs
            .to_integer()
            .ok_or_else(|| incompatible(self.name(), lhs, rhs))?;
        let b = rhs
            .to_integer()
            .ok_or_else(|| incompatible(self.name(), lhs, rhs))?;
        let result: BigInt = match self {
            BinaryOp::And => &a & &b,
            BinaryOp::Or => &a | &b,
            _ => &a ^ &b,
        };
        Ok(Outcome::from(result))
    }

    fn arithmetic(self, lhs: &Outcome, rhs: &Outcome) -> Result<Outcome> {
        let (a, b) = match (lhs.numeric(), rhs.numeric()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(incompatible(self.name(), lhs, rhs)),
        };
        let (a, b) = (a.as_ref(), b.as_ref());
        let result = match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => {
                if b.is_zero() {
                    return Err(Error::DivisionByZero);
                }
                a / b
            }
            BinaryOp::FloorDiv => {
                if b.is_zero() {
                    return Err(Error::DivisionByZero);
                }
                (a / b).floor()
            }
            BinaryOp::Mod => {
                if b.is_zero() {
                    return Err(Error::DivisionByZero);
                }
                a - b * (a / b).floor()
            }
            BinaryOp::Pow => {
                if !b.is_integer() {
                    return Err(Error::NotAnInteger(rhs.clone()));
                }
                let exp = b
                    .to_integer()
                    .to_i32()
                    .ok_or_else(|| Error::ExponentTooLarge(rhs.clone()))?;
                if a.is_zero() && exp < 0 {
                    return Err(Error::DivisionByZero);
                }
                let power = num::pow(a.clone(), exp.unsigned_abs() as usize);
                if exp < 0 {
                    power.recip()
                } else {
                    power
                }
            }
            _ => return Err(incompatible(self.name(), lhs, rhs)),
        };
        Ok(Outcome::Num(result))
    }
}

/// Outcome equality already treats booleans as 0 and 1.
fn scalar_eq(lhs: &Outcome, rhs: &Outcome) -> bool {
    lhs == rhs
}

fn round_half_even(x: &BigRational) -> BigRational {
    let floor = x.floor();
    let half = BigRational::new(BigInt::one(), BigInt::from(2));
    match (x - &floor).cmp(&half) {
        Ordering::Less => floor,
        Ordering::Greater => floor + BigRational::one(),
        Ordering::Equal => {
            if floor.to_integer().is_even() {
                floor
            } else {
                floor + BigRational::one()
            }
        }
    }
}

fn incompatible(op: &'static str, lhs: &Outcome, rhs: &Outcome) -> Error {
    Error::IncompatibleOutcomes {
        op,
        lhs: lhs.clone(),
        rhs: rhs.clone(),
    }
}

fn unsupported(op: &'static str, outcome: &Outcome) -> Error {
    Error::UnsupportedOutcome {
        op,
        outcome: outcome.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuples_recurse_and_broadcast() {
        let pair = Outcome::from((1, 2));
        assert_eq!(
            BinaryOp::Add.apply(&pair, &Outcome::int(10)).unwrap(),
            Outcome::from((11, 12))
        );
        assert_eq!(
            BinaryOp::Mul.apply(&pair, &Outcome::from((3, 4))).unwrap(),
            Outcome::from((3, 8))
        );
        assert_eq!(
            UnaryOp::Neg.apply(&Outcome::tuple([Outcome::from((1, -2)), Outcome::int(3)]))
                .unwrap(),
            Outcome::tuple([Outcome::from((-1, 2)), Outcome::int(-3)])
        );
    }

    #[test]
    fn arity_mismatch_is_an_error() {
        let err = BinaryOp::Add
            .apply(&Outcome::from((1, 2)), &Outcome::from((1, 2, 3)))
            .unwrap_err();
        assert_eq!(err, Error::ArityMismatch { lhs: 2, rhs: 3 });
    }

    #[test]
    fn floor_division_and_modulo_follow_the_divisor() {
        let (a, b) = (Outcome::int(-7), Outcome::int(2));
        assert_eq!(BinaryOp::FloorDiv.apply(&a, &b).unwrap(), Outcome::int(-4));
        assert_eq!(BinaryOp::Mod.apply(&a, &b).unwrap(), Outcome::int(1));
        assert_eq!(BinaryOp::Div.apply(&a, &b).unwrap(), Outcome::ratio(-7, 2).unwrap());
        assert_eq!(
            BinaryOp::Div.apply(&a, &Outcome::int(0)).unwrap_err(),
            Error::DivisionByZero
        );
    }

    #[test]
    fn rounding_is_half_to_even() {
        let round = |n, d| UnaryOp::Round.apply(&Outcome::ratio(n, d).unwrap()).unwrap();
        assert_eq!(round(5, 2), Outcome::int(2));
        assert_eq!(round(7, 2), Outcome::int(4));
        assert_eq!(round(-5, 2), Outcome::int(-2));
        assert_eq!(round(8, 3), Outcome::int(3));
    }

    #[test]
    fn sign_and_zero() {
        assert_eq!(UnaryOp::Sign.apply(&Outcome::int(-4)).unwrap(), Outcome::int(-1));
        assert_eq!(UnaryOp::Sign.apply(&Outcome::int(0)).unwrap(), Outcome::int(0));
        assert_eq!(UnaryOp::Zero.apply(&Outcome::from("ab")).unwrap(), Outcome::from(""));
        assert_eq!(
            UnaryOp::Zero.apply(&Outcome::from((true, 3))).unwrap(),
            Outcome::from((0, 0))
        );
    }

    #[test]
    fn booleans_coerce_in_arithmetic() {
        let t = Outcome::Bool(true);
        assert_eq!(BinaryOp::Add.apply(&t, &t).unwrap(), Outcome::int(2));
        assert_eq!(BinaryOp::And.apply(&t, &Outcome::Bool(false)).unwrap(), Outcome::Bool(false));
        assert_eq!(UnaryOp::Invert.apply(&t).unwrap(), Outcome::Bool(false));
        assert_eq!(UnaryOp::Invert.apply(&Outcome::int(5)).unwrap(), Outcome::int(-6));
    }

    #[test]
    fn power() {
        let pow = |a, b| BinaryOp::Pow.apply(&Outcome::int(a), &Outcome::int(b));
        assert_eq!(pow(2, 10).unwrap(), Outcome::int(1024));
        assert_eq!(pow(2, -2).unwrap(), Outcome::ratio(1, 4).unwrap());
        assert_eq!(pow(0, -1).unwrap_err(), Error::DivisionByZero);
    }

    #[test]
    fn text_supports_only_concatenation_and_ordering() {
        let (a, b) = (Outcome::from("a"), Outcome::from("b"));
        assert_eq!(BinaryOp::Add.apply(&a, &b).unwrap(), Outcome::from("ab"));
        assert_eq!(BinaryOp::Max.apply(&a, &b).unwrap(), b);
        assert!(matches!(
            BinaryOp::Sub.apply(&a, &b),
            Err(Error::IncompatibleOutcomes { op: "sub", .. })
        ));
    }
}
