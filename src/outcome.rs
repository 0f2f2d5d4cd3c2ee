use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use num::{BigInt, BigRational, One, Signed, ToPrimitive, Zero};

use crate::{Error, Result};

/// A single result of a die.
///
/// Integers are stored as rationals with denominator one, so `Num` covers
/// every numeric outcome and exact division never leaves the variant. Tuples
/// hold a fixed number of components; every elementwise operator recurses
/// into them.
///
/// Booleans order and compare as 0 and 1, so `true` and `1` are the same
/// outcome. Kinds with no common order (numbers, text, tuples) are ranked
/// in that sequence; [`Outcome::comparable`] tells the two cases apart.
#[derive(Clone, Debug)]
pub enum Outcome {
    Bool(bool),
    Num(BigRational),
    Text(String),
    Tuple(Vec<Outcome>),
}

impl Outcome {
    #[must_use]
    pub fn int(value: i64) -> Self {
        Outcome::Num(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn ratio(numer: i64, denom: i64) -> Result<Self> {
        if denom == 0 {
            return Err(Error::DivisionByZero);
        }
        Ok(Outcome::Num(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    #[must_use]
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Outcome>,
    {
        Outcome::Tuple(items.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn is_tuple(&self) -> bool {
        matches!(self, Outcome::Tuple(_))
    }

    #[must_use]
    pub fn arity(&self) -> Option<usize> {
        match self {
            Outcome::Tuple(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Numeric view of the outcome. Booleans count as 0 and 1.
    #[must_use]
    pub fn numeric(&self) -> Option<Cow<'_, BigRational>> {
        match self {
            Outcome::Num(x) => Some(Cow::Borrowed(x)),
            Outcome::Bool(b) => Some(Cow::Owned(if *b {
                BigRational::one()
            } else {
                BigRational::zero()
            })),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_integer(&self) -> Option<BigInt> {
        let x = self.numeric()?;
        x.is_integer().then(|| x.to_integer())
    }

    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.to_integer()?.to_i64()
    }

    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        self.numeric()?.to_f64()
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Outcome::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.numeric().is_some_and(|x| x.is_negative())
    }

    /// Whether `self` and `other` have a meaningful relative order: both
    /// numeric, both text, or tuples of one arity with comparable components.
    #[must_use]
    pub fn comparable(&self, other: &Outcome) -> bool {
        match (self, other) {
            (Outcome::Text(_), Outcome::Text(_)) => true,
            (Outcome::Tuple(a), Outcome::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.comparable(y))
            }
            _ => self.numeric().is_some() && other.numeric().is_some(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Outcome::Bool(_) | Outcome::Num(_) => 0,
            Outcome::Text(_) => 1,
            Outcome::Tuple(_) => 2,
        }
    }
}

impl Ord for Outcome {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Outcome::Text(a), Outcome::Text(b)) => a.cmp(b),
            (Outcome::Tuple(a), Outcome::Tuple(b)) => a.cmp(b),
            _ => match (self.numeric(), other.numeric()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }
}

impl PartialOrd for Outcome {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Outcome {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Outcome {}

impl Hash for Outcome {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Outcome::Text(s) => s.hash(state),
            Outcome::Tuple(items) => items.hash(state),
            _ => {
                if let Some(x) = self.numeric() {
                    x.as_ref().hash(state);
                }
            }
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Bool(b) => write!(f, "{b}"),
            Outcome::Num(x) => write!(f, "{x}"),
            Outcome::Text(s) => write!(f, "{s:?}"),
            Outcome::Tuple(items) => {
                write!(f, "(")?;
                for (i, x) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{x}")?;
                }
                write!(f, ")")
            }
        }
    }
}

macro_rules! impl_outcome_from_int {
    ($($typ:ty),*) => {
        $(
            impl From<$typ> for Outcome {
                fn from(value: $typ) -> Self {
                    Outcome::Num(BigRational::from_integer(BigInt::from(value)))
                }
            }
        )*
    };
}

impl_outcome_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        Outcome::Bool(value)
    }
}

impl From<BigInt> for Outcome {
    fn from(value: BigInt) -> Self {
        Outcome::Num(BigRational::from_integer(value))
    }
}

impl From<BigRational> for Outcome {
    fn from(value: BigRational) -> Self {
        Outcome::Num(value)
    }
}

impl From<&str> for Outcome {
    fn from(value: &str) -> Self {
        Outcome::Text(value.to_owned())
    }
}

impl From<String> for Outcome {
    fn from(value: String) -> Self {
        Outcome::Text(value)
    }
}

impl From<Vec<Outcome>> for Outcome {
    fn from(value: Vec<Outcome>) -> Self {
        Outcome::Tuple(value)
    }
}

impl<A, B> From<(A, B)> for Outcome
where
    A: Into<Outcome>,
    B: Into<Outcome>,
{
    fn from((a, b): (A, B)) -> Self {
        Outcome::Tuple(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for Outcome
where
    A: Into<Outcome>,
    B: Into<Outcome>,
    C: Into<Outcome>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        Outcome::Tuple(vec![a.into(), b.into(), c.into()])
    }
}
