use std::fmt::Debug;

use dyn_clone::DynClone;

use crate::ops::{BinaryOp, UnaryOp};
use crate::{Die, Outcome, Result};

/// One construction argument: a plain outcome, a nested die, or a sentinel.
#[derive(Clone, Debug)]
pub enum Item {
    Outcome(Outcome),
    Die(Die),
    /// Drops this branch. Construction loses the branch's mass.
    Reroll,
    /// Stands for a fresh copy of the die under construction.
    Again(Again),
}

/// Terminal value substituted for `Again` once the depth is exhausted.
#[derive(Clone, Debug)]
pub enum AgainEnd {
    Reroll,
    Die(Die),
}

pub trait Resolve: Debug + DynClone {
    fn resolve(&self, end: &Die) -> Result<Die>;
}

impl Clone for Box<dyn Resolve> {
    fn clone(&self) -> Self {
        dyn_clone::clone_box(&**self)
    }
}

/// Placeholder for the die being constructed, optionally transformed.
///
/// ```ignore
/// let exploding = Die::new([Item::from(1), Item::from(2), (Again::new() + 3).into()])?;
/// ```
#[derive(Clone, Debug)]
pub struct Again(Box<dyn Resolve>);

#[derive(Clone, Copy, Debug)]
struct Identity;

#[derive(Clone, Debug)]
struct Unary(Again, UnaryOp);

#[derive(Clone, Debug)]
struct Binary {
    again: Again,
    other: Die,
    op: BinaryOp,
    again_on_left: bool,
}

#[derive(Clone)]
struct Mapped<F>(Again, F);

impl Again {
    #[must_use]
    pub fn new() -> Self {
        Self(Box::new(Identity))
    }

    #[must_use]
    pub fn unary(self, op: UnaryOp) -> Self {
        Self(Box::new(Unary(self, op)))
    }

    /// `Again op other`.
    #[must_use]
    pub fn binary<R>(self, op: BinaryOp, other: R) -> Self
    where
        R: Into<Die>,
    {
        Self(Box::new(Binary {
            again: self,
            other: other.into(),
            op,
            again_on_left: true,
        }))
    }

    /// `other op Again`.
    #[must_use]
    pub fn binary_rev<L>(self, op: BinaryOp, other: L) -> Self
    where
        L: Into<Die>,
    {
        Self(Box::new(Binary {
            again: self,
            other: other.into(),
            op,
            again_on_left: false,
        }))
    }

    #[must_use]
    pub fn map<F>(self, f: F) -> Self
    where
        F: Fn(&Die) -> Result<Die> + Clone + 'static,
    {
        Self(Box::new(Mapped(self, f)))
    }

    /// Substitutes `end`. A `Reroll` end swallows any transformation.
    pub fn resolve(&self, end: &AgainEnd) -> Result<Item> {
        match end {
            AgainEnd::Reroll => Ok(Item::Reroll),
            AgainEnd::Die(die) => self.0.resolve(die).map(Item::Die),
        }
    }
}

impl Default for Again {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolve for Identity {
    fn resolve(&self, end: &Die) -> Result<Die> {
        Ok(end.clone())
    }
}

impl Resolve for Unary {
    fn resolve(&self, end: &Die) -> Result<Die> {
        self.0 .0.resolve(end)?.unary(self.1)
    }
}

impl Resolve for Binary {
    fn resolve(&self, end: &Die) -> Result<Die> {
        let again = self.again.0.resolve(end)?;
        if self.again_on_left {
            again.binary(self.op, &self.other)
        } else {
            self.other.binary(self.op, &again)
        }
    }
}

impl<F> Resolve for Mapped<F>
where
    F: Fn(&Die) -> Result<Die> + Clone + 'static,
{
    fn resolve(&self, end: &Die) -> Result<Die> {
        (self.1)(&self.0 .0.resolve(end)?)
    }
}

impl<F> Debug for Mapped<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Mapped").field(&self.0).finish()
    }
}

#[must_use]
pub fn contains_again(items: &[Item]) -> bool {
    items.iter().any(|x| matches!(x, Item::Again(_)))
}

/// Replaces every `Again` with `end`, leaving other items untouched.
pub fn replace_agains(items: &[Item], end: &AgainEnd) -> Result<Vec<Item>> {
    items
        .iter()
        .map(|item| match item {
            Item::Again(again) => again.resolve(end),
            x => Ok(x.clone()),
        })
        .collect()
}

macro_rules! impl_item_from_outcome {
    ($($typ:ty),*) => {
        $(
            impl From<$typ> for Item {
                fn from(value: $typ) -> Self {
                    Item::Outcome(Outcome::from(value))
                }
            }

            impl From<$typ> for AgainEnd {
                fn from(value: $typ) -> Self {
                    AgainEnd::Die(Die::scalar(Outcome::from(value)))
                }
            }
        )*
    };
}

impl_item_from_outcome!(i32, i64, u32, bool, &str, String);

impl From<Outcome> for Item {
    fn from(value: Outcome) -> Self {
        Item::Outcome(value)
    }
}

impl From<Die> for Item {
    fn from(value: Die) -> Self {
        Item::Die(value)
    }
}

impl From<&Die> for Item {
    fn from(value: &Die) -> Self {
        Item::Die(value.clone())
    }
}

impl From<Again> for Item {
    fn from(value: Again) -> Self {
        Item::Again(value)
    }
}

impl From<Outcome> for AgainEnd {
    fn from(value: Outcome) -> Self {
        AgainEnd::Die(Die::scalar(value))
    }
}

impl From<Die> for AgainEnd {
    fn from(value: Die) -> Self {
        AgainEnd::Die(value)
    }
}

impl From<&Die> for AgainEnd {
    fn from(value: &Die) -> Self {
        AgainEnd::Die(value.clone())
    }
}
