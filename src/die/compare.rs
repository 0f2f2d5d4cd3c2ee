use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::Deref;

use num::Zero;
use once_cell::unsync::OnceCell;

use crate::{Die, Error, Outcome, Result, Weight};

/// Result of [`Die::eq_to`] or [`Die::ne_to`].
///
/// Dereferences to the `{false, true}` die. [`DieWithTruth::truth`] answers
/// whether the operands are structurally equal (or unequal, for `ne_to`)
/// without looking at the probabilities.
#[derive(Clone)]
pub struct DieWithTruth {
    die: Die,
    lhs: Die,
    rhs: Die,
    equal: bool,
    truth: OnceCell<bool>,
}

impl DieWithTruth {
    pub fn truth(&self) -> bool {
        *self
            .truth
            .get_or_init(|| self.lhs.equals(&self.rhs) == self.equal)
    }

    #[must_use]
    pub fn into_die(self) -> Die {
        self.die
    }
}

impl Deref for DieWithTruth {
    type Target = Die;

    fn deref(&self) -> &Self::Target {
        &self.die
    }
}

impl Debug for DieWithTruth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DieWithTruth")
            .field("die", &self.die)
            .field("truth", &self.truth.get())
            .finish()
    }
}

impl From<DieWithTruth> for Die {
    fn from(value: DieWithTruth) -> Self {
        value.die
    }
}

impl From<&DieWithTruth> for Die {
    fn from(value: &DieWithTruth) -> Self {
        value.die.clone()
    }
}

fn truth_die(false_weight: Weight, true_weight: Weight) -> Die {
    Die::from_weights(
        [(false, false_weight), (true, true_weight)]
            .into_iter()
            .filter(|(_, w)| !w.is_zero()),
    )
}

/// Fails unless every outcome in `xs` has an order relative to every one in
/// `ys`. Sorted dice only need their extremes checked.
pub(super) fn ensure_comparable(
    op: &'static str,
    xs: &[&Outcome],
    ys: &[&Outcome],
) -> Result<()> {
    for x in xs {
        for y in ys {
            if !x.comparable(y) {
                return Err(Error::IncompatibleOutcomes {
                    op,
                    lhs: (*x).clone(),
                    rhs: (*y).clone(),
                });
            }
        }
    }
    Ok(())
}

/// Weight of `lo < hi` (or `lo <= hi` when not strict) over both dice.
fn lt_le_weight(strict: bool, lo: &Die, hi: &Die) -> Result<Weight> {
    ensure_comparable(
        if strict { "lt" } else { "le" },
        &[lo.min_outcome()?, lo.max_outcome()?],
        &[hi.min_outcome()?, hi.max_outcome()?],
    )?;
    let holds = |x: &Outcome, y: &Outcome| if strict { x < y } else { x <= y };
    let total = lo.denominator() * hi.denominator();
    if holds(lo.max_outcome()?, hi.min_outcome()?) {
        return Ok(total);
    }
    if !holds(lo.min_outcome()?, hi.max_outcome()?) {
        return Ok(Weight::zero());
    }

    let cumulative = lo.mapping().quantities_le();
    let mut cursor = 0;
    let mut below = Weight::zero();
    let mut weight = Weight::zero();
    for (y, wy) in hi {
        while cursor < lo.len() && holds(&lo.outcomes()[cursor], y) {
            below = cumulative[cursor].clone();
            cursor += 1;
        }
        weight += &below * wy;
    }
    Ok(weight)
}

fn lt_le(strict: bool, lo: &Die, hi: &Die) -> Result<Die> {
    if lo.is_empty() || hi.is_empty() {
        return Ok(Die::empty());
    }
    let total = lo.denominator() * hi.denominator();
    let weight = lt_le_weight(strict, lo, hi)?;
    Ok(truth_die(total - &weight, weight))
}

/// Weight of `a == b` via a merge of the two sorted outcome lists.
///
/// Outcomes with no common order are simply unequal, as with the
/// elementwise `Eq`.
fn eq_weight(a: &Die, b: &Die) -> Weight {
    let (Ok(a_min), Ok(a_max), Ok(b_min), Ok(b_max)) =
        (a.min_outcome(), a.max_outcome(), b.min_outcome(), b.max_outcome())
    else {
        return Weight::zero();
    };
    if a_max < b_min || b_max < a_min {
        return Weight::zero();
    }

    let (mut i, mut j) = (0, 0);
    let mut weight = Weight::zero();
    while i < a.len() && j < b.len() {
        match a.outcomes()[i].cmp(&b.outcomes()[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                weight += &a.quantities()[i] * &b.quantities()[j];
                i += 1;
                j += 1;
            }
        }
    }
    weight
}

impl Die {
    pub fn lt<R>(&self, other: R) -> Result<Die>
    where
        R: Into<Die>,
    {
        lt_le(true, self, &other.into())
    }

    pub fn le<R>(&self, other: R) -> Result<Die>
    where
        R: Into<Die>,
    {
        lt_le(false, self, &other.into())
    }

    pub fn gt<R>(&self, other: R) -> Result<Die>
    where
        R: Into<Die>,
    {
        lt_le(true, &other.into(), self)
    }

    pub fn ge<R>(&self, other: R) -> Result<Die>
    where
        R: Into<Die>,
    {
        lt_le(false, &other.into(), self)
    }

    #[must_use]
    pub fn eq_to<R>(&self, other: R) -> DieWithTruth
    where
        R: Into<Die>,
    {
        self.equality(other.into(), true)
    }

    #[must_use]
    pub fn ne_to<R>(&self, other: R) -> DieWithTruth
    where
        R: Into<Die>,
    {
        self.equality(other.into(), false)
    }

    fn equality(&self, other: Die, equal: bool) -> DieWithTruth {
        let die = if self.is_empty() || other.is_empty() {
            Die::empty()
        } else {
            let total = self.denominator() * other.denominator();
            let same = eq_weight(self, &other);
            let differ = total - &same;
            if equal {
                truth_die(differ, same)
            } else {
                truth_die(same, differ)
            }
        };
        DieWithTruth {
            die,
            lhs: self.clone(),
            rhs: other,
            equal,
            truth: OnceCell::new(),
        }
    }

    /// `{-1, 0, 1}` die of the sign of `self - other` under outcome order.
    pub fn compare<R>(&self, other: R) -> Result<Die>
    where
        R: Into<Die>,
    {
        let other = other.into();
        if self.is_empty() || other.is_empty() {
            return Ok(Die::empty());
        }
        let less = lt_le_weight(true, self, &other)?;
        let greater = lt_le_weight(true, &other, self)?;
        let equal = eq_weight(self, &other);
        Ok(Die::from_weights(
            [(-1, less), (0, equal), (1, greater)]
                .into_iter()
                .filter(|(_, w)| !w.is_zero()),
        ))
    }
}
