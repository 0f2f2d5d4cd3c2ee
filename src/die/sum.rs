use num::{pow, ToPrimitive};
use tracing::trace;

use crate::mapping::OutcomeMap;
use crate::ops::{BinaryOp, UnaryOp};
use crate::pool::{Pool, Tie};
use crate::util::accumulate;
use crate::{Die, Error, Map, Outcome, Result};

impl Die {
    /// Sum of `n` independent rolls. Negative `n` negates the sum.
    ///
    /// Partial sums are memoized on this die.
    pub fn sum_all(&self, n: i64) -> Result<Die> {
        match n {
            0 => Ok(self.zero()?.simplify()),
            1 => Ok(self.clone()),
            n if n < 0 => {
                if let Some(hit) = self.sum_cache().borrow().get(&n) {
                    return Ok(hit.clone());
                }
                let count = n
                    .checked_neg()
                    .ok_or_else(|| Error::ExponentTooLarge(Outcome::int(n)))?;
                let negated = self.sum_all(count)?.unary(UnaryOp::Neg)?;
                self.sum_cache().borrow_mut().insert(n, negated.clone());
                Ok(negated)
            }
            n => {
                if let Some(hit) = self.sum_cache().borrow().get(&n) {
                    return Ok(hit.clone());
                }
                let (mut k, mut total) = {
                    let cache = self.sum_cache().borrow();
                    (2..n)
                        .rev()
                        .find_map(|k| cache.get(&k).map(|d| (k, d.clone())))
                        .unwrap_or((1, self.clone()))
                };
                while k < n {
                    k += 1;
                    trace!(n = k, "sum_all cache miss");
                    total = self.binary(BinaryOp::Add, &total)?;
                    self.sum_cache().borrow_mut().insert(k, total.clone());
                }
                Ok(total)
            }
        }
    }

    /// Rolls `self` to get a count, then sums that many rolls of `other`.
    ///
    /// Every outcome of `self` must be an integer.
    pub fn matmul<R>(&self, other: R) -> Result<Die>
    where
        R: Into<Die>,
    {
        let other = other.into();
        let counts = self
            .outcomes()
            .iter()
            .map(|o| o.to_i64().ok_or_else(|| Error::NotAnInteger(o.clone())))
            .collect::<Result<Vec<_>>>()?;
        let Some(max_abs) = counts.iter().map(|c| c.unsigned_abs()).max() else {
            return Ok(Die::empty());
        };

        let mut map = Map::new();
        for (&count, weight) in counts.iter().zip(self.quantities()) {
            let padding = max_abs - count.unsigned_abs();
            let padding = padding
                .to_usize()
                .ok_or_else(|| Error::ExponentTooLarge(Outcome::int(count)))?;
            let factor = pow(other.denominator().clone(), padding) * weight;
            for (outcome, w) in &other.sum_all(count)? {
                accumulate(&mut map, outcome.clone(), w * &factor);
            }
        }
        Ok(Die::from_map(OutcomeMap::new(map)))
    }

    /// Sum of the `keep` lowest of `rolls` rolls, after dropping the `drop`
    /// lowest.
    pub fn lowest(&self, rolls: u32, keep: u32, drop: u32) -> Result<Die> {
        let start = drop.min(rolls);
        let stop = drop.saturating_add(keep).min(rolls);
        self.keep_positions(rolls, start, stop)
    }

    /// Sum of the `keep` highest of `rolls` rolls, after dropping the `drop`
    /// highest.
    pub fn highest(&self, rolls: u32, keep: u32, drop: u32) -> Result<Die> {
        let stop = rolls - drop.min(rolls);
        let start = stop - keep.min(stop);
        self.keep_positions(rolls, start, stop)
    }

    /// Sum of the `keep` middle of `rolls` rolls.
    pub fn middle(&self, rolls: u32, keep: u32, tie: Tie) -> Result<Die> {
        if keep >= rolls {
            return self.sum_all(i64::from(rolls));
        }
        self.pool(rolls).middle(keep, tie)?.sum()
    }

    #[must_use]
    pub fn pool(&self, rolls: u32) -> Pool {
        Pool::new([(self.clone(), rolls)])
    }

    /// A pool of `keep.len()` rolls of this die, each sorted position
    /// counted `keep[i]` times (ascending positions).
    pub fn pool_keep(&self, keep: Vec<i64>) -> Result<Pool> {
        let rolls = u32::try_from(keep.len()).map_err(|_| Error::KeepTupleLength {
            expected: u32::MAX as usize,
            actual: keep.len(),
        })?;
        self.pool(rolls).keep(keep)
    }

    /// Sum of ascending sorted positions `start..stop` out of `rolls`.
    fn keep_positions(&self, rolls: u32, start: u32, stop: u32) -> Result<Die> {
        if rolls == 0 || start >= stop {
            return Ok(self.zero()?.simplify());
        }
        if stop - start == 1 && (start == 0 || stop == rolls) {
            let (cumulative, reverse) = if start == 0 {
                (self.mapping().quantities_ge(), true)
            } else {
                (self.mapping().quantities_le(), false)
            };
            let powered = cumulative
                .into_iter()
                .map(|w| pow(w, rolls as usize))
                .collect();
            return Ok(Die::from_map(OutcomeMap::from_cumulative(
                self.outcomes().to_vec(),
                powered,
                reverse,
            )));
        }
        self.pool(rolls).keep_range(start..stop).sum()
    }
}
