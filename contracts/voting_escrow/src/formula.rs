use crate::state::{Lock, Point};
use cosmwasm_std::{Decimal, StdResult, Uint128};
use ve_ledger::voting_escrow::DecayFormula;

/// # Description
/// Maps a lock to the linear segment of its voting power curve.
/// Every implementation must keep `bias(lock, t) == slope(amount) * (end - t)` with an
/// integer slope, so that the global curve stays the exact sum of the user curves.
pub(crate) trait DecayCurve {
    /// Voting power lost per second by a lock of `amount` tokens, rounded down.
    fn slope(&self, amount: Uint128, max_lock_time: u64) -> StdResult<Uint128>;

    /// Curve point of the lock at `time`. Expired or empty locks contribute nothing.
    fn lock_point(&self, lock: &Lock, max_lock_time: u64, time: u64) -> StdResult<Point> {
        if lock.amount.is_zero() || lock.end <= time {
            return Ok(Point::default());
        }
        let slope = self.slope(lock.amount, max_lock_time)?;
        Ok(Point {
            bias: slope.checked_mul(Uint128::from(lock.end - time))?,
            slope,
            ..Point::default()
        })
    }
}

impl DecayCurve for DecayFormula {
    fn slope(&self, amount: Uint128, max_lock_time: u64) -> StdResult<Uint128> {
        let weighted = match self {
            DecayFormula::Linear {} => amount,
            DecayFormula::Discounted { advance_percentage } => {
                amount * (Decimal::one() - *advance_percentage)
            }
        };
        Ok(weighted.checked_div(Uint128::from(max_lock_time))?)
    }
}
