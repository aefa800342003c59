//! Append-only global and per-user point histories.
//!
//! Missing entries read as the zero point, so epoch 0 of a user without history
//! and any unknown epoch behave as "no voting power".

use crate::state::{Point, EPOCH, POINT_HISTORY, USER_POINT_EPOCH, USER_POINT_HISTORY};
use crate::utils::MAX_BISECT_ITERATIONS;
use cosmwasm_std::{Addr, StdResult, Storage};

pub(crate) fn current_epoch(storage: &dyn Storage) -> StdResult<u64> {
    Ok(EPOCH.may_load(storage)?.unwrap_or_default())
}

pub(crate) fn current_user_epoch(storage: &dyn Storage, user: &Addr) -> StdResult<u64> {
    Ok(USER_POINT_EPOCH.may_load(storage, user)?.unwrap_or_default())
}

pub(crate) fn global_point(storage: &dyn Storage, epoch: u64) -> StdResult<Point> {
    Ok(POINT_HISTORY.may_load(storage, epoch)?.unwrap_or_default())
}

pub(crate) fn user_point(storage: &dyn Storage, user: &Addr, epoch: u64) -> StdResult<Point> {
    Ok(USER_POINT_HISTORY
        .may_load(storage, (user, epoch))?
        .unwrap_or_default())
}

/// # Description
/// Stores `point` under the next global epoch and returns that epoch.
pub(crate) fn append_global_point(storage: &mut dyn Storage, point: &Point) -> StdResult<u64> {
    let epoch = current_epoch(storage)? + 1;
    POINT_HISTORY.save(storage, epoch, point)?;
    EPOCH.save(storage, &epoch)?;
    Ok(epoch)
}

/// # Description
/// Replaces the point of the latest global epoch. Used when several checkpoints
/// happen at the same block time.
pub(crate) fn replace_latest_global_point(
    storage: &mut dyn Storage,
    point: &Point,
) -> StdResult<u64> {
    let epoch = current_epoch(storage)?;
    POINT_HISTORY.save(storage, epoch, point)?;
    Ok(epoch)
}

/// # Description
/// Stores `point` under the next epoch of `user` and returns that epoch.
pub(crate) fn append_user_point(
    storage: &mut dyn Storage,
    user: &Addr,
    point: &Point,
) -> StdResult<u64> {
    let epoch = current_user_epoch(storage, user)? + 1;
    USER_POINT_HISTORY.save(storage, (user, epoch), point)?;
    USER_POINT_EPOCH.save(storage, user, &epoch)?;
    Ok(epoch)
}

/// # Description
/// Finds the greatest epoch in `[0, max_epoch]` for which `is_before` holds, assuming
/// `is_before` is monotonic (true up to some epoch, false afterwards).
/// Returns 0 when no epoch qualifies.
pub(crate) fn bisect<F>(max_epoch: u64, mut is_before: F) -> StdResult<u64>
where
    F: FnMut(u64) -> StdResult<bool>,
{
    let mut min = 0u64;
    let mut max = max_epoch;
    for _ in 0..MAX_BISECT_ITERATIONS {
        if min >= max {
            break;
        }
        let mid = (min + max + 1) / 2;
        if is_before(mid)? {
            min = mid;
        } else {
            max = mid - 1;
        }
    }
    Ok(min)
}

/// # Description
/// Latest global epoch recorded at or before `block`.
pub(crate) fn find_block_epoch(storage: &dyn Storage, block: u64, max_epoch: u64) -> StdResult<u64> {
    bisect(max_epoch, |epoch| Ok(global_point(storage, epoch)?.blk <= block))
}

/// # Description
/// Latest global epoch recorded at or before `time`.
pub(crate) fn find_timestamp_epoch(
    storage: &dyn Storage,
    time: u64,
    max_epoch: u64,
) -> StdResult<u64> {
    bisect(max_epoch, |epoch| Ok(global_point(storage, epoch)?.ts <= time))
}

/// # Description
/// Latest epoch of `user` recorded at or before `block`.
pub(crate) fn find_user_block_epoch(storage: &dyn Storage, user: &Addr, block: u64) -> StdResult<u64> {
    let max_epoch = current_user_epoch(storage, user)?;
    bisect(max_epoch, |epoch| Ok(user_point(storage, user, epoch)?.blk <= block))
}

/// # Description
/// Latest epoch of `user` recorded at or before `time`.
pub(crate) fn find_user_timestamp_epoch(
    storage: &dyn Storage,
    user: &Addr,
    time: u64,
) -> StdResult<u64> {
    let max_epoch = current_user_epoch(storage, user)?;
    bisect(max_epoch, |epoch| Ok(user_point(storage, user, epoch)?.ts <= time))
}
