use crate::history::{
    current_epoch, find_block_epoch, find_timestamp_epoch, find_user_block_epoch,
    find_user_timestamp_epoch, global_point, user_point,
};
use crate::schedule::slope_change;
use crate::state::Point;
use crate::utils::{decay, round_to_week, MAX_REPLAY_WEEKS, WEEK};
use cosmwasm_std::{Addr, Env, StdError, StdResult, Storage, Uint128};

/// # Description
/// Calculates user's voting power at the given time using the latest user point
/// recorded at or before that time.
pub(crate) fn balance_of(storage: &dyn Storage, user: &Addr, time: u64) -> StdResult<Uint128> {
    let epoch = find_user_timestamp_epoch(storage, user, time)?;
    if epoch == 0 {
        return Ok(Uint128::zero());
    }
    let point = user_point(storage, user, epoch)?;
    Ok(decay(point.bias, point.slope, time - point.ts))
}

/// # Description
/// Calculates user's voting power at the given block. The block time is estimated
/// from the global history.
pub(crate) fn balance_of_at(
    storage: &dyn Storage,
    env: &Env,
    user: &Addr,
    block: u64,
) -> StdResult<Uint128> {
    check_block(env, block)?;
    let user_epoch = find_user_block_epoch(storage, user, block)?;
    if user_epoch == 0 {
        return Ok(Uint128::zero());
    }
    let point = user_point(storage, user, user_epoch)?;
    let (_, block_time) = block_time(storage, env, block)?;
    Ok(decay(
        point.bias,
        point.slope,
        block_time.saturating_sub(point.ts),
    ))
}

/// # Description
/// Calculates total voting power at the given time starting from the latest global point
/// recorded at or before that time.
pub(crate) fn total_supply(storage: &dyn Storage, time: u64) -> StdResult<Uint128> {
    let max_epoch = current_epoch(storage)?;
    let epoch = find_timestamp_epoch(storage, time, max_epoch)?;
    let point = global_point(storage, epoch)?;
    supply_at(storage, point, time)
}

/// # Description
/// Calculates total voting power at the given block.
pub(crate) fn total_supply_at(storage: &dyn Storage, env: &Env, block: u64) -> StdResult<Uint128> {
    check_block(env, block)?;
    let (point, time) = block_time(storage, env, block)?;
    supply_at(storage, point, time)
}

/// # Description
/// Replays the global curve from `point` to `time` without touching storage,
/// applying scheduled slope changes on every week boundary on the way.
pub(crate) fn supply_at(storage: &dyn Storage, point: Point, time: u64) -> StdResult<Uint128> {
    if time < point.ts {
        return Ok(Uint128::zero());
    }
    let mut last_point = point;
    let mut t_i = round_to_week(last_point.ts);
    for _ in 0..MAX_REPLAY_WEEKS {
        t_i += WEEK;
        let mut d_slope = Uint128::zero();
        if t_i > time {
            t_i = time;
        } else {
            d_slope = slope_change(storage, t_i)?;
        }
        last_point.bias = decay(last_point.bias, last_point.slope, t_i - last_point.ts);
        if t_i == time {
            break;
        }
        last_point.slope = last_point.slope.saturating_sub(d_slope);
        last_point.ts = t_i;
    }
    Ok(last_point.bias)
}

/// # Description
/// Estimates the timestamp of `block` by linear interpolation between the two global
/// points around it, or between the latest point and the current block.
/// Returns the global point preceding the block along with the estimated time.
pub(crate) fn block_time(storage: &dyn Storage, env: &Env, block: u64) -> StdResult<(Point, u64)> {
    let max_epoch = current_epoch(storage)?;
    let epoch = find_block_epoch(storage, block, max_epoch)?;
    let point = global_point(storage, epoch)?;

    let (d_block, d_t) = if epoch < max_epoch {
        let next_point = global_point(storage, epoch + 1)?;
        (next_point.blk - point.blk, next_point.ts - point.ts)
    } else {
        (
            env.block.height.saturating_sub(point.blk),
            env.block.time.seconds().saturating_sub(point.ts),
        )
    };

    let mut time = point.ts;
    if d_block != 0 {
        let shift = Uint128::from(d_t).multiply_ratio(block.saturating_sub(point.blk), d_block);
        time += shift.u128() as u64;
    }
    Ok((point, time))
}

fn check_block(env: &Env, block: u64) -> StdResult<()> {
    if block > env.block.height {
        Err(StdError::generic_err("Block is in the future"))
    } else {
        Ok(())
    }
}
