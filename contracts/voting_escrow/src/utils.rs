use crate::error::ContractError;
use crate::state::Config;
use cosmwasm_std::{Addr, Api, StdError, StdResult, Uint128};

/// Seconds in one week. Lock ends and slope changes are aligned to it.
pub const WEEK: u64 = 7 * 86400; // lock end is rounded down by week

/// Default minimum lock duration in seconds.
pub const MIN_LOCK_TIME: u64 = WEEK;

/// Default maximum lock duration in seconds.
pub const MAX_LOCK_TIME: u64 = 4 * 365 * 86400; // 4 years

/// Upper bound of weekly steps replayed by a single checkpoint (~5 years).
pub const MAX_REPLAY_WEEKS: u64 = 255;

/// Iteration cap for binary searches over epochs.
pub const MAX_BISECT_ITERATIONS: u32 = 128;

/// ## Pagination settings
/// The default amount of items to read from
pub const DEFAULT_LIMIT: u32 = 10;

/// The maximum amount of items that can be read at once from
pub const MAX_LIMIT: u32 = 30;

/// # Description
/// Rounds the time down to the beginning of its week.
pub fn round_to_week(time: u64) -> u64 {
    time / WEEK * WEEK
}

/// # Description
/// Checks the lock duration is within the configured limits
pub(crate) fn time_limits_check(config: &Config, time: u64) -> Result<(), ContractError> {
    if !(config.min_lock_time..=config.max_lock_time).contains(&time) {
        Err(ContractError::LockTimeLimitsError {})
    } else {
        Ok(())
    }
}

/// # Description
/// Number of weekly steps a replay from `last_ts` needs to reach `now`.
pub(crate) fn replay_steps(last_ts: u64, now: u64) -> u64 {
    let distance = now.saturating_sub(round_to_week(last_ts));
    ((distance + WEEK - 1) / WEEK).max(1)
}

/// # Description
/// Main calculation function by formula: bias - slope * dt, floored at zero.
/// An overflowing shift decays the bias completely.
pub(crate) fn decay(bias: Uint128, slope: Uint128, dt: u64) -> Uint128 {
    let shift = slope
        .checked_mul(Uint128::from(dt))
        .unwrap_or(Uint128::MAX);
    bias.saturating_sub(shift)
}

/// # Description
/// Estimates the block height at `time` by linear interpolation between
/// (`last_ts`, `last_blk`) and (`now`, `height`).
pub(crate) fn interpolate_block(last_ts: u64, last_blk: u64, now: u64, height: u64, time: u64) -> u64 {
    if now <= last_ts {
        return last_blk;
    }
    let shift = Uint128::from(height.saturating_sub(last_blk))
        .multiply_ratio(time.saturating_sub(last_ts), now - last_ts);
    last_blk + shift.u128() as u64
}

/// ## Description
/// Returns a lowercased, validated address upon success. Otherwise returns [`Err`]
/// ## Params
/// * **api** is an object of type [`Api`]
///
/// * **addr** is an object of type [`Addr`]
pub fn addr_validate_to_lower(api: &dyn Api, addr: &str) -> StdResult<Addr> {
    if addr.to_lowercase() != addr {
        return Err(StdError::generic_err(format!(
            "Address {} should be lowercase",
            addr
        )));
    }
    api.addr_validate(addr)
}
