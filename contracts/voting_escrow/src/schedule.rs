use crate::state::SLOPE_CHANGES;
use crate::utils::{DEFAULT_LIMIT, MAX_LIMIT};
use cosmwasm_std::{Order, StdResult, Storage, Uint128};
use cw_storage_plus::Bound;

/// # Description
/// Slope scheduled for removal at `time`, zero if nothing is scheduled.
pub(crate) fn slope_change(storage: &dyn Storage, time: u64) -> StdResult<Uint128> {
    Ok(SLOPE_CHANGES.may_load(storage, time)?.unwrap_or_default())
}

/// # Description
/// Overwrites the slope scheduled at `time`. A zero slope removes the entry.
pub(crate) fn set_slope_change(storage: &mut dyn Storage, time: u64, slope: Uint128) -> StdResult<()> {
    if slope.is_zero() {
        SLOPE_CHANGES.remove(storage, time);
        Ok(())
    } else {
        SLOPE_CHANGES.save(storage, time, &slope)
    }
}

/// # Description
/// Adds `delta` to the slope scheduled at `time`.
pub(crate) fn add_slope_change(storage: &mut dyn Storage, time: u64, delta: Uint128) -> StdResult<()> {
    let slope = slope_change(storage, time)?.checked_add(delta)?;
    set_slope_change(storage, time, slope)
}

/// # Description
/// Lists scheduled slope changes starting after `start_after` in the given order.
pub(crate) fn fetch_slope_changes(
    storage: &dyn Storage,
    start_after: Option<u64>,
    limit: Option<u32>,
    order: Order,
) -> StdResult<Vec<(u64, Uint128)>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let bound = start_after.map(Bound::exclusive);
    let (min, max) = match order {
        Order::Ascending => (bound, None),
        Order::Descending => (None, bound),
    };
    SLOPE_CHANGES
        .range(storage, min, max, order)
        .take(limit)
        .collect()
}
