use crate::error::ContractError;
use crate::formula::DecayCurve;
use crate::history::{
    append_global_point, append_user_point, current_epoch, replace_latest_global_point,
};
use crate::schedule::{add_slope_change, set_slope_change, slope_change};
use crate::state::{Config, Lock, Point, POINT_HISTORY};
use crate::utils::{decay, interpolate_block, replay_steps, round_to_week, MAX_REPLAY_WEEKS, WEEK};
use cosmwasm_std::{Addr, DepsMut, Env, Uint128};

/// ## Description
/// A change of one user's lock that must be reflected in the curves.
pub(crate) struct LockChange<'a> {
    pub user: &'a Addr,
    pub old: &'a Lock,
    pub new: &'a Lock,
}

/// ## Description
/// Outcome of a checkpoint.
#[derive(Debug, PartialEq)]
pub(crate) struct CheckpointResult {
    /// latest global epoch after the checkpoint
    pub epoch: u64,
    /// whether the global curve was replayed up to the current block time
    pub caught_up: bool,
}

/// ## Description
/// Checkpoints the global curve and, if `change` is given, the user's curve.
/// The function replays every week boundary passed since the last global point,
/// applying slope changes scheduled on them and saving one global point per boundary,
/// then records the global point for the current block time.
/// For a lock change the user's old and new bias/slope deltas are applied to that point,
/// the scheduled slope changes at the old and new lock ends are moved accordingly,
/// and one new point is appended to the user's history.
///
/// At most [`MAX_REPLAY_WEEKS`] boundaries are replayed per call. A global-only checkpoint
/// that can't reach the current time saves its progress and reports `caught_up: false`,
/// while a lock change in that situation fails with [`ContractError::CheckpointRequired`].
pub(crate) fn checkpoint(
    deps: DepsMut,
    env: &Env,
    config: &Config,
    change: Option<LockChange>,
) -> Result<CheckpointResult, ContractError> {
    let now = env.block.time.seconds();
    let height = env.block.height;

    let epoch = current_epoch(deps.storage)?;
    let mut last_point = POINT_HISTORY
        .may_load(deps.storage, epoch)?
        .unwrap_or(Point {
            ts: now,
            blk: height,
            ..Point::default()
        });
    let initial_point = last_point.clone();

    if change.is_some() && replay_steps(initial_point.ts, now) > MAX_REPLAY_WEEKS {
        return Err(ContractError::CheckpointRequired {});
    }

    let mut u_old = Point::default();
    let mut u_new = Point::default();
    let mut old_dslope = Uint128::zero();
    if let Some(change) = &change {
        u_old = config
            .formula
            .lock_point(change.old, config.max_lock_time, now)?;
        u_new = config
            .formula
            .lock_point(change.new, config.max_lock_time, now)?;
        old_dslope = slope_change(deps.storage, change.old.end)?;
    }

    // replay passed weeks
    let mut t_i = round_to_week(last_point.ts);
    let mut caught_up = false;
    for _ in 0..MAX_REPLAY_WEEKS {
        t_i += WEEK;
        let mut d_slope = Uint128::zero();
        if t_i > now {
            t_i = now;
        } else {
            d_slope = slope_change(deps.storage, t_i)?;
        }
        last_point.bias = decay(last_point.bias, last_point.slope, t_i - last_point.ts);
        last_point.slope = last_point.slope.saturating_sub(d_slope);
        last_point.ts = t_i;
        if t_i == now {
            last_point.blk = height;
            caught_up = true;
            break;
        }
        last_point.blk = interpolate_block(
            initial_point.ts,
            initial_point.blk,
            now,
            height,
            t_i,
        );
        append_global_point(deps.storage, &last_point)?;
    }

    if !caught_up {
        return Ok(CheckpointResult {
            epoch: current_epoch(deps.storage)?,
            caught_up,
        });
    }

    if change.is_some() {
        last_point.slope = last_point
            .slope
            .checked_add(u_new.slope)?
            .saturating_sub(u_old.slope);
        last_point.bias = last_point
            .bias
            .checked_add(u_new.bias)?
            .saturating_sub(u_old.bias);
    }

    // a point for the current time already exists only if nothing was replayed
    let epoch = if epoch > 0 && initial_point.ts == now {
        replace_latest_global_point(deps.storage, &last_point)?
    } else {
        append_global_point(deps.storage, &last_point)?
    };

    if let Some(change) = change {
        if change.old.end > now {
            // cancel the old slope, keep the new one if the end didn't move
            let mut scheduled = old_dslope;
            if change.new.end == change.old.end {
                scheduled = scheduled.checked_add(u_new.slope)?;
            }
            set_slope_change(
                deps.storage,
                change.old.end,
                scheduled.saturating_sub(u_old.slope),
            )?;
        }
        if change.new.end > now && change.new.end > change.old.end {
            add_slope_change(deps.storage, change.new.end, u_new.slope)?;
        }

        append_user_point(
            deps.storage,
            change.user,
            &Point {
                ts: now,
                blk: height,
                ..u_new
            },
        )?;
    }

    Ok(CheckpointResult { epoch, caught_up })
}
