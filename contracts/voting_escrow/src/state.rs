use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ve_ledger::voting_escrow::{DecayFormula, PointResponse};

/// ## Description
/// This structure describes the main control config of voting escrow contract.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct Config {
    /// cw20 token accepted for locking
    pub deposit_token: Addr,
    /// minimum lock duration in seconds
    pub min_lock_time: u64,
    /// maximum lock duration in seconds
    pub max_lock_time: u64,
    /// voting power curve
    pub formula: DecayFormula,
}

/// ## Description
/// This structure describes the point in checkpoints history.
/// Voting power at `t >= ts` equals `bias - slope * (t - ts)` floored at zero.
/// Both are kept in whole voting power units, so global values are exact sums of user values.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct Point {
    /// voting power at `ts`
    pub bias: Uint128,
    /// voting power decay per second
    pub slope: Uint128,
    /// timestamp of the point
    pub ts: u64,
    /// block height of the point
    pub blk: u64,
}

impl From<Point> for PointResponse {
    fn from(point: Point) -> Self {
        PointResponse {
            bias: point.bias,
            slope: point.slope,
            ts: point.ts,
            blk: point.blk,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct Lock {
    /// the total tokens were deposited
    pub amount: Uint128,
    /// the time when lock was created
    pub start: u64,
    /// the week-aligned time when the lock expires, 0 if there is no lock
    pub end: u64,
}

/// ## Description
/// Stores config at the given key
pub const CONFIG: Item<Config> = Item::new("config");

/// ## Description
/// Stores all user locks
pub const LOCKED: Map<&Addr, Lock> = Map::new("locked");

/// ## Description
/// Sum of all locked tokens
pub const TOTAL_LOCKED: Item<Uint128> = Item::new("total_locked");

/// ## Description
/// Latest epoch of the global curve
pub const EPOCH: Item<u64> = Item::new("epoch");

/// ## Description
/// Global curve checkpoints per epoch. Epoch 0 is written at instantiation.
pub const POINT_HISTORY: Map<u64, Point> = Map::new("point_history");

/// ## Description
/// Latest epoch of each user curve
pub const USER_POINT_EPOCH: Map<&Addr, u64> = Map::new("user_point_epoch");

/// ## Description
/// User curve checkpoints per composed key (addr, user epoch). User epochs start from 1.
pub const USER_POINT_HISTORY: Map<(&Addr, u64), Point> = Map::new("user_point_history");

/// ## Description
/// Slope to remove from the global curve at a week-aligned timestamp
pub const SLOPE_CHANGES: Map<u64, Uint128> = Map::new("slope_changes");
