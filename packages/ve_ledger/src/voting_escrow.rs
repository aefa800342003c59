use cosmwasm_std::{Decimal, Order, Uint128};
use cw20::Cw20ReceiveMsg;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ## Description
/// Voting power curve applied to every lock. All variants decay linearly with the
/// time remaining until unlock, so `bias(t) = slope * (end - t)` holds for each of them.
/// The slope is a whole number of voting power units per second.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecayFormula {
    /// slope = amount / max_lock_time
    Linear {},
    /// slope = amount * (1 - advance_percentage) / max_lock_time
    Discounted { advance_percentage: Decimal },
}

impl Default for DecayFormula {
    fn default() -> Self {
        DecayFormula::Linear {}
    }
}

/// ## Description
/// This structure describes the basic settings for creating a contract.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct InstantiateMsg {
    /// cw20 token accepted for locking
    pub deposit_token: String,
    /// minimum lock duration in seconds, one week by default
    pub min_lock_time: Option<u64>,
    /// maximum lock duration in seconds, four years by default
    pub max_lock_time: Option<u64>,
    /// voting power curve, linear by default
    pub formula: Option<DecayFormula>,
    /// name of the virtual voting token
    pub token_name: Option<String>,
    /// symbol of the virtual voting token
    pub token_symbol: Option<String>,
    /// decimals of the virtual voting token
    pub token_decimals: Option<u8>,
}

/// ## Description
/// This structure describes the execute messages of the contract.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Receives a message of type [`Cw20ReceiveMsg`] and processes it depending on the received
    /// template.
    Receive(Cw20ReceiveMsg),
    /// Moves the sender's unlock time forward. The time is rounded down to a whole week.
    IncreaseUnlockTime { unlock_time: u64 },
    /// Withdraws tokens from an expired lock. `None` withdraws everything.
    Withdraw { amount: Option<Uint128> },
    /// Records the global curve up to the current block time.
    Checkpoint {},
}

/// ## Description
/// This structure describes the cw20 hook messages of the contract.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Cw20HookMsg {
    CreateLock { unlock_time: u64 },
    IncreaseAmount {},
    DepositFor { user: String },
}

/// Iteration order of paginated queries. Ascending when omitted.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    Asc,
    Desc,
}

impl From<OrderBy> for Order {
    fn from(order_by: OrderBy) -> Order {
        match order_by {
            OrderBy::Asc => Order::Ascending,
            OrderBy::Desc => Order::Descending,
        }
    }
}

/// ## Description
/// This structure describes the query messages of the contract.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    Balance {
        user: String,
        time: Option<u64>,
    },
    BalanceAt {
        user: String,
        block: u64,
    },
    TotalSupply {
        time: Option<u64>,
    },
    TotalSupplyAt {
        block: u64,
    },
    LockedEnd {
        user: String,
    },
    LockInfo {
        user: String,
    },
    TotalLocked {},
    Epoch {},
    UserEpoch {
        user: String,
    },
    PointHistory {
        epoch: u64,
    },
    UserPointHistory {
        user: String,
        epoch: u64,
    },
    LastUserSlope {
        user: String,
    },
    SlopeChanges {
        start_after: Option<u64>,
        limit: Option<u32>,
        order_by: Option<OrderBy>,
    },
    Config {},
    TokenInfo {},
}

/// ## Description
/// This structure describes voting power response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct VotingPowerResponse {
    pub voting_power: Uint128,
}

/// ## Description
/// This structure describes last user slope response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct UserSlopeResponse {
    pub slope: Uint128,
}

/// ## Description
/// This structure describes user unlock time (lock end).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct LockedEndResponse {
    pub end: u64,
}

/// ## Description
/// This structure describes lock information response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct LockInfoResponse {
    pub amount: Uint128,
    pub start: u64,
    pub end: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct TotalLockedResponse {
    pub amount: Uint128,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct EpochResponse {
    pub epoch: u64,
}

/// ## Description
/// A recorded point of a global or per-user decay curve.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct PointResponse {
    pub bias: Uint128,
    pub slope: Uint128,
    pub ts: u64,
    pub blk: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct SlopeChangeInfo {
    pub time: u64,
    pub slope: Uint128,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct SlopeChangesResponse {
    pub slope_changes: Vec<SlopeChangeInfo>,
}

/// ## Description
/// This structure describes config response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ConfigResponse {
    pub deposit_token: String,
    pub min_lock_time: u64,
    pub max_lock_time: u64,
    pub formula: DecayFormula,
}
