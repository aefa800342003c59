#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    attr, from_json, to_json_binary, Addr, Binary, CosmosMsg, Decimal, Deps, DepsMut, Env,
    MessageInfo, Response, StdError, StdResult, Uint128, WasmMsg,
};
use cw2::set_contract_version;
use cw20::{Cw20ExecuteMsg, Cw20ReceiveMsg, TokenInfoResponse};
use cw20_base::state::{TokenInfo, TOKEN_INFO};

use crate::checkpoint::{checkpoint, LockChange};
use crate::error::ContractError;
use crate::history::{current_epoch, current_user_epoch, global_point, user_point};
use crate::queries::{balance_of, balance_of_at, total_supply, total_supply_at};
use crate::schedule::fetch_slope_changes;
use crate::state::{Config, Lock, Point, CONFIG, EPOCH, LOCKED, POINT_HISTORY, TOTAL_LOCKED};
use crate::utils::{
    addr_validate_to_lower, round_to_week, time_limits_check, MAX_LOCK_TIME, MIN_LOCK_TIME,
};
use ve_ledger::voting_escrow::{
    ConfigResponse, Cw20HookMsg, DecayFormula, EpochResponse, ExecuteMsg, InstantiateMsg,
    LockInfoResponse, LockedEndResponse, OrderBy, PointResponse, QueryMsg, SlopeChangeInfo,
    SlopeChangesResponse, TotalLockedResponse, UserSlopeResponse, VotingPowerResponse,
};

/// Contract name that is used for migration.
const CONTRACT_NAME: &str = "ve-voting-escrow";
/// Contract version that is used for migration.
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// ## Description
/// Creates a new contract with the specified parameters in the [`InstantiateMsg`].
/// Records the genesis point of the global curve at epoch 0.
/// Returns the default object of type [`Response`] if the operation was successful,
/// or a [`ContractError`] if the configuration is invalid.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.deposit_token.is_empty() {
        return Err(invalid_config("deposit token address is empty"));
    }
    let min_lock_time = msg.min_lock_time.unwrap_or(MIN_LOCK_TIME);
    let max_lock_time = msg.max_lock_time.unwrap_or(MAX_LOCK_TIME);
    if min_lock_time == 0 || max_lock_time == 0 {
        return Err(invalid_config("lock time limits must be greater than zero"));
    }
    if min_lock_time > max_lock_time {
        return Err(invalid_config("min lock time exceeds max lock time"));
    }
    let formula = msg.formula.unwrap_or_default();
    if let DecayFormula::Discounted { advance_percentage } = &formula {
        if *advance_percentage >= Decimal::one() {
            return Err(invalid_config("advance percentage must be less than 100%"));
        }
    }

    let token_info = TokenInfo {
        name: msg.token_name.unwrap_or_else(|| "veToken".to_string()),
        symbol: msg.token_symbol.unwrap_or_else(|| "veToken".to_string()),
        decimals: msg.token_decimals.unwrap_or(6),
        total_supply: Uint128::zero(),
        mint: None,
    };
    if token_info.decimals > 18 {
        return Err(invalid_config("decimals must not exceed 18"));
    }
    if !(3..=50).contains(&token_info.name.len()) {
        return Err(invalid_config("name is not in the expected length (3..50)"));
    }
    if !(3..=12).contains(&token_info.symbol.len()) {
        return Err(invalid_config("symbol is not in the expected length (3..12)"));
    }
    TOKEN_INFO.save(deps.storage, &token_info)?;

    let config = Config {
        deposit_token: addr_validate_to_lower(deps.api, &msg.deposit_token)?,
        min_lock_time,
        max_lock_time,
        formula,
    };
    CONFIG.save(deps.storage, &config)?;

    let genesis = Point {
        ts: env.block.time.seconds(),
        blk: env.block.height,
        ..Point::default()
    };
    POINT_HISTORY.save(deps.storage, 0, &genesis)?;
    EPOCH.save(deps.storage, &0)?;
    TOTAL_LOCKED.save(deps.storage, &Uint128::zero())?;

    Ok(Response::default())
}

fn invalid_config(reason: &str) -> ContractError {
    ContractError::InvalidConfig {
        reason: reason.to_string(),
    }
}

/// ## Description
/// Parses execute message and route it to intended function. Returns [`Response`] if execution succeed
/// or [`ContractError`] if error occurred.
///
/// ## Execute messages
/// * **ExecuteMsg::Receive(msg)** parse incoming message from the deposit token.
/// msg should have [`Cw20ReceiveMsg`] type.
///
/// * **ExecuteMsg::IncreaseUnlockTime { unlock_time }** move the sender's unlock time forward
///
/// * **ExecuteMsg::Withdraw { amount }** withdraw tokens from the sender's expired lock
///
/// * **ExecuteMsg::Checkpoint {}** record the global curve up to the current time
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Receive(msg) => receive_cw20(deps, env, info, msg),
        ExecuteMsg::IncreaseUnlockTime { unlock_time } => {
            increase_unlock_time(deps, env, info, unlock_time)
        }
        ExecuteMsg::Withdraw { amount } => withdraw(deps, env, info, amount),
        ExecuteMsg::Checkpoint {} => global_checkpoint(deps, env),
    }
}

/// ## Description
/// Receives a message of type [`Cw20ReceiveMsg`] and processes it depending on the received template.
/// Only the configured deposit token may send it. The tokens are already transferred
/// to the contract when this is called, and an error reverts that transfer.
fn receive_cw20(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.deposit_token {
        return Err(ContractError::Unauthorized {});
    }
    let sender = addr_validate_to_lower(deps.api, &cw20_msg.sender)?;

    match from_json(&cw20_msg.msg)? {
        Cw20HookMsg::CreateLock { unlock_time } => {
            create_lock(deps, env, config, sender, cw20_msg.amount, unlock_time)
        }
        Cw20HookMsg::IncreaseAmount {} => deposit_for(deps, env, config, sender, cw20_msg.amount),
        Cw20HookMsg::DepositFor { user } => {
            let user = addr_validate_to_lower(deps.api, &user)?;
            deposit_for(deps, env, config, user, cw20_msg.amount)
        }
    }
}

/// ## Description
/// Loads the user's lock if it holds any tokens.
fn load_active_lock(deps: Deps, user: &Addr) -> Result<Lock, ContractError> {
    // 'LockDoesntExist' is either a lock does not exist in LOCKED or a lock exits but lock.amount == 0
    LOCKED
        .may_load(deps.storage, user)?
        .filter(|lock| !lock.amount.is_zero())
        .ok_or(ContractError::LockDoesntExist {})
}

/// ## Description
/// Creates a lock for the user until `unlock_time` rounded down by week.
/// Evaluates that the lock duration is within the configured limits.
/// If the user has tokens locked already, then an [`ContractError`] is returned.
fn create_lock(
    mut deps: DepsMut,
    env: Env,
    config: Config,
    user: Addr,
    amount: Uint128,
    unlock_time: u64,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }
    let old_lock = LOCKED.may_load(deps.storage, &user)?.unwrap_or_default();
    if !old_lock.amount.is_zero() {
        return Err(ContractError::LockAlreadyExists {});
    }

    let now = env.block.time.seconds();
    let end = round_to_week(unlock_time);
    if end <= now {
        return Err(ContractError::LockTimeLimitsError {});
    }
    time_limits_check(&config, end - now)?;

    let total_locked = TOTAL_LOCKED.load(deps.storage)?.checked_add(amount)?;

    let new_lock = Lock {
        amount,
        start: now,
        end,
    };
    let res = checkpoint(
        deps.branch(),
        &env,
        &config,
        Some(LockChange {
            user: &user,
            old: &old_lock,
            new: &new_lock,
        }),
    )?;
    LOCKED.save(deps.storage, &user, &new_lock)?;
    TOTAL_LOCKED.save(deps.storage, &total_locked)?;

    Ok(Response::default().add_attributes(vec![
        attr("action", "create_lock"),
        attr("user", user),
        attr("amount", amount),
        attr("unlock_time", end.to_string()),
        attr("epoch", res.epoch.to_string()),
    ]))
}

/// ## Description
/// Deposits 'amount' tokens to 'user' lock without changing its unlock time.
/// Only the user's curve is checkpointed, never the depositor's.
/// If the lock doesn't exist or it expired, then an [`ContractError`] is returned.
fn deposit_for(
    mut deps: DepsMut,
    env: Env,
    config: Config,
    user: Addr,
    amount: Uint128,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }
    let old_lock = load_active_lock(deps.as_ref(), &user)?;
    if old_lock.end <= env.block.time.seconds() {
        return Err(ContractError::LockExpired {});
    }

    let new_lock = Lock {
        amount: old_lock.amount.checked_add(amount)?,
        ..old_lock.clone()
    };
    let total_locked = TOTAL_LOCKED.load(deps.storage)?.checked_add(amount)?;
    let res = checkpoint(
        deps.branch(),
        &env,
        &config,
        Some(LockChange {
            user: &user,
            old: &old_lock,
            new: &new_lock,
        }),
    )?;
    LOCKED.save(deps.storage, &user, &new_lock)?;
    TOTAL_LOCKED.save(deps.storage, &total_locked)?;

    Ok(Response::default().add_attributes(vec![
        attr("action", "deposit_for"),
        attr("user", user),
        attr("amount", amount),
        attr("epoch", res.epoch.to_string()),
    ]))
}

/// ## Description
/// Moves the sender's unlock time to `unlock_time` rounded down by week.
/// The new end must be later than the current one and within the max lock time from now.
/// If lock doesn't exist or it expired, then an [`ContractError`] is returned.
fn increase_unlock_time(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    unlock_time: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let user = info.sender;
    let old_lock = load_active_lock(deps.as_ref(), &user)?;

    let now = env.block.time.seconds();
    if old_lock.end <= now {
        return Err(ContractError::LockExpired {});
    }
    let end = round_to_week(unlock_time);
    if end <= old_lock.end {
        return Err(ContractError::LockTimeMustIncrease {});
    }
    if end - now > config.max_lock_time {
        return Err(ContractError::LockTimeLimitsError {});
    }

    let new_lock = Lock {
        end,
        ..old_lock.clone()
    };
    let res = checkpoint(
        deps.branch(),
        &env,
        &config,
        Some(LockChange {
            user: &user,
            old: &old_lock,
            new: &new_lock,
        }),
    )?;
    LOCKED.save(deps.storage, &user, &new_lock)?;

    Ok(Response::default().add_attributes(vec![
        attr("action", "increase_unlock_time"),
        attr("user", user),
        attr("unlock_time", end.to_string()),
        attr("epoch", res.epoch.to_string()),
    ]))
}

/// ## Description
/// Withdraws `amount` (the whole lock if `None`) of locked tokens once the lock expired.
/// The lock is cleared when nothing remains in it.
/// If lock doesn't exist, it has not yet expired or holds less than `amount`,
/// then an [`ContractError`] is returned.
fn withdraw(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Option<Uint128>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let sender = info.sender;
    let old_lock = load_active_lock(deps.as_ref(), &sender)?;

    if old_lock.end > env.block.time.seconds() {
        return Err(ContractError::LockHasNotExpired {});
    }
    let amount = amount.unwrap_or(old_lock.amount);
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }
    let remaining = old_lock
        .amount
        .checked_sub(amount)
        .map_err(|_| ContractError::InsufficientStaked {})?;

    let total_locked = TOTAL_LOCKED.load(deps.storage)?.checked_sub(amount)?;

    let new_lock = if remaining.is_zero() {
        Lock::default()
    } else {
        Lock {
            amount: remaining,
            ..old_lock.clone()
        }
    };
    let res = checkpoint(
        deps.branch(),
        &env,
        &config,
        Some(LockChange {
            user: &sender,
            old: &old_lock,
            new: &new_lock,
        }),
    )?;
    LOCKED.save(deps.storage, &sender, &new_lock)?;
    TOTAL_LOCKED.save(deps.storage, &total_locked)?;

    let transfer_msg = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.deposit_token.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
            recipient: sender.to_string(),
            amount,
        })?,
        funds: vec![],
    });

    Ok(Response::default()
        .add_message(transfer_msg)
        .add_attributes(vec![
            attr("action", "withdraw"),
            attr("user", sender),
            attr("amount", amount),
            attr("epoch", res.epoch.to_string()),
        ]))
}

/// ## Description
/// Records the global curve up to the current block time. Anyone can call it.
/// When more weeks passed than a single call can replay, `caught_up` is `false`
/// and the call should be repeated.
fn global_checkpoint(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let res = checkpoint(deps, &env, &config, None)?;

    Ok(Response::default().add_attributes(vec![
        attr("action", "checkpoint"),
        attr("epoch", res.epoch.to_string()),
        attr("caught_up", res.caught_up.to_string()),
    ]))
}

/// # Description
/// Describes all query messages.
/// ## Queries
/// * **QueryMsg::Balance { user, time }** user's voting power at the given or current time
/// * **QueryMsg::BalanceAt { user, block }** user's voting power at the given block
/// * **QueryMsg::TotalSupply { time }** total voting power at the given or current time
/// * **QueryMsg::TotalSupplyAt { block }** total voting power at the given block
/// * **QueryMsg::LockedEnd { user }** user's unlock time
/// * **QueryMsg::LockInfo { user }** user's lock information
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Balance { user, time } => {
            let user = addr_validate_to_lower(deps.api, &user)?;
            let time = time.unwrap_or_else(|| env.block.time.seconds());
            to_json_binary(&VotingPowerResponse {
                voting_power: balance_of(deps.storage, &user, time)?,
            })
        }
        QueryMsg::BalanceAt { user, block } => {
            let user = addr_validate_to_lower(deps.api, &user)?;
            to_json_binary(&VotingPowerResponse {
                voting_power: balance_of_at(deps.storage, &env, &user, block)?,
            })
        }
        QueryMsg::TotalSupply { time } => {
            let time = time.unwrap_or_else(|| env.block.time.seconds());
            to_json_binary(&VotingPowerResponse {
                voting_power: total_supply(deps.storage, time)?,
            })
        }
        QueryMsg::TotalSupplyAt { block } => to_json_binary(&VotingPowerResponse {
            voting_power: total_supply_at(deps.storage, &env, block)?,
        }),
        QueryMsg::LockedEnd { user } => {
            let lock = get_user_lock(deps, &user)?;
            to_json_binary(&LockedEndResponse { end: lock.end })
        }
        QueryMsg::LockInfo { user } => to_json_binary(&get_user_lock_info(deps, &user)?),
        QueryMsg::TotalLocked {} => to_json_binary(&TotalLockedResponse {
            amount: TOTAL_LOCKED.may_load(deps.storage)?.unwrap_or_default(),
        }),
        QueryMsg::Epoch {} => to_json_binary(&EpochResponse {
            epoch: current_epoch(deps.storage)?,
        }),
        QueryMsg::UserEpoch { user } => {
            let user = addr_validate_to_lower(deps.api, &user)?;
            to_json_binary(&EpochResponse {
                epoch: current_user_epoch(deps.storage, &user)?,
            })
        }
        QueryMsg::PointHistory { epoch } => {
            to_json_binary(&PointResponse::from(global_point(deps.storage, epoch)?))
        }
        QueryMsg::UserPointHistory { user, epoch } => {
            let user = addr_validate_to_lower(deps.api, &user)?;
            to_json_binary(&PointResponse::from(user_point(
                deps.storage,
                &user,
                epoch,
            )?))
        }
        QueryMsg::LastUserSlope { user } => {
            let user = addr_validate_to_lower(deps.api, &user)?;
            let epoch = current_user_epoch(deps.storage, &user)?;
            to_json_binary(&UserSlopeResponse {
                slope: user_point(deps.storage, &user, epoch)?.slope,
            })
        }
        QueryMsg::SlopeChanges {
            start_after,
            limit,
            order_by,
        } => to_json_binary(&get_slope_changes(deps, start_after, limit, order_by)?),
        QueryMsg::Config {} => {
            let config = CONFIG.load(deps.storage)?;
            to_json_binary(&ConfigResponse {
                deposit_token: config.deposit_token.to_string(),
                min_lock_time: config.min_lock_time,
                max_lock_time: config.max_lock_time,
                formula: config.formula,
            })
        }
        QueryMsg::TokenInfo {} => to_json_binary(&get_token_info(deps, env)?),
    }
}

/// # Description
/// Returns user's lock, an empty lock if the user never locked tokens.
fn get_user_lock(deps: Deps, user: &str) -> StdResult<Lock> {
    let addr = addr_validate_to_lower(deps.api, user)?;
    Ok(LOCKED.may_load(deps.storage, &addr)?.unwrap_or_default())
}

/// # Description
/// Returns user's lock information in [`LockInfoResponse`] type.
fn get_user_lock_info(deps: Deps, user: &str) -> StdResult<LockInfoResponse> {
    let addr = addr_validate_to_lower(deps.api, user)?;
    if let Some(lock) = LOCKED.may_load(deps.storage, &addr)? {
        Ok(LockInfoResponse {
            amount: lock.amount,
            start: lock.start,
            end: lock.end,
        })
    } else {
        Err(StdError::generic_err("User is not found"))
    }
}

fn get_slope_changes(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
    order_by: Option<OrderBy>,
) -> StdResult<SlopeChangesResponse> {
    let order = order_by.unwrap_or(OrderBy::Asc).into();
    let slope_changes = fetch_slope_changes(deps.storage, start_after, limit, order)?
        .into_iter()
        .map(|(time, slope)| SlopeChangeInfo { time, slope })
        .collect();
    Ok(SlopeChangesResponse { slope_changes })
}

/// # Description
/// Returns the virtual voting token metadata. Its total supply is the current total voting power.
fn get_token_info(deps: Deps, env: Env) -> StdResult<TokenInfoResponse> {
    let info = TOKEN_INFO.load(deps.storage)?;
    Ok(TokenInfoResponse {
        name: info.name,
        symbol: info.symbol,
        decimals: info.decimals,
        total_supply: total_supply(deps.storage, env.block.time.seconds())?,
    })
}
