use cosmwasm_std::{OverflowError, StdError};
use thiserror::Error;

/// ## Description
/// This enum describes voting escrow contract errors!
#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Amount must be greater than zero")]
    InvalidAmount {},

    #[error("Lock already exists")]
    LockAlreadyExists {},

    #[error("Lock does not exist")]
    LockDoesntExist {},

    #[error("Lock time must be within the limits")]
    LockTimeLimitsError {},

    #[error("Unlock time can only be increased")]
    LockTimeMustIncrease {},

    #[error("The lock time has not yet expired")]
    LockHasNotExpired {},

    #[error("The lock expired. Withdraw and create new lock")]
    LockExpired {},

    #[error("InsufficientStaked")]
    InsufficientStaked {},

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Too many weeks passed since the last checkpoint. Execute checkpoint first")]
    CheckpointRequired {},
}
