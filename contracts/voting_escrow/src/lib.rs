pub mod contract;

mod checkpoint;
mod error;
mod formula;
mod history;
mod queries;
mod schedule;
mod state;
mod utils;

pub use crate::error::ContractError;
