//! flow-core
//!
//! Business logic and services for FinanceFlow.
//! Depends on flow-domain. No CLI, no terminal I/O, persistence only through the
//! [`storage::TransactionStorage`] port.

pub mod advice_service;
pub mod error;
pub mod format;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod transaction_store;

pub use advice_service::*;
pub use error::{AdviceError, CoreError};
pub use storage::{MemoryStorage, TransactionStorage};
pub use summary_service::*;
pub use time::{Clock, SystemClock};
pub use transaction_store::*;

#[cfg(test)]
mod tests;
