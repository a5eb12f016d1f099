//! flow-domain
//!
//! Pure domain models (Transaction, FinancialSummary, Breakdown).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod summary;
pub mod transaction;

pub use common::*;
pub use summary::*;
pub use transaction::*;
