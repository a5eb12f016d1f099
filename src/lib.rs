#![doc(test(attr(deny(warnings))))]

//! FinanceFlow tracks income and expenses, derives a running financial summary,
//! and asks an external text-generation service for budgeting advice.

pub mod advice;
pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod utils;

pub use app::FinanceApp;
pub use errors::AppError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("FinanceFlow tracing initialized.");
    });
}
