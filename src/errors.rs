use flow_config::ConfigError;
use flow_core::CoreError;
use thiserror::Error;

/// Unified error type for the application facade.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
