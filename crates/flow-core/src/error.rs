use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Corrupt payload: {0}")]
    CorruptPayload(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}

/// Failures reported by an advice generator. Never surfaced past the advice service.
#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Service responded with status {status}: {message}")]
    Service { status: u16, message: String },
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Missing credential: environment variable `{0}` is not set")]
    MissingCredential(String),
}
