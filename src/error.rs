use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No data to aggregate: {0}")]
    EmptyInput(String),

    #[error("Unknown date range token: {0}")]
    UnknownRangeToken(String),

    #[error("Invalid payload: {0}")]
    Payload(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
