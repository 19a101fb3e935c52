//! Climate service error types

use thiserror::Error;

/// Errors that can occur while answering climate queries
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClimateError {
    /// A date supplied by the caller is not a `YYYY-MM-DD` calendar date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The store holds no measurements, so no reference date exists
    #[error("No measurements available")]
    EmptyDataset,

    /// A value read back from the store violates the data model
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Storage error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for ClimateError {
    fn from(err: sqlx::Error) -> Self {
        ClimateError::StorageError(err.to_string())
    }
}

/// Result type for climate operations
pub type Result<T> = std::result::Result<T, ClimateError>;
