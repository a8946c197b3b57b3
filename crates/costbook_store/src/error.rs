//! Error types for the store module.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    #[error("Corrupt stored value: {0}")]
    Corrupt(String),
}
