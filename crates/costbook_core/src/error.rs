//! Error types for the core module.

use thiserror::Error;

/// Result type alias for ledger and report operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors that can occur during ledger and report operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("User already exists: {0}")]
    DuplicateUser(i64),

    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Cost sum cannot be negative: {0}")]
    NegativeSum(f64),

    #[error("Storage error: {0}")]
    Storage(anyhow::Error),
}

impl LedgerError {
    /// Wrap a backend failure as a storage error.
    pub fn storage(err: impl Into<anyhow::Error>) -> Self {
        LedgerError::Storage(err.into())
    }
}
