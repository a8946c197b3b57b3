//! # costbook_store
//!
//! SQLite persistence for costbook.
//!
//! One database file backs all four store seams defined by
//! `costbook_core`: the account directory, the append-only cost ledger, the
//! monthly report cache, and the request log. The report cache table
//! enforces a compound UNIQUE constraint on (userid, year, month), which is
//! what makes the engine's write-through race-free across processes.

pub mod error;
pub mod sqlite;

// Re-export main types for convenience
pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteStore;
