//! # costbook_core
//!
//! Monthly report engine for costbook.
//!
//! This crate owns the computed pattern at the heart of the system: a report
//! for a closed accounting period is computed once, persisted under its
//! (user, year, month) key, and served from the cache forever after. Open
//! periods are recomputed on every request and never persisted.
//!
//! # Architecture
//!
//! - **Traits**: seams for the account directory, cost ledger, report cache
//!   store, and request log
//! - **Aggregate**: pure partitioning of a month's entries into the five
//!   fixed category buckets
//! - **Engine**: cache lookup, compute-on-miss, closure test, best-effort
//!   write-through
//! - **Clock**: injectable time source for the closure test
//! - **Memory**: in-memory store implementation for tests
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use costbook_core::{MemoryStore, ReportEngine};
//!
//! let store = Arc::new(MemoryStore::new());
//! let engine = ReportEngine::with_system_clock(store.clone(), store.clone());
//! let report = engine.get_or_compute(42, 2023, 1).await?;
//! ```

pub mod aggregate;
pub mod clock;
pub mod engine;
pub mod error;
pub mod memory;
pub mod traits;

// Re-export main types for convenience
pub use aggregate::aggregate;
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::ReportEngine;
pub use error::{LedgerError, LedgerResult};
pub use memory::MemoryStore;
pub use traits::{AccountDirectory, CostLedger, ReportStore, RequestLog};
