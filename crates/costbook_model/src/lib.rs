//! # costbook_model
//!
//! Shared data model for costbook.
//!
//! This crate defines the persistent and wire-level types used across the
//! ledger, report engine, storage, and CLI crates:
//!
//! - **Categories**: the closed set of cost categories
//! - **Cost entries**: immutable cost facts recorded against a user
//! - **Users**: account directory entries
//! - **Reports**: the monthly report key, body, and per-category buckets
//! - **Logs**: persisted request log records

pub mod category;
pub mod cost;
pub mod log;
pub mod report;
pub mod user;

// Re-export main types for convenience
pub use category::{Category, ParseCategoryError};
pub use cost::CostEntry;
pub use log::{LogLevel, LogRecord};
pub use report::{CostBuckets, ReportBody, ReportItem, ReportKey};
pub use user::{TeamMember, User};
