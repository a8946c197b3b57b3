//! Cost entries: immutable cost facts recorded against a user.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// A single recorded cost. Entries are append-only: once written to the
/// ledger they are never edited or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostEntry {
    /// Id of the owning user.
    pub userid: i64,
    pub category: Category,
    /// Amount of money spent. Non-negative; validated at the ledger boundary.
    pub sum: f64,
    pub description: String,
    /// When the cost was incurred. Defaults to creation time.
    pub created_at: DateTime<Utc>,
}

impl CostEntry {
    /// Create a new cost entry timestamped now.
    pub fn new(
        userid: i64,
        category: Category,
        sum: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            userid,
            category,
            sum,
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    /// Set an explicit timestamp instead of the creation time.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Day of the month (1..=31) the cost falls on, read from the entry's
    /// own timestamp with no timezone conversion.
    pub fn day_of_month(&self) -> u32 {
        self.created_at.day()
    }
}
