//! Store seams: the external collaborators the core depends on.
//!
//! The report engine never assumes exclusive access to these stores and
//! holds no locks across calls into them; requests may run in independent
//! processes. The only correctness requirement placed on an implementation
//! is the atomic insert-if-absent contract of [`ReportStore`].

use async_trait::async_trait;

use costbook_model::{CostEntry, LogRecord, ReportBody, ReportKey, User};

use crate::error::{LedgerError, LedgerResult};

/// Existence and detail lookup for users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Check whether a user exists.
    async fn exists(&self, userid: i64) -> LedgerResult<bool>;

    /// Look up a user by id.
    async fn find(&self, userid: i64) -> LedgerResult<Option<User>>;

    /// Insert a new user. Fails with `DuplicateUser` if the id is taken.
    async fn insert(&self, user: User) -> LedgerResult<User>;

    /// Fail with `UserNotFound` unless the user exists. Request surfaces
    /// call this before touching the ledger or the report cache.
    async fn require(&self, userid: i64) -> LedgerResult<()> {
        if self.exists(userid).await? {
            Ok(())
        } else {
            Err(LedgerError::UserNotFound(userid))
        }
    }

    /// List all users.
    async fn list(&self) -> LedgerResult<Vec<User>>;
}

/// Append-only store of cost entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CostLedger: Send + Sync {
    /// Append a cost entry and return it as stored.
    async fn append(&self, entry: CostEntry) -> LedgerResult<CostEntry>;

    /// All entries belonging to `userid` whose timestamp falls within the
    /// given calendar month, in ledger (insertion) order.
    async fn entries_for_month(
        &self,
        userid: i64,
        year: i32,
        month: u32,
    ) -> LedgerResult<Vec<CostEntry>>;

    /// Sum of all costs ever recorded for a user. Unrelated to the monthly
    /// report computation.
    async fn total_for_user(&self, userid: i64) -> LedgerResult<f64>;
}

/// Persisted monthly report cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Look up a cached report body by key.
    async fn find(&self, key: &ReportKey) -> LedgerResult<Option<ReportBody>>;

    /// Persist a report for `key` unless one already exists.
    ///
    /// Must be atomic at the store: of any number of concurrent calls for
    /// the same key, exactly one inserts and returns `true`; the rest
    /// return `false`. `false` is not an error — it means another request
    /// already cached this key.
    async fn insert_if_absent(&self, key: &ReportKey, body: &ReportBody) -> LedgerResult<bool>;
}

/// Persisted request log, written by every service surface and read back by
/// the logs surface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestLog: Send + Sync {
    /// Append a log record.
    async fn log(&self, record: LogRecord) -> LedgerResult<()>;

    /// All log records in insertion order.
    async fn all(&self) -> LedgerResult<Vec<LogRecord>>;
}
