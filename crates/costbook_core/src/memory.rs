//! In-memory store for testing.
//!
//! Implements every store seam over process-local maps, with fault and
//! call-count instrumentation so tests can verify the engine's cache-hit
//! and best-effort persist behavior without a real database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Datelike;
use parking_lot::RwLock;

use costbook_model::{CostEntry, LogRecord, ReportBody, ReportKey, User};

use crate::error::{LedgerError, LedgerResult};
use crate::traits::{AccountDirectory, CostLedger, ReportStore, RequestLog};

/// In-memory implementation of all store seams.
///
/// Locks are taken and released within each call; nothing is held across an
/// await point.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    costs: RwLock<Vec<CostEntry>>,
    reports: RwLock<HashMap<ReportKey, ReportBody>>,
    logs: RwLock<Vec<LogRecord>>,
    /// Number of `entries_for_month` calls served.
    ledger_queries: AtomicUsize,
    /// When set, the next `insert_if_absent` fails with a storage error.
    fail_next_persist: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many ledger month queries have been served so far.
    pub fn ledger_queries(&self) -> usize {
        self.ledger_queries.load(Ordering::SeqCst)
    }

    /// Make the next report persist attempt fail with a storage error.
    pub fn fail_next_persist(&self) {
        self.fail_next_persist.store(true, Ordering::SeqCst);
    }

    /// Number of reports currently cached.
    pub fn cached_report_count(&self) -> usize {
        self.reports.read().len()
    }
}

#[async_trait]
impl AccountDirectory for MemoryStore {
    async fn exists(&self, userid: i64) -> LedgerResult<bool> {
        Ok(self.users.read().iter().any(|u| u.id == userid))
    }

    async fn find(&self, userid: i64) -> LedgerResult<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.id == userid).cloned())
    }

    async fn insert(&self, user: User) -> LedgerResult<User> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.id == user.id) {
            return Err(LedgerError::DuplicateUser(user.id));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> LedgerResult<Vec<User>> {
        Ok(self.users.read().clone())
    }
}

#[async_trait]
impl CostLedger for MemoryStore {
    async fn append(&self, entry: CostEntry) -> LedgerResult<CostEntry> {
        self.costs.write().push(entry.clone());
        Ok(entry)
    }

    async fn entries_for_month(
        &self,
        userid: i64,
        year: i32,
        month: u32,
    ) -> LedgerResult<Vec<CostEntry>> {
        self.ledger_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .costs
            .read()
            .iter()
            .filter(|e| {
                e.userid == userid
                    && e.created_at.year() == year
                    && e.created_at.month() == month
            })
            .cloned()
            .collect())
    }

    async fn total_for_user(&self, userid: i64) -> LedgerResult<f64> {
        Ok(self
            .costs
            .read()
            .iter()
            .filter(|e| e.userid == userid)
            .map(|e| e.sum)
            .sum())
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn find(&self, key: &ReportKey) -> LedgerResult<Option<ReportBody>> {
        Ok(self.reports.read().get(key).cloned())
    }

    async fn insert_if_absent(&self, key: &ReportKey, body: &ReportBody) -> LedgerResult<bool> {
        if self.fail_next_persist.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::storage(std::io::Error::other(
                "simulated persist failure",
            )));
        }
        let mut reports = self.reports.write();
        if reports.contains_key(key) {
            return Ok(false);
        }
        reports.insert(*key, body.clone());
        Ok(true)
    }
}

#[async_trait]
impl RequestLog for MemoryStore {
    async fn log(&self, record: LogRecord) -> LedgerResult<()> {
        self.logs.write().push(record);
        Ok(())
    }

    async fn all(&self) -> LedgerResult<Vec<LogRecord>> {
        Ok(self.logs.read().clone())
    }
}
