//! The report engine: compute-on-miss, cache-on-close.
//!
//! A monthly report for a closed period can never change, so it is computed
//! once and persisted; the persisted row IS the cache — the engine keeps no
//! in-process state across requests. Open periods (the current or a future
//! month) are recomputed on every request and never persisted.

use std::sync::Arc;

use chrono::Datelike;
use tracing::{debug, info, warn};

use costbook_model::{ReportBody, ReportKey};

use crate::aggregate::aggregate;
use crate::clock::{Clock, SystemClock};
use crate::error::{LedgerError, LedgerResult};
use crate::traits::{CostLedger, ReportStore};

/// Serves monthly reports from the cache store, computing and write-through
/// caching closed periods on first access.
pub struct ReportEngine {
    ledger: Arc<dyn CostLedger>,
    reports: Arc<dyn ReportStore>,
    clock: Arc<dyn Clock>,
}

impl ReportEngine {
    pub fn new(
        ledger: Arc<dyn CostLedger>,
        reports: Arc<dyn ReportStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            reports,
            clock,
        }
    }

    /// Engine with the production system clock.
    pub fn with_system_clock(ledger: Arc<dyn CostLedger>, reports: Arc<dyn ReportStore>) -> Self {
        Self::new(ledger, reports, Arc::new(SystemClock))
    }

    /// Produce the monthly report for (userid, year, month).
    ///
    /// Cache hit returns the stored body verbatim, with no freshness check
    /// and no ledger access. On miss the month's entries are aggregated and,
    /// if the period is closed, persisted best-effort: losing an
    /// insert-if-absent race or hitting a persist failure never fails the
    /// request — the freshly computed body is returned either way.
    ///
    /// Lookup and ledger failures propagate to the caller.
    pub async fn get_or_compute(
        &self,
        userid: i64,
        year: i32,
        month: u32,
    ) -> LedgerResult<ReportBody> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidMonth(month));
        }

        let key = ReportKey::new(userid, year, month);

        if let Some(cached) = self.reports.find(&key).await? {
            debug!("report cache hit for {}", key);
            return Ok(cached);
        }

        let entries = self.ledger.entries_for_month(userid, year, month).await?;
        let body = aggregate(userid, year, month, &entries);

        if self.period_closed(year, month) {
            match self.reports.insert_if_absent(&key, &body).await {
                Ok(true) => info!("computed report cached for {}", key),
                Ok(false) => debug!("report for {} already cached by a concurrent request", key),
                Err(err) => warn!("failed to cache report for {}: {}", key, err),
            }
        }

        Ok(body)
    }

    /// A period is closed iff it is strictly earlier than the current
    /// calendar month at the clock's "now".
    fn period_closed(&self, year: i32, month: u32) -> bool {
        let now = self.clock.now();
        year < now.year() || (year == now.year() && month < now.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::traits::{MockCostLedger, MockReportStore};

    fn engine_with(
        ledger: MockCostLedger,
        reports: MockReportStore,
        clock: FixedClock,
    ) -> ReportEngine {
        ReportEngine::new(Arc::new(ledger), Arc::new(reports), Arc::new(clock))
    }

    #[tokio::test]
    async fn test_month_out_of_range_rejected_before_any_store_access() {
        let ledger = MockCostLedger::new();
        let reports = MockReportStore::new();
        let engine = engine_with(ledger, reports, FixedClock::at(2023, 2, 1));

        let err = engine.get_or_compute(42, 2023, 13).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidMonth(13)));
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let ledger = MockCostLedger::new();
        let mut reports = MockReportStore::new();
        reports
            .expect_find()
            .returning(|_| Err(LedgerError::storage(std::io::Error::other("store down"))));
        let engine = engine_with(ledger, reports, FixedClock::at(2023, 2, 1));

        let err = engine.get_or_compute(42, 2023, 1).await.unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
    }

    #[tokio::test]
    async fn test_ledger_failure_propagates() {
        let mut ledger = MockCostLedger::new();
        ledger
            .expect_entries_for_month()
            .returning(|_, _, _| Err(LedgerError::storage(std::io::Error::other("ledger down"))));
        let mut reports = MockReportStore::new();
        reports.expect_find().returning(|_| Ok(None));
        let engine = engine_with(ledger, reports, FixedClock::at(2023, 2, 1));

        let err = engine.get_or_compute(42, 2023, 1).await.unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
    }

    #[tokio::test]
    async fn test_open_period_never_persists() {
        let mut ledger = MockCostLedger::new();
        ledger
            .expect_entries_for_month()
            .returning(|_, _, _| Ok(Vec::new()));
        let mut reports = MockReportStore::new();
        reports.expect_find().returning(|_| Ok(None));
        // No expect_insert_if_absent: a persist attempt would panic the mock.
        let engine = engine_with(ledger, reports, FixedClock::at(2023, 2, 1));

        let body = engine.get_or_compute(42, 2023, 2).await.unwrap();
        assert_eq!(body.month, 2);
    }

    #[tokio::test]
    async fn test_losing_the_persist_race_is_not_an_error() {
        let mut ledger = MockCostLedger::new();
        ledger
            .expect_entries_for_month()
            .returning(|_, _, _| Ok(Vec::new()));
        let mut reports = MockReportStore::new();
        reports.expect_find().returning(|_| Ok(None));
        reports
            .expect_insert_if_absent()
            .returning(|_, _| Ok(false));
        let engine = engine_with(ledger, reports, FixedClock::at(2023, 2, 1));

        let body = engine.get_or_compute(42, 2023, 1).await.unwrap();
        assert_eq!(body.key(), ReportKey::new(42, 2023, 1));
    }
}
