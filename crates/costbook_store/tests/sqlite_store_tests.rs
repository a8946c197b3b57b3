//! Integration tests for the SQLite store, including the report engine
//! running end-to-end over it.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use tempfile::tempdir;

use costbook_core::{
    AccountDirectory, CostLedger, FixedClock, LedgerError, ReportEngine, ReportStore, RequestLog,
};
use costbook_model::{Category, CostEntry, LogRecord, ReportKey, User};
use costbook_store::SqliteStore;

fn store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().unwrap())
}

fn birthday(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn entry_on(userid: i64, category: Category, sum: f64, desc: &str, y: i32, m: u32, d: u32) -> CostEntry {
    CostEntry::new(userid, category, sum, desc)
        .with_created_at(Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap())
}

#[tokio::test]
async fn test_user_round_trip_and_duplicate_rejected() {
    let store = store();
    let directory: &dyn AccountDirectory = store.as_ref();
    let user = User::new(42, "Mosh", "Israeli", birthday(1990, 1, 10));

    directory.insert(user.clone()).await.unwrap();
    assert!(directory.exists(42).await.unwrap());
    assert!(!directory.exists(7).await.unwrap());
    assert_eq!(directory.find(42).await.unwrap(), Some(user.clone()));

    let err = directory.insert(user).await.unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateUser(42)));

    directory.require(42).await.unwrap();
    let err = directory.require(1).await.unwrap_err();
    assert!(matches!(err, LedgerError::UserNotFound(1)));

    directory
        .insert(User::new(7, "Dana", "Levi", birthday(1985, 6, 2)))
        .await
        .unwrap();
    let users = directory.list().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, 7);
}

#[tokio::test]
async fn test_month_query_bounds_are_inclusive_of_first_and_last_day() {
    let store = store();
    let ledger: &dyn CostLedger = store.as_ref();

    // Day 1 and the last day of January belong to the month.
    ledger
        .append(entry_on(42, Category::Food, 1.0, "first", 2023, 1, 1))
        .await
        .unwrap();
    ledger
        .append(entry_on(42, Category::Food, 2.0, "last", 2023, 1, 31))
        .await
        .unwrap();
    // Adjacent months stay out.
    ledger
        .append(entry_on(42, Category::Food, 3.0, "december", 2022, 12, 31))
        .await
        .unwrap();
    ledger
        .append(entry_on(42, Category::Food, 4.0, "february", 2023, 2, 1))
        .await
        .unwrap();
    // Other users stay out.
    ledger
        .append(entry_on(7, Category::Food, 5.0, "other user", 2023, 1, 15))
        .await
        .unwrap();

    let entries = ledger.entries_for_month(42, 2023, 1).await.unwrap();
    let descriptions: Vec<&str> = entries.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(descriptions, vec!["first", "last"]);
}

#[tokio::test]
async fn test_entries_come_back_in_ledger_order() {
    let store = store();
    let ledger: &dyn CostLedger = store.as_ref();

    // Appended out of day order on purpose.
    ledger
        .append(entry_on(42, Category::Sport, 30.0, "gym", 2023, 1, 20))
        .await
        .unwrap();
    ledger
        .append(entry_on(42, Category::Sport, 15.0, "pool", 2023, 1, 3))
        .await
        .unwrap();

    let entries = ledger.entries_for_month(42, 2023, 1).await.unwrap();
    assert_eq!(entries[0].description, "gym");
    assert_eq!(entries[1].description, "pool");
}

#[tokio::test]
async fn test_total_for_user_spans_all_months() {
    let store = store();
    let ledger: &dyn CostLedger = store.as_ref();

    ledger
        .append(entry_on(42, Category::Food, 10.0, "a", 2023, 1, 3))
        .await
        .unwrap();
    ledger
        .append(entry_on(42, Category::Housing, 700.0, "b", 2023, 2, 1))
        .await
        .unwrap();
    ledger
        .append(entry_on(7, Category::Food, 99.0, "c", 2023, 1, 3))
        .await
        .unwrap();

    assert_eq!(ledger.total_for_user(42).await.unwrap(), 710.0);
    assert_eq!(ledger.total_for_user(1).await.unwrap(), 0.0);
}

#[tokio::test]
async fn test_report_uniqueness_constraint_keeps_first_writer() {
    let store = store();
    let reports: &dyn ReportStore = store.as_ref();
    let key = ReportKey::new(42, 2023, 1);

    let first = costbook_core::aggregate(42, 2023, 1, &[]);
    let second = costbook_core::aggregate(
        42,
        2023,
        1,
        &[entry_on(42, Category::Food, 10.0, "bread", 2023, 1, 3)],
    );

    assert!(reports.insert_if_absent(&key, &first).await.unwrap());
    // Second writer loses: no row replaced, no error.
    assert!(!reports.insert_if_absent(&key, &second).await.unwrap());

    let stored = reports.find(&key).await.unwrap().unwrap();
    assert_eq!(stored, first);
}

#[tokio::test]
async fn test_report_find_misses_other_keys() {
    let store = store();
    let reports: &dyn ReportStore = store.as_ref();
    let body = costbook_core::aggregate(42, 2023, 1, &[]);

    reports
        .insert_if_absent(&ReportKey::new(42, 2023, 1), &body)
        .await
        .unwrap();

    assert!(reports
        .find(&ReportKey::new(42, 2023, 2))
        .await
        .unwrap()
        .is_none());
    assert!(reports
        .find(&ReportKey::new(7, 2023, 1))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_request_log_round_trip() {
    let store = store();
    let log: &dyn RequestLog = store.as_ref();

    log.log(LogRecord::info("costs", "report id=42 year=2023 month=1"))
        .await
        .unwrap();
    log.log(LogRecord::info("users", "users request"))
        .await
        .unwrap();

    let records = log.all().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].service, "costs");
    assert_eq!(records[1].service, "users");
}

/// The engine over the real store: first closed-period request computes and
/// caches, the second is served from the reports table even after the
/// underlying costs change (closed periods are authoritative).
#[tokio::test]
async fn test_engine_end_to_end_over_sqlite() {
    let dir = tempdir().unwrap();
    let store = Arc::new(SqliteStore::open(dir.path().join("costbook.db")).unwrap());
    let ledger: &dyn CostLedger = store.as_ref();

    ledger
        .append(entry_on(42, Category::Food, 10.0, "bread", 2023, 1, 3))
        .await
        .unwrap();
    ledger
        .append(entry_on(42, Category::Food, 5.0, "milk", 2023, 1, 20))
        .await
        .unwrap();
    ledger
        .append(entry_on(42, Category::Sport, 30.0, "gym", 2023, 1, 1))
        .await
        .unwrap();

    let engine = ReportEngine::new(
        store.clone(),
        store.clone(),
        Arc::new(FixedClock::at(2023, 2, 15)),
    );

    let first = engine.get_or_compute(42, 2023, 1).await.unwrap();
    assert_eq!(first.costs.bucket(Category::Food).len(), 2);
    assert_eq!(first.costs.bucket(Category::Sport).len(), 1);

    // A late write cannot change the cached, closed-period report.
    ledger
        .append(entry_on(42, Category::Food, 99.0, "late", 2023, 1, 25))
        .await
        .unwrap();
    let second = engine.get_or_compute(42, 2023, 1).await.unwrap();
    assert_eq!(second, first);
}
