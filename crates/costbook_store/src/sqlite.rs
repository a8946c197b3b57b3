//! SQLite-backed implementation of the store seams.
//!
//! One database file holds the account directory, the cost ledger, the
//! report cache, and the request log. The report cache carries a compound
//! UNIQUE constraint on (userid, year, month); `insert_if_absent` is an
//! `INSERT OR IGNORE`, so at most one report row can ever exist per key no
//! matter how many requests race on first access.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use costbook_core::{
    AccountDirectory, CostLedger, LedgerError, LedgerResult, ReportStore, RequestLog,
};
use costbook_model::{Category, CostEntry, LogLevel, LogRecord, ReportBody, ReportKey, User};

use crate::error::{StoreError, StoreResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    birthday TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS costs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    userid INTEGER NOT NULL,
    category TEXT NOT NULL,
    sum REAL NOT NULL,
    description TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_costs_userid ON costs(userid);

CREATE TABLE IF NOT EXISTS reports (
    userid INTEGER NOT NULL,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL,
    data TEXT NOT NULL,
    UNIQUE (userid, year, month)
);

CREATE TABLE IF NOT EXISTS logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    level TEXT NOT NULL,
    service TEXT NOT NULL,
    message TEXT NOT NULL,
    logged_at TEXT NOT NULL
);
"#;

/// All store seams over a single SQLite database.
///
/// Queries are point lookups and small scans on a local file, so the async
/// trait methods run them inline under a connection mutex. The mutex is
/// never held across an await point.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch(SCHEMA)?;
        debug!("opened costbook database at {}", path.as_ref().display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database. Used by tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Timestamps are stored as RFC 3339 UTC strings; with a fixed offset they
/// order lexicographically, so month queries are plain string ranges.
fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

fn parse_ts(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| StoreError::Corrupt(format!("timestamp {raw}")))
}

fn parse_date(raw: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| StoreError::Corrupt(format!("date {raw}")))
}

fn parse_category(raw: &str) -> StoreResult<Category> {
    Category::from_str(raw).map_err(|_| StoreError::Corrupt(format!("category {raw}")))
}

fn parse_level(raw: &str) -> StoreResult<LogLevel> {
    LogLevel::from_str(raw).map_err(|_| StoreError::Corrupt(format!("log level {raw}")))
}

/// Inclusive start and exclusive end timestamp strings for a calendar month.
fn month_bounds(year: i32, month: u32) -> StoreResult<(String, String)> {
    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or(StoreError::InvalidMonth(month))?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .ok_or(StoreError::InvalidMonth(month))?;
    Ok((format_ts(&start), format_ts(&end)))
}

impl SqliteStore {
    fn user_by_id(&self, userid: i64) -> StoreResult<Option<User>> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT id, first_name, last_name, birthday FROM users WHERE id = ?1",
                params![userid],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;
        row.map(|(id, first_name, last_name, birthday)| {
            Ok(User::new(id, first_name, last_name, parse_date(&birthday)?))
        })
        .transpose()
    }

    fn costs_in_month(&self, userid: i64, year: i32, month: u32) -> StoreResult<Vec<CostEntry>> {
        let (start, end) = month_bounds(year, month)?;
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT userid, category, sum, description, created_at FROM costs \
             WHERE userid = ?1 AND created_at >= ?2 AND created_at < ?3 \
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![userid, start, end], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (userid, category, sum, description, created_at) = row?;
            entries.push(CostEntry {
                userid,
                category: parse_category(&category)?,
                sum,
                description,
                created_at: parse_ts(&created_at)?,
            });
        }
        Ok(entries)
    }
}

#[async_trait]
impl AccountDirectory for SqliteStore {
    async fn exists(&self, userid: i64) -> LedgerResult<bool> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
            params![userid],
            |row| row.get::<_, bool>(0),
        )
        .map_err(|e| LedgerError::storage(StoreError::from(e)))
    }

    async fn find(&self, userid: i64) -> LedgerResult<Option<User>> {
        self.user_by_id(userid).map_err(LedgerError::storage)
    }

    async fn insert(&self, user: User) -> LedgerResult<User> {
        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO users (id, first_name, last_name, birthday) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.id,
                user.first_name,
                user.last_name,
                user.birthday.format("%Y-%m-%d").to_string()
            ],
        );
        match result {
            Ok(_) => Ok(user),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(LedgerError::DuplicateUser(user.id))
            }
            Err(e) => Err(LedgerError::storage(StoreError::from(e))),
        }
    }

    async fn list(&self) -> LedgerResult<Vec<User>> {
        let inner = || -> StoreResult<Vec<User>> {
            let conn = self.conn.lock();
            let mut stmt = conn
                .prepare("SELECT id, first_name, last_name, birthday FROM users ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?;
            let mut users = Vec::new();
            for row in rows {
                let (id, first_name, last_name, birthday) = row?;
                users.push(User::new(id, first_name, last_name, parse_date(&birthday)?));
            }
            Ok(users)
        };
        inner().map_err(LedgerError::storage)
    }
}

#[async_trait]
impl CostLedger for SqliteStore {
    async fn append(&self, entry: CostEntry) -> LedgerResult<CostEntry> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO costs (userid, category, sum, description, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.userid,
                entry.category.as_str(),
                entry.sum,
                entry.description,
                format_ts(&entry.created_at)
            ],
        )
        .map_err(|e| LedgerError::storage(StoreError::from(e)))?;
        Ok(entry)
    }

    async fn entries_for_month(
        &self,
        userid: i64,
        year: i32,
        month: u32,
    ) -> LedgerResult<Vec<CostEntry>> {
        self.costs_in_month(userid, year, month)
            .map_err(LedgerError::storage)
    }

    async fn total_for_user(&self, userid: i64) -> LedgerResult<f64> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT COALESCE(SUM(sum), 0) FROM costs WHERE userid = ?1",
            params![userid],
            |row| row.get::<_, f64>(0),
        )
        .map_err(|e| LedgerError::storage(StoreError::from(e)))
    }
}

#[async_trait]
impl ReportStore for SqliteStore {
    async fn find(&self, key: &ReportKey) -> LedgerResult<Option<ReportBody>> {
        let inner = || -> StoreResult<Option<ReportBody>> {
            let conn = self.conn.lock();
            let data = conn
                .query_row(
                    "SELECT data FROM reports WHERE userid = ?1 AND year = ?2 AND month = ?3",
                    params![key.userid, key.year, key.month],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            data.map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
                .transpose()
        };
        inner().map_err(LedgerError::storage)
    }

    async fn insert_if_absent(&self, key: &ReportKey, body: &ReportBody) -> LedgerResult<bool> {
        let inner = || -> StoreResult<bool> {
            let data = serde_json::to_string(body)?;
            let conn = self.conn.lock();
            let changed = conn.execute(
                "INSERT OR IGNORE INTO reports (userid, year, month, data) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![key.userid, key.year, key.month, data],
            )?;
            Ok(changed == 1)
        };
        inner().map_err(LedgerError::storage)
    }
}

#[async_trait]
impl RequestLog for SqliteStore {
    async fn log(&self, record: LogRecord) -> LedgerResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO logs (level, service, message, logged_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.level.as_str(),
                record.service,
                record.message,
                format_ts(&record.logged_at)
            ],
        )
        .map_err(|e| LedgerError::storage(StoreError::from(e)))?;
        Ok(())
    }

    async fn all(&self) -> LedgerResult<Vec<LogRecord>> {
        let inner = || -> StoreResult<Vec<LogRecord>> {
            let conn = self.conn.lock();
            let mut stmt = conn
                .prepare("SELECT level, service, message, logged_at FROM logs ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?;
            let mut records = Vec::new();
            for row in rows {
                let (level, service, message, logged_at) = row?;
                records.push(LogRecord {
                    level: parse_level(&level)?,
                    service,
                    message,
                    logged_at: parse_ts(&logged_at)?,
                });
            }
            Ok(records)
        };
        inner().map_err(LedgerError::storage)
    }
}
