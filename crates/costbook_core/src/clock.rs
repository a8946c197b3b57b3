//! Injectable clock for the period closure test.
//!
//! Whether a (year, month) period is closed depends on wall-clock time at
//! request time. The clock is passed into the report engine rather than read
//! from ambient state so tests can simulate month boundaries. Entry
//! timestamps and the clock share the UTC timeline; no timezone conversion
//! happens anywhere in the report path.

use chrono::{DateTime, TimeZone, Utc};

/// Source of "now" for the report engine.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, for tests that need to sit on a
/// particular side of a month boundary.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pin the clock to midnight on the given date.
    ///
    /// # Panics
    ///
    /// Panics if the date is not a valid calendar date.
    pub fn at(year: i32, month: u32, day: u32) -> Self {
        FixedClock(
            Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
                .single()
                .expect("valid calendar date"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
