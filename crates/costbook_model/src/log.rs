//! Persisted request log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a log record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// One request log record. Every service surface appends one of these per
/// incoming request; the logs surface reads them back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    /// Which service surface handled the request (users, costs, admin, logs).
    pub service: String,
    pub message: String,
    pub logged_at: DateTime<Utc>,
}

impl LogRecord {
    pub fn info(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            service: service.into(),
            message: message.into(),
            logged_at: Utc::now(),
        }
    }
}
