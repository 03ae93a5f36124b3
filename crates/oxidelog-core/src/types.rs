//! Core types for OxideLog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Arbitrary key-value metadata attached to a record
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Metadata key that carries the error value passed to `error`
pub const ERROR_KEY: &str = "error";

/// Record severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Numeric priority, lower is more severe (error=0, warn=1, info=2)
    pub fn priority(&self) -> u8 {
        match self {
            LogLevel::Error => 0,
            LogLevel::Warn => 1,
            LogLevel::Info => 2,
        }
    }

    /// Whether a record at this level passes a `minimum` level threshold
    pub fn is_enabled(&self, minimum: LogLevel) -> bool {
        self.priority() <= minimum.priority()
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single persisted log record (one line of NDJSON in the active file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    #[serde(with = "iso_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl LogRecord {
    /// Create a record stamped with the current time
    pub fn new(level: LogLevel, message: impl Into<String>, metadata: Option<Metadata>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            metadata,
        }
    }

    /// Serialize as a single JSON line, newline included
    pub fn to_json_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Parse a single JSON line
    pub fn from_json_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Build the metadata for an error record.
///
/// The error's display text goes under [`ERROR_KEY`]; caller metadata is
/// merged on top, so an explicit `error` key in `metadata` wins.
pub fn error_metadata(error: Option<String>, metadata: Option<Metadata>) -> Metadata {
    let mut merged = Metadata::new();
    if let Some(error) = error {
        merged.insert(ERROR_KEY.to_string(), serde_json::Value::String(error));
    }
    if let Some(metadata) = metadata {
        merged.extend(metadata);
    }
    merged
}

/// Filter options for reading records back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// Only return records with exactly this level
    pub level: Option<LogLevel>,
}

impl LogQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn level(level: LogLevel) -> Self {
        Self { level: Some(level) }
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        self.level.map_or(true, |level| record.level == level)
    }
}

/// ISO-8601 timestamps in UTC with millisecond precision (`2024-01-01T00:00:00.000Z`)
mod iso_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
