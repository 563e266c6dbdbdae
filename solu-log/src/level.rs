use crate::error::LogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a record. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    /// Logged like `Error`; panics afterwards when the logger runs in development mode.
    DPanic,
    /// Panics after the record is delivered.
    Panic,
    /// Exits the process after the record is delivered.
    Fatal,
}

/// Levels accepted as a logger's minimum level.
pub const ALLOWED_LEVELS: &[&str] = &["debug", "info", "warn", "error", "fatal"];

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::DPanic => "dpanic",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    /// Parse a configured minimum level. Only [`ALLOWED_LEVELS`] are accepted;
    /// an empty string falls back to `Info`.
    pub fn from_config(value: &str) -> Result<Self, LogError> {
        if value.is_empty() {
            return Ok(Level::Info);
        }
        if !ALLOWED_LEVELS.contains(&value) {
            return Err(LogError::InvalidLevel(value.to_string()));
        }
        value.parse()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "dpanic" => Ok(Level::DPanic),
            "panic" => Ok(Level::Panic),
            "fatal" => Ok(Level::Fatal),
            other => Err(LogError::InvalidLevel(other.to_string())),
        }
    }
}
