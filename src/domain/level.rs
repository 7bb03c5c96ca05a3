use super::error::LoggingError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Verbosity tier controlling whether a message is emitted.
///
/// Discriminants are fixed: `None` < `Error` < `Warn` < `Info` < `Trace`.
/// A logger configured at `None` emits nothing.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    ValueEnum,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    None = 0,
    Error = 1,
    Warn = 2,
    #[default]
    Info = 3,
    Trace = 4,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::None,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::None => "none",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Trace => "trace",
        }
    }

    /// Returns true if a logger at threshold `self` emits a message at `candidate`.
    pub fn includes(self, candidate: Level) -> bool {
        candidate <= self
    }

    fn valid_levels() -> Vec<String> {
        Self::ALL.iter().map(|l| l.as_str().to_string()).collect()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggingError;

    // Case-sensitive on purpose: "INFO" is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Level::None),
            "error" => Ok(Level::Error),
            "warn" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "trace" => Ok(Level::Trace),
            _ => Err(LoggingError::InvalidLevel {
                input: s.to_string(),
                valid_levels: Level::valid_levels(),
            }),
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = LoggingError;

    fn try_from(value: u8) -> Result<Self, LoggingError> {
        Level::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| LoggingError::InvalidLevel {
                input: value.to_string(),
                valid_levels: Level::valid_levels(),
            })
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::None => LevelFilter::OFF,
            Level::Error => LevelFilter::ERROR,
            Level::Warn => LevelFilter::WARN,
            Level::Info => LevelFilter::INFO,
            Level::Trace => LevelFilter::TRACE,
        }
    }
}
