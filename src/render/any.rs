use super::{Clock, JsonLogger, TextLogger};
use crate::domain::{Level, LoggingError};
use crate::logger::Logger;
use crate::sink::Sink;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error as StdError;

/// Output format selected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable template lines (default)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Either renderer, chosen from configuration or a command-line flag.
#[derive(Debug, Clone)]
pub enum AnyLogger {
    Text(TextLogger),
    Json(JsonLogger),
}

impl AnyLogger {
    pub fn new(format: LogFormat) -> Self {
        match format {
            LogFormat::Text => AnyLogger::Text(TextLogger::new()),
            LogFormat::Json => AnyLogger::Json(JsonLogger::new()),
        }
    }

    pub fn format(&self) -> LogFormat {
        match self {
            AnyLogger::Text(_) => LogFormat::Text,
            AnyLogger::Json(_) => LogFormat::Json,
        }
    }

    pub fn with_level(self, level: Level) -> Self {
        match self {
            AnyLogger::Text(l) => AnyLogger::Text(l.with_level(level)),
            AnyLogger::Json(l) => AnyLogger::Json(l.with_level(level)),
        }
    }

    pub fn with_output(self, sink: impl Into<Sink>) -> Self {
        match self {
            AnyLogger::Text(l) => AnyLogger::Text(l.with_output(sink)),
            AnyLogger::Json(l) => AnyLogger::Json(l.with_output(sink)),
        }
    }

    pub fn with_datetime_format(self, format: impl Into<String>) -> Self {
        match self {
            AnyLogger::Text(l) => AnyLogger::Text(l.with_datetime_format(format)),
            AnyLogger::Json(l) => AnyLogger::Json(l.with_datetime_format(format)),
        }
    }

    pub fn with_clock(self, clock: Clock) -> Self {
        match self {
            AnyLogger::Text(l) => AnyLogger::Text(l.with_clock(clock)),
            AnyLogger::Json(l) => AnyLogger::Json(l.with_clock(clock)),
        }
    }
}

impl Default for AnyLogger {
    fn default() -> Self {
        Self::new(LogFormat::default())
    }
}

impl From<TextLogger> for AnyLogger {
    fn from(logger: TextLogger) -> Self {
        AnyLogger::Text(logger)
    }
}

impl From<JsonLogger> for AnyLogger {
    fn from(logger: JsonLogger) -> Self {
        AnyLogger::Json(logger)
    }
}

impl Logger for AnyLogger {
    fn level(&self) -> Level {
        match self {
            AnyLogger::Text(l) => l.level(),
            AnyLogger::Json(l) => l.level(),
        }
    }

    fn print(&self, level: Level, message: &str) -> Result<(), LoggingError> {
        match self {
            AnyLogger::Text(l) => l.print(level, message),
            AnyLogger::Json(l) => l.print(level, message),
        }
    }

    fn with_error<E>(&self, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        match self {
            AnyLogger::Text(l) => AnyLogger::Text(l.with_error(err)),
            AnyLogger::Json(l) => AnyLogger::Json(l.with_error(err)),
        }
    }

    fn with_field<K, V>(&self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        match self {
            AnyLogger::Text(l) => AnyLogger::Text(l.with_field(key, value)),
            AnyLogger::Json(l) => AnyLogger::Json(l.with_field(key, value)),
        }
    }

    fn with_fields<I, K, V>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        match self {
            AnyLogger::Text(l) => AnyLogger::Text(l.with_fields(fields)),
            AnyLogger::Json(l) => AnyLogger::Json(l.with_fields(fields)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SharedBuffer;

    #[test]
    fn test_new_selects_renderer() {
        assert!(matches!(AnyLogger::new(LogFormat::Text), AnyLogger::Text(_)));
        assert!(matches!(AnyLogger::new(LogFormat::Json), AnyLogger::Json(_)));
        assert_eq!(AnyLogger::default().format(), LogFormat::Text);
    }

    #[test]
    fn test_derivations_keep_variant() {
        let logger = AnyLogger::new(LogFormat::Json);
        let derived = logger
            .with_field("a", 1)
            .with_fields([("b", 2)])
            .with_error(std::io::Error::other("e"));
        assert_eq!(derived.format(), LogFormat::Json);
    }

    #[test]
    fn test_delegates_print() {
        let buffer = SharedBuffer::new();
        let logger = AnyLogger::new(LogFormat::Json)
            .with_output(buffer.clone())
            .with_level(Level::Trace)
            .with_datetime_format("%Y");
        logger.trace("deep").unwrap();

        let entry: Value = serde_json::from_str(buffer.contents().trim_end()).unwrap();
        assert_eq!(entry["level"], "trace");
        assert_eq!(entry["message"], "deep");
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(
            <LogFormat as ValueEnum>::from_str("json", false).unwrap(),
            LogFormat::Json
        );
        let format: LogFormat = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(format, LogFormat::Text);
    }
}
