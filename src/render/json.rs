//! Machine readable renderer emitting one JSON object per line.

use super::{Clock, Fields, RendererState};
use crate::domain::diagnostic::{embedded_data, error_code};
use crate::domain::{Level, LoggingError};
use crate::logger::Logger;
use crate::sink::Sink;
use serde_json::{Map, Value};
use std::error::Error as StdError;

/// Logger writing flat JSON objects.
///
/// Keys are `datetime`, `level`, optionally `error`, `error.<key>` and
/// `error.code`, then `message`, then every field. Fields are inserted last
/// and win over any key with the same name. Keys are serialized in sorted
/// order.
#[derive(Debug, Clone, Default)]
pub struct JsonLogger {
    state: RendererState,
}

impl JsonLogger {
    /// Info level, stderr and RFC3339 datetimes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.state.level = level;
        self
    }

    pub fn with_output(mut self, sink: impl Into<Sink>) -> Self {
        self.state.sink = sink.into();
        self
    }

    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.state.datetime_format = format.into();
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.state.clock = clock;
        self
    }

    pub fn fields(&self) -> &Fields {
        &self.state.fields
    }

    pub fn datetime_format(&self) -> &str {
        &self.state.datetime_format
    }

    pub fn sink(&self) -> &Sink {
        &self.state.sink
    }

    /// Builds the entry object without the level gate.
    pub fn entry(&self, level: Level, message: &str) -> Result<Map<String, Value>, LoggingError> {
        let mut entry = Map::new();
        entry.insert("datetime".to_string(), self.state.timestamp()?.into());
        entry.insert("level".to_string(), level.as_str().into());

        if let Some(err) = self.state.error() {
            entry.insert("error".to_string(), err.to_string().into());
            for (key, value) in embedded_data(err) {
                entry.insert(format!("error.{key}"), value);
            }
            let code = error_code(err);
            if !code.is_unknown() {
                entry.insert("error.code".to_string(), serde_json::to_value(code)?);
            }
        }

        entry.insert("message".to_string(), message.into());

        for (key, value) in &self.state.fields {
            entry.insert(key.clone(), value.clone());
        }
        Ok(entry)
    }

    /// Renders one newline-terminated line without the level gate.
    pub fn render(&self, level: Level, message: &str) -> Result<Vec<u8>, LoggingError> {
        let entry = self.entry(level, message)?;
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');
        Ok(line)
    }
}

impl Logger for JsonLogger {
    fn level(&self) -> Level {
        self.state.level
    }

    fn print(&self, level: Level, message: &str) -> Result<(), LoggingError> {
        if !self.enabled(level) {
            return Ok(());
        }
        let line = self.render(level, message)?;
        self.state.write(&line)
    }

    fn with_error<E>(&self, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            state: self.state.with_error(err),
        }
    }

    fn with_field<K, V>(&self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.with_fields([(key, value)])
    }

    fn with_fields<I, K, V>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            state: self.state.with_fields(fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiagnosticError, ErrorCode};
    use crate::sink::SharedBuffer;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    fn logger() -> (JsonLogger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let logger = JsonLogger::new()
            .with_output(buffer.clone())
            .with_datetime_format("%Y-%m-%d")
            .with_clock(fixed_clock);
        (logger, buffer)
    }

    fn parse(buffer: &SharedBuffer) -> Value {
        let contents = buffer.contents();
        assert!(contents.ends_with('\n'), "entry must be newline-terminated");
        assert_eq!(contents.lines().count(), 1);
        serde_json::from_str(contents.trim_end()).unwrap()
    }

    #[test]
    fn test_json_logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonLogger>();
    }

    #[test]
    fn test_plain_message() {
        let (logger, buffer) = logger();
        logger.info("this is my message").unwrap();
        assert_eq!(
            parse(&buffer),
            json!({
                "datetime": "2024-03-09",
                "level": "info",
                "message": "this is my message",
            })
        );
    }

    #[test]
    fn test_output_is_compact_and_sorted() {
        let (logger, buffer) = logger();
        logger.with_field("key", "value").info("hi").unwrap();
        assert_eq!(
            buffer.contents(),
            "{\"datetime\":\"2024-03-09\",\"key\":\"value\",\"level\":\"info\",\"message\":\"hi\"}\n"
        );
    }

    #[test]
    fn test_with_plain_error() {
        let (logger, buffer) = logger();
        logger
            .with_error(std::io::Error::other("bad error"))
            .error("this is my message")
            .unwrap();
        assert_eq!(
            parse(&buffer),
            json!({
                "datetime": "2024-03-09",
                "error": "bad error",
                "level": "error",
                "message": "this is my message",
            })
        );
    }

    #[test]
    fn test_unknown_code_is_omitted() {
        let (logger, buffer) = logger();
        logger
            .with_error(DiagnosticError::new(ErrorCode::Unknown, "bad error"))
            .error("m")
            .unwrap();
        assert!(parse(&buffer).get("error.code").is_none());
    }

    #[test]
    fn test_diagnostic_error_data_and_code() {
        let (logger, buffer) = logger();
        let err = DiagnosticError::new(ErrorCode::NotFound, "tile missing")
            .with_data("tile", "+37-122")
            .with_data("zoom", 16);
        logger.with_error(err).warn("fetch failed").unwrap();

        let entry = parse(&buffer);
        assert_eq!(entry["error"], "tile missing");
        assert_eq!(entry["error.tile"], "+37-122");
        assert_eq!(entry["error.zoom"], 16);
        assert_eq!(entry["error.code"], "not_found");
        assert_eq!(entry["level"], "warn");
    }

    #[test]
    fn test_fields_override_reserved_keys() {
        let (logger, buffer) = logger();
        logger
            .with_fields([("message", json!("from field")), ("level", json!(7))])
            .info("from call")
            .unwrap();
        let entry = parse(&buffer);
        assert_eq!(entry["message"], "from field");
        assert_eq!(entry["level"], 7);
    }

    #[test]
    fn test_structured_field_values() {
        let (logger, buffer) = logger();
        logger
            .with_field("tags", json!(["a", "b"]))
            .with_field("ctx", json!({"attempt": 2}))
            .info("m")
            .unwrap();
        let entry = parse(&buffer);
        assert_eq!(entry["tags"], json!(["a", "b"]));
        assert_eq!(entry["ctx"]["attempt"], 2);
    }

    #[test]
    fn test_filtered_out_writes_nothing() {
        let (logger, buffer) = logger();
        logger.with_level(Level::Warn).info("hidden").unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_with_fields_leaves_original_untouched() {
        let (logger, buffer) = logger();
        let derived = logger.with_fields([("a", 1), ("b", 2)]);
        assert!(logger.fields().is_empty());
        assert_eq!(derived.fields().len(), 2);

        logger.info("m").unwrap();
        assert!(parse(&buffer).get("a").is_none());
    }
}
