//! Renderers turning a (level, message, error, fields) tuple into bytes.
//!
//! - `TextLogger`: template-based human readable lines
//! - `JsonLogger`: one compact JSON object per line
//! - `AnyLogger`: either of the two, selected at runtime

pub mod any;
pub mod json;
pub mod text;

pub use any::{AnyLogger, LogFormat};
pub use json::JsonLogger;
pub use text::TextLogger;

use crate::domain::{Level, LoggingError};
use crate::sink::Sink;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt::{self, Write as _};
use std::sync::Arc;

/// RFC3339 with up to nanosecond precision, always in UTC.
pub const RFC3339_NANO: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Additional fields attached to every entry, iterated in key order.
pub type Fields = BTreeMap<String, Value>;

/// Source of the current time for `%T` and `datetime`.
pub type Clock = fn() -> DateTime<Utc>;

pub(crate) type AttachedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Configuration shared by both renderers.
///
/// Cloning copies the field map into a new container; the sink and the
/// attached error are shared.
#[derive(Clone)]
pub(crate) struct RendererState {
    pub(crate) level: Level,
    pub(crate) sink: Sink,
    pub(crate) datetime_format: String,
    pub(crate) fields: Fields,
    pub(crate) error: Option<AttachedError>,
    pub(crate) clock: Clock,
}

impl Default for RendererState {
    fn default() -> Self {
        Self {
            level: Level::Info,
            sink: Sink::stderr(),
            datetime_format: RFC3339_NANO.to_string(),
            fields: Fields::new(),
            error: None,
            clock: Utc::now,
        }
    }
}

impl RendererState {
    pub(crate) fn timestamp(&self) -> Result<String, LoggingError> {
        let now = (self.clock)();
        let mut out = String::new();
        write!(out, "{}", now.format(&self.datetime_format)).map_err(|_| {
            LoggingError::DateTimeFormat {
                format: self.datetime_format.clone(),
            }
        })?;
        Ok(out)
    }

    pub(crate) fn error(&self) -> Option<&(dyn StdError + 'static)> {
        self.error
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }

    pub(crate) fn write(&self, bytes: &[u8]) -> Result<(), LoggingError> {
        self.sink.write_all(bytes).map_err(LoggingError::Write)
    }

    pub(crate) fn with_error<E>(&self, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let mut state = self.clone();
        state.error = Some(Arc::new(err));
        state
    }

    pub(crate) fn with_fields<I, K, V>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut state = self.clone();
        for (key, value) in fields {
            state.fields.insert(key.into(), value.into());
        }
        state
    }
}

impl fmt::Debug for RendererState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererState")
            .field("level", &self.level)
            .field("datetime_format", &self.datetime_format)
            .field("fields", &self.fields)
            .field("error", &self.error.as_ref().map(|e| e.to_string()))
            .finish()
    }
}
