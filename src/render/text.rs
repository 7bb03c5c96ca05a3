//! Human readable renderer driven by a small template language.
//!
//! Supported placeholders:
//! - `%m`: the log message
//! - `%T`: the datetime, formatted with the datetime format
//! - `%L`: the level name
//! - `%e`: the attached error, rendered through the error template
//! - `%f`: all field values, rendered through the fields template
//! - `%<key>`: the value of the field named `key`
//!
//! Substitution order is fixed: named fields first, then `%T`, `%L`, `%e`,
//! `%f` and finally `%m`. A field named after a reserved token (`m`, `T`,
//! `L`, `e`, `f`) therefore shadows it. Named fields are substituted longest
//! key first, so `%id_long` is not clobbered by a field called `id`. The
//! message is substituted last so `%` sequences inside it are never
//! interpreted.
//!
//! Field values render like Go's `%v`: strings bare, whole-number floats
//! without a fraction (`1.0` prints as `1`) and everything else as JSON text.
//! In the error and fields templates `%%` is a literal `%`.

use super::{Clock, Fields, RendererState};
use crate::domain::{Level, LoggingError};
use crate::logger::Logger;
use crate::sink::Sink;
use serde_json::Value;
use std::borrow::Cow;
use std::error::Error as StdError;

pub const DEFAULT_FORMAT: &str = "[%L] %T: %e%m%f\n";
pub const DEFAULT_ERROR_FORMAT: &str = "(%s) ";
pub const DEFAULT_FIELDS_FORMAT: &str = " (%s)";

/// Logger writing template-formatted lines.
#[derive(Debug, Clone)]
pub struct TextLogger {
    state: RendererState,
    format: String,
    error_format: String,
    fields_format: String,
}

impl Default for TextLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLogger {
    /// Info level, stderr, RFC3339 datetimes and the default templates.
    pub fn new() -> Self {
        Self {
            state: RendererState::default(),
            format: DEFAULT_FORMAT.to_string(),
            error_format: DEFAULT_ERROR_FORMAT.to_string(),
            fields_format: DEFAULT_FIELDS_FORMAT.to_string(),
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.state.level = level;
        self
    }

    pub fn with_output(mut self, sink: impl Into<Sink>) -> Self {
        self.state.sink = sink.into();
        self
    }

    /// Sets the chrono strftime format used for `%T`.
    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.state.datetime_format = format.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Sets the template for `%e`; its first `%s` receives the error message.
    pub fn with_error_format(mut self, format: impl Into<String>) -> Self {
        self.error_format = format.into();
        self
    }

    /// Sets the template for `%f`; its first `%s` receives the joined values.
    pub fn with_fields_format(mut self, format: impl Into<String>) -> Self {
        self.fields_format = format.into();
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.state.clock = clock;
        self
    }

    pub fn fields(&self) -> &Fields {
        &self.state.fields
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn datetime_format(&self) -> &str {
        &self.state.datetime_format
    }

    pub fn sink(&self) -> &Sink {
        &self.state.sink
    }

    /// Renders one line without the level gate and without writing it.
    pub fn render(&self, level: Level, message: &str) -> Result<String, LoggingError> {
        let fields = &self.state.fields;
        let mut processed = self.format.clone();

        let mut named: Vec<_> = fields.iter().filter(|(key, _)| !key.is_empty()).collect();
        named.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        for (key, value) in named {
            processed = processed.replace(&format!("%{key}"), &display_value(value));
        }

        if processed.contains("%T") {
            processed = processed.replace("%T", &self.state.timestamp()?);
        }
        processed = processed.replace("%L", level.as_str());

        let error_block = match self.state.error() {
            Some(err) => interpolate(&self.error_format, &err.to_string()),
            None => String::new(),
        };
        processed = processed.replace("%e", &error_block);

        let fields_block = if fields.is_empty() {
            String::new()
        } else {
            let joined = fields
                .values()
                .map(display_value)
                .collect::<Vec<_>>()
                .join(",");
            interpolate(&self.fields_format, &joined)
        };
        processed = processed.replace("%f", &fields_block);

        Ok(processed.replace("%m", message))
    }
}

impl Logger for TextLogger {
    fn level(&self) -> Level {
        self.state.level
    }

    fn print(&self, level: Level, message: &str) -> Result<(), LoggingError> {
        if !self.enabled(level) {
            return Ok(());
        }
        let line = self.render(level, message)?;
        self.state.write(line.as_bytes())
    }

    fn with_error<E>(&self, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            state: self.state.with_error(err),
            ..self.clone()
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
            ..self.clone()
        }
    }
}

/// Strings render bare, whole floats drop the fraction, the rest as JSON text.
fn display_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => Cow::Owned(format!("{f:.0}")),
            _ => Cow::Owned(n.to_string()),
        },
        other => Cow::Owned(other.to_string()),
    }
}

/// Replaces the first unescaped `%s` in `template` with `value` and collapses
/// `%%` to `%`.
fn interpolate(template: &str, value: &str) -> String {
    let mut out = String::with_capacity(template.len() + value.len());
    let mut chars = template.chars();
    let mut substituted = false;
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('s') if !substituted => {
                out.push_str(value);
                substituted = true;
            }
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}
