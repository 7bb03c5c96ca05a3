//! The logger capability shared by every renderer.
//!
//! Print operations return a `Result` so callers decide what a failed write
//! means. Derivations (`with_error`, `with_field`, `with_fields`) never
//! mutate the receiver; they return a new logger that shares the sink.
//!
//! ```
//! use rask_logging::{Logger, TextLogger, SharedBuffer, log_info};
//!
//! let buffer = SharedBuffer::new();
//! let logger = TextLogger::new()
//!     .with_output(buffer.clone())
//!     .with_format("%L %m%f\n");
//!
//! let request = logger.with_field("request_id", "abc-123");
//! log_info!(request, "served {} bytes", 512).unwrap();
//!
//! assert_eq!(buffer.contents(), "info served 512 bytes (abc-123)\n");
//! ```

use crate::domain::{Level, LoggingError};
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt::Arguments;

/// Leveled logging interface implemented by the text and JSON renderers.
///
/// Implementations must be `Send + Sync`. The generic derivation methods are
/// only available on sized implementors; `dyn Logger` still prints.
pub trait Logger: Send + Sync {
    /// The configured verbosity threshold.
    fn level(&self) -> Level;

    /// Renders and writes one entry if `level` passes the threshold.
    fn print(&self, level: Level, message: &str) -> Result<(), LoggingError>;

    fn enabled(&self, level: Level) -> bool {
        self.level().includes(level)
    }

    /// Formats `args` into the message, skipping formatting when filtered out.
    fn printf(&self, level: Level, args: Arguments<'_>) -> Result<(), LoggingError> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.print(level, &args.to_string())
    }

    fn error(&self, message: &str) -> Result<(), LoggingError> {
        self.print(Level::Error, message)
    }

    fn errorf(&self, args: Arguments<'_>) -> Result<(), LoggingError> {
        self.printf(Level::Error, args)
    }

    fn warn(&self, message: &str) -> Result<(), LoggingError> {
        self.print(Level::Warn, message)
    }

    fn warnf(&self, args: Arguments<'_>) -> Result<(), LoggingError> {
        self.printf(Level::Warn, args)
    }

    fn info(&self, message: &str) -> Result<(), LoggingError> {
        self.print(Level::Info, message)
    }

    fn infof(&self, args: Arguments<'_>) -> Result<(), LoggingError> {
        self.printf(Level::Info, args)
    }

    fn trace(&self, message: &str) -> Result<(), LoggingError> {
        self.print(Level::Trace, message)
    }

    fn tracef(&self, args: Arguments<'_>) -> Result<(), LoggingError> {
        self.printf(Level::Trace, args)
    }

    /// Returns a copy with `err` attached, replacing any previous error.
    fn with_error<E>(&self, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
        Self: Sized;

    /// Returns a copy with one field set or overridden.
    fn with_field<K, V>(&self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        Self: Sized;

    /// Returns a copy with every given field set or overridden.
    fn with_fields<I, K, V>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
        Self: Sized;
}

/// Convenience macros for logging with format strings.
#[macro_export]
macro_rules! log_print {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        $logger.printf($level, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.errorf(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warnf(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.infof(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)*) => {
        $logger.tracef(format_args!($($arg)*))
    };
}
