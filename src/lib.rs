#![deny(rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::missing_errors_doc,      // Every fallible call returns LoggingError or ConfigError
    clippy::missing_panics_doc,      // Internal API
    clippy::module_name_repetitions, // e.g. LoggerConfig in config module
    clippy::must_use_candidate,      // Builder methods are self-evidently used
    clippy::doc_markdown             // Template tokens like %m in docs
)]

//! Leveled structured logging with text and JSON renderers.
//!
//! Both renderers implement [`Logger`]. Loggers are immutable snapshots:
//! `with_error`, `with_field` and `with_fields` return a new logger that
//! shares the original's sink.

pub mod app;
pub mod domain;
pub mod logger;
pub mod render;
pub mod sink;

pub use domain::{DiagnosticError, ErrorCode, Level, LoggingError};
pub use logger::Logger;
pub use render::{AnyLogger, Fields, JsonLogger, LogFormat, TextLogger};
pub use sink::{SharedBuffer, Sink};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
