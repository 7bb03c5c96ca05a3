//! Domain layer for rask-logging.
//!
//! Contains the types shared by every renderer:
//! - `Level`: Verbosity tier (None/Error/Warn/Info/Trace)
//! - `LoggingError`: Error type for parsing and printing
//! - `DiagnosticError`: Error carrying a code and embedded data

pub mod diagnostic;
pub mod error;
pub mod level;

pub use diagnostic::{DiagnosticError, ErrorCode};
pub use error::LoggingError;
pub use level::Level;
