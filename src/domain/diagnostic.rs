//! Errors carrying a classification code and embedded diagnostic data.
//!
//! Any error can be attached to a logger. When the attached error (or any
//! error in its `source()` chain) is a [`DiagnosticError`], the JSON renderer
//! lifts its data into `error.<key>` entries and its code into `error.code`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::fmt;

/// Classification code for a [`DiagnosticError`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    #[default]
    Unknown,
    InvalidArgument,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    Unavailable,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => "unknown",
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::NotFound => "not_found",
            ErrorCode::AlreadyExists => "already_exists",
            ErrorCode::PermissionDenied => "permission_denied",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::Internal => "internal",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ErrorCode::Unknown)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(ErrorCode::Unknown),
            "invalid_argument" => Ok(ErrorCode::InvalidArgument),
            "not_found" => Ok(ErrorCode::NotFound),
            "already_exists" => Ok(ErrorCode::AlreadyExists),
            "permission_denied" => Ok(ErrorCode::PermissionDenied),
            "unavailable" => Ok(ErrorCode::Unavailable),
            "internal" => Ok(ErrorCode::Internal),
            _ => Err(format!("unknown error code '{s}'")),
        }
    }
}

/// An error with a code, a message and embedded key/value data.
#[derive(Debug)]
pub struct DiagnosticError {
    code: ErrorCode,
    message: String,
    data: Map<String, Value>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl DiagnosticError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: Map::new(),
            source: None,
        }
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }
}

impl fmt::Display for DiagnosticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for DiagnosticError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&e| e.source())
}

/// Collects embedded data from every [`DiagnosticError`] in the chain.
///
/// When a key appears more than once the outermost error wins.
pub fn embedded_data(err: &(dyn StdError + 'static)) -> Map<String, Value> {
    let mut data = Map::new();
    for diag in chain(err).filter_map(|e| e.downcast_ref::<DiagnosticError>()) {
        for (key, value) in &diag.data {
            if !data.contains_key(key) {
                data.insert(key.clone(), value.clone());
            }
        }
    }
    data
}

/// Returns the outermost non-unknown code in the chain, or `Unknown`.
pub fn error_code(err: &(dyn StdError + 'static)) -> ErrorCode {
    chain(err)
        .filter_map(|e| e.downcast_ref::<DiagnosticError>())
        .map(DiagnosticError::code)
        .find(|code| !code.is_unknown())
        .unwrap_or_default()
}
