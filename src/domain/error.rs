use thiserror::Error;

/// Errors surfaced by level parsing and by print operations.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log level '{input}', must be one of {valid_levels:?}")]
    InvalidLevel {
        input: String,
        valid_levels: Vec<String>,
    },

    #[error("could not marshal json entry")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write log message")]
    Write(#[source] std::io::Error),

    #[error("invalid datetime format '{format}'")]
    DateTimeFormat { format: String },
}
