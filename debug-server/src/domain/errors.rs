//! Structured error types for debug-server
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Bind failures have no variant here: `run` returns the raw `std::io::Error`.

use thiserror::Error;

/// A log level name that is not one of the accepted spellings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid log level: {0}")]
pub struct ParseLevelError(pub String);

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid profile duration: {0}")]
    InvalidDuration(String),

    #[error("Profile collection task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum ServeError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Debug server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
