//! Core error types for restorae-core.
//!
//! Session errors are local, recoverable conditions surfaced to the caller
//! (typically the CLI or a GUI shell), never fatal to the process.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for restorae-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session state machine errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors raised by the session controller and sequence validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A sequence must contain at least one activity
    #[error("sequence contains no activities")]
    EmptySequence,

    /// Activity ids must be unique within a sequence
    #[error("duplicate activity id '{0}' in sequence")]
    DuplicateActivityId(String),

    /// Index beyond the end of the sequence
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Jumping ahead past unseen activities is not allowed
    #[error("cannot jump ahead to unseen index {index} (cursor at {cursor})")]
    IndexUnseen { index: usize, cursor: usize },

    /// Operation attempted after the terminal state
    #[error("session is already complete")]
    AlreadyComplete,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Data directory could not be created or resolved
    #[error("Data directory unavailable: {0}")]
    DataDirUnavailable(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
