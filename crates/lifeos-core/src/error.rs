//! Core error types for lifeos-core.
//!
//! This module defines the error hierarchy using thiserror. Store and AI
//! failures never reach the user as errors: the service layer logs them,
//! raises a notification and falls back to a safe default.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lifeos-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence adapter errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Completion service or reply-shape errors
    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence adapter errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,

    /// A stored document could not be decoded into its typed form
    #[error("Document '{key}' is malformed: {message}")]
    Malformed { key: String, message: String },
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dotted configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Completion service errors.
///
/// Every variant is an expected outcome of a best-effort integration.
#[derive(Error, Debug)]
pub enum AiError {
    /// Network-level failure
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Service answered with a non-success status
    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response carried no candidate text
    #[error("No usable candidate in response")]
    EmptyResponse,

    /// Candidate text was not valid JSON
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),

    /// JSON parsed but did not match the expected schema
    #[error("Unexpected response shape: {0}")]
    Format(String),

    /// Prioritization reply applied to a task list that changed since the prompt
    #[error("Task list changed since the prompt was built")]
    Stale,

    /// No API key configured
    #[error("Completion service is not configured: {0}")]
    NotConfigured(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Required text was empty or blank
    #[error("'{field}' must not be empty")]
    EmptyText { field: String },

    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },

    /// Unknown identifier
    #[error("No {kind} with id '{id}'")]
    NotFound { kind: String, id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub fn empty(field: &str) -> Self {
        ValidationError::EmptyText {
            field: field.to_string(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Transport(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_wraps_into_core() {
        let err: CoreError = StoreError::Locked.into();
        assert_eq!(err.to_string(), "Store error: Store is locked");
    }

    #[test]
    fn test_format_error_message() {
        let err = AiError::Format("missing key 'high'".into());
        assert!(err.to_string().contains("missing key 'high'"));
    }

    #[test]
    fn test_validation_helper() {
        let err = ValidationError::empty("task text");
        assert_eq!(err.to_string(), "'task text' must not be empty");
    }
}
