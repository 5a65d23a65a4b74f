//! Core error types for studyhive-core.
//!
//! This module defines a comprehensive error hierarchy using thiserror
//! for better error handling and reporting across the library.

use std::path::PathBuf;
use thiserror::Error;

use crate::quota::AiFeature;

/// Core error type for studyhive-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// The daily ceiling for an AI feature has been reached.
    #[error("Daily {feature} quota exceeded ({used}/{limit}); resets within 24 hours")]
    QuotaExceeded {
        feature: AiFeature,
        used: u32,
        limit: u32,
    },

    /// A negative XP amount was passed to the level engine.
    #[error("Invalid XP amount: {0} (must be non-negative)")]
    InvalidAmount(i64),

    /// Malformed trigger input.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A concurrent write to the same profile was detected.
    /// The caller should retry the whole orchestration run.
    #[error("Concurrent update detected for user '{user_id}'")]
    Conflict { user_id: String },

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// AI text-generation errors
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Stored profile document could not be decoded
    #[error("Corrupt profile document for user '{user_id}': {message}")]
    CorruptDocument { user_id: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Failed to resolve the data directory
    #[error("Failed to access data directory: {0}")]
    DataDirError(String),
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
}

/// Errors from the external text-generation collaborator.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Endpoint not configured
    #[error("Text generation endpoint not configured")]
    NotConfigured,

    /// The upstream service returned a non-success status
    #[error("Generation service error (HTTP {status}): {message}")]
    UpstreamFailed { status: u16, message: String },

    /// Transport-level failure
    #[error("Generation request failed: {0}")]
    RequestFailed(String),

    /// The response body had no usable text
    #[error("Generation response contained no text")]
    EmptyResponse,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::RequestFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
