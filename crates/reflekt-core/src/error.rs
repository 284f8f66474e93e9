//! Core error types for reflekt-core.
//!
//! This module defines the error hierarchy using thiserror. Persistence
//! failures are recoverable: the recommendation path degrades to default
//! statistics instead of propagating them, while feedback writes surface
//! them to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for reflekt-core.
#[derive(Error, Debug)]
pub enum RecommenderError {
    /// Persistence-related errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Rating outside the accepted 1-5 range, rejected before any write
    #[error("Invalid rating {rating}: must be between 1 and 5")]
    InvalidRating { rating: u8 },

    /// Tool id not present in the catalog
    #[error("Unknown tool id: {tool_id}")]
    UnknownTool { tool_id: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notify(String),
}

/// Persistence-specific errors from the key-value collaborator.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Reading a namespace failed
    #[error("Failed to read namespace '{namespace}': {message}")]
    ReadFailed { namespace: String, message: String },

    /// Writing a namespace failed
    #[error("Failed to write namespace '{namespace}': {message}")]
    WriteFailed { namespace: String, message: String },

    /// The stored value could not be decoded
    #[error("Corrupt value in namespace '{namespace}': {source}")]
    Corrupt {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem-level failure in a file-backed store
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for RecommenderError
pub type Result<T, E = RecommenderError> = std::result::Result<T, E>;
