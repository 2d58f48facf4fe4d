// src/error.rs

//! Error types shared by the store, the repositories and the remote catalog

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by cookme
#[derive(Error, Debug)]
pub enum Error {
    /// The storage file could not be opened, locked or read within the open timeout
    #[error("Storage unavailable at {}: {reason}", path.display())]
    StorageUnavailable { path: PathBuf, reason: String },

    /// An expiration date outside the representable calendar range
    #[error("Invalid expiration for '{name}': {days} days from now is out of range")]
    InvalidExpiration { name: String, days: i64 },

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    /// A compare-and-swap write found a newer version than the one it read
    #[error("Version conflict on bucket '{bucket}': expected {expected}, found {found}")]
    VersionConflict {
        bucket: String,
        expected: u64,
        found: u64,
    },

    #[error("Failed to decode collection '{bucket}': {source}")]
    DecodeFailure {
        bucket: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode collection '{bucket}': {source}")]
    EncodeFailure {
        bucket: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Remote recipe catalog unreachable at {endpoint}: {reason}")]
    RemoteUnreachable { endpoint: String, reason: String },

    #[error("Remote {operation} call failed: {reason}")]
    RemoteCallFailure {
        operation: &'static str,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when the error means the backing medium could not be used at all
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Error::StorageUnavailable { .. })
    }
}
