//! Error types for favorites-store
//!
//! Storage failures and request validation failures are kept apart so callers
//! can tell a bad request from a broken disk.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Storage file error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Request validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Storage file errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error reading or writing the storage file
    #[error("Failed to access storage file {path}: {source}")]
    Io {
        /// Path to the storage file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the storage file
    #[error("Failed to parse storage file {path}: {message}")]
    Parse {
        /// Path to the storage file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Failed to serialize store data
    #[error("Failed to serialize favorites: {0}")]
    Serialize(String),

    /// Failed to write the storage file atomically
    #[error("Failed to write storage atomically: {path} - Safety copy at: {temp_path}")]
    WriteAtomic {
        /// Path to the storage file
        path: PathBuf,
        /// Path to the temporary safety copy
        temp_path: PathBuf,
    },
}

/// Request validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Entity id is not of the form `domain.object_id`
    #[error("Invalid entity id: {0:?}")]
    InvalidEntityId(String),

    /// User id was empty
    #[error("A user id is required")]
    MissingUser,
}

/// Result type alias for favorites-store operations
pub type Result<T> = std::result::Result<T, Error>;
