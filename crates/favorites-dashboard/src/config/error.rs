//! Errors of the configuration layer: file access, TOML syntax, validation
//! and editor input.

use std::path::PathBuf;
use thiserror::Error;

/// Anything that can go wrong between `config.toml` and a validated [`Config`].
///
/// [`Config`]: crate::config::Config
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read configuration file: {path}")]
    ReadError {
        /// File that was read.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// Not valid TOML, or a value of the wrong type.
    #[error("Invalid configuration at {path}:{line}:{column}: {message}")]
    ParseError {
        /// Offending file.
        path: PathBuf,
        /// One-based, 0 when the parser gave no position.
        line: usize,
        /// One-based, 0 when the parser gave no position.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// `--config` names a file that does not exist.
    #[error("Configuration file not found: {path}")]
    NotFound {
        /// Requested file.
        path: PathBuf,
    },

    /// `config init` without `--force` over an existing file.
    #[error("Configuration file already exists: {path}")]
    AlreadyExists {
        /// Existing file.
        path: PathBuf,
    },

    /// Writing the file, its backup or its directory failed.
    #[error("Failed to write configuration file: {path}")]
    WriteError {
        /// Target path.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// The in-memory config could not be rendered as TOML.
    #[error("Failed to serialize configuration: {message}")]
    SerializeError {
        /// Serializer message.
        message: String,
    },

    /// A field holds a value outside its allowed range or format.
    #[error("Invalid value for `{key}`: {message}")]
    InvalidValue {
        /// Dotted key of the offending field.
        key: String,
        /// What is wrong with it.
        message: String,
    },

    /// A star wrapper names no entity, neither directly nor via its card.
    #[error("Please define an entity")]
    MissingEntity,

    /// The editor was asked to change a field it does not know.
    #[error("Unknown configuration key: {key}")]
    UnknownKey {
        /// The requested key.
        key: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidValue`].
    pub fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
