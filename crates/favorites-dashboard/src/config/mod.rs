/// Default configuration template and file creation.
pub mod default;

/// Grid configuration editor: field descriptors and validated edits.
pub mod editor;

/// Configuration error types.
pub mod error;

/// Configuration file loader.
pub mod loader;

/// TOML configuration schema types.
pub mod schema;

/// XDG Base Directory path resolution utilities.
pub mod xdg;

pub use error::ConfigError;
pub use schema::{
    ButtonPosition, Config, GridConfig, LogLevel, LoggingConfig, StarConfig, Theme, TimingConfig,
    Timings,
};
