//! Reads and writes `config.toml`.
//!
//! Parse failures carry the line and column of the offending token. Every
//! configuration handed out has passed [`Config::validate`]; a missing file at
//! the default location means defaults, a missing explicit file is an error.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::schema::Config;
use crate::config::xdg;

/// Stateless configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the file at `path`.
    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let config = Self::parse(&content, path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads [`xdg::config_path`], or defaults when there is no file.
    pub fn load_default() -> Result<Config, ConfigError> {
        let path = xdg::config_path();
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Self::load_from_path(&path)
    }

    /// `path` when given, the default location otherwise.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        path.map_or_else(Self::load_default, Self::load_from_path)
    }

    /// Writes `config` to `path` (0600 on unix), creating parent directories.
    ///
    /// Comments of a hand-edited file are lost.
    pub fn save_to_path(config: &Config, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError {
            message: e.to_string(),
        })?;
        let write_error = |source| ConfigError::WriteError {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            xdg::ensure_dir(parent).map_err(write_error)?;
        }
        fs::write(path, content).map_err(write_error)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_error)?;
        }
        Ok(())
    }

    fn parse(content: &str, path: &Path) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| {
            let (line, column) = e
                .span()
                .map_or((0, 0), |span| line_column(content, span.start));
            ConfigError::ParseError {
                path: path.to_path_buf(),
                line,
                column,
                message: e.message().to_string(),
            }
        })
    }
}

/// One-based line and column of byte `offset` in `content`.
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;
    (line, column)
}
