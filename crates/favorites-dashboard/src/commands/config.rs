//! `favd config`: configuration file management.

use clap::Subcommand;
use favorites_dashboard::config::loader::ConfigLoader;
use favorites_dashboard::config::{default, editor, xdg, Config, ConfigError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Actions for the `config` subcommand.
#[derive(Debug, Subcommand)]
pub(crate) enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
    /// Change one `[grid]` setting
    Set {
        /// Grid key, e.g. `columns` or `grid.theme`
        key: String,
        /// New value
        value: String,
    },
}

/// Runs `action` against `path`, or the XDG location when `None`.
pub(crate) fn run_config_command(path: Option<&Path>, action: ConfigAction) -> ExitCode {
    let result = match action {
        ConfigAction::Init { force } => init(path, force).map(|path| {
            println!("Created configuration at {}", path.display());
        }),
        ConfigAction::Path => {
            let path = path.map_or_else(xdg::config_path, Path::to_path_buf);
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Validate => ConfigLoader::load(path).map(|config| {
            println!("Configuration is valid");
            println!("{config:#?}");
        }),
        ConfigAction::Set { key, value } => set(path, &key, &value).map(|shown| {
            println!("{} = {}", key, shown);
        }),
    };
    if let Err(e) = result {
        eprintln!("Config error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init(path: Option<&Path>, force: bool) -> Result<PathBuf, ConfigError> {
    match path {
        Some(path) => {
            default::create_default_config_at(path, force)?;
            Ok(path.to_path_buf())
        }
        None => default::create_default_config(force),
    }
}

/// Applies one editor change and saves the file. Returns the stored value.
///
/// A missing file starts from defaults.
pub(crate) fn set(path: Option<&Path>, key: &str, raw: &str) -> Result<String, ConfigError> {
    let path = path.map_or_else(xdg::config_path, Path::to_path_buf);
    let mut config = if path.exists() {
        ConfigLoader::load_from_path(&path)?
    } else {
        Config::default()
    };
    config.grid = editor::apply(&config.grid, key, raw)?;
    ConfigLoader::save_to_path(&config, &path)?;
    tracing::info!("Updated {} in {}", key, path.display());
    Ok(editor::value_of(&config.grid, key).unwrap_or_default())
}
