//! Where `favd` keeps its configuration.
//!
//! `$XDG_CONFIG_HOME/favorites-dashboard/config.toml` when the variable is
//! set (on every platform), otherwise `~/.config/favorites-dashboard` on
//! Linux and the Application Support directory on macOS.
//!
//! The favorites store lives under the data directory instead, see
//! [`favorites_store::default_store_path`].

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "favorites-dashboard";
const CONFIG_FILE: &str = "config.toml";

/// Directory holding `config.toml`.
pub fn config_dir() -> PathBuf {
    resolve_config_dir(std::env::var_os("XDG_CONFIG_HOME"))
}

/// Full path of the configuration file.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Creates `path` and its parents, owner-only on unix.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

/// An empty override counts as unset.
fn resolve_config_dir(xdg_override: Option<OsString>) -> PathBuf {
    let base = match xdg_override.filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => platform_base(),
    };
    base.join(APP_DIR)
}

#[cfg(target_os = "macos")]
fn platform_base() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(not(target_os = "macos"))]
fn platform_base() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from("."), |home| home.join(".config"))
}
