//! Commented default configuration and `config init` file creation.
//!
//! The template parses to exactly `Config::default()`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

/// Commented TOML template with every default value spelled out.
///
/// Sections: `[grid]`, `[timing]`, `[logging]`, and a commented-out
/// `[[favoritable]]` example.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Favorites Dashboard Configuration
#
# All values below are the built-in defaults. Edit them in place or use
# `favd config set <key> <value>` for the [grid] section.
#
# Location: $XDG_CONFIG_HOME/favorites-dashboard/config.toml

# ==============================================================================
# Favorites grid
# ==============================================================================

[grid]

# Header title. An empty string hides the header.
title = "Favorites"

# Number of columns (at least 1).
columns = 2

# Show a message instead of an empty grid.
show_empty_message = true
empty_message = "No favorites yet!"

# Per-domain controls.
show_climate_controls = true
show_cover_controls = true

# Lights render as compact tiles that toggle on click.
light_compact = true

# Drag-and-drop reordering.
allow_reorder = true

# Options: "dark", "light", "glass", "midnight"
theme = "dark"

# Free-form style text appended to the theme.
custom_style = ""

# ==============================================================================
# Interaction timing
# ==============================================================================

[timing]

# Exit transition before a removed favorite disappears.
remove_delay = "200ms"

# Long press: glow after glow_delay, open the rename dialog after rename_delay.
glow_delay = "1s"
rename_delay = "4s"

# Pointer travel in pixels that cancels a long press.
move_tolerance = 10.0

# ==============================================================================
# Logging
# ==============================================================================

[logging]

# Options: "error", "warn", "info", "debug", "trace"
# The FAVD_LOG environment variable takes precedence.
level = "info"

# ==============================================================================
# Star wrappers
# ==============================================================================

# [[favoritable]]
# entity = "light.kitchen"
# button_position = "top-right"   # top-left, bottom-right, bottom-left
# button_size = "24px"
# show_icon = true
#
# [favoritable.card]
# type = "tile"
# entity = "light.kitchen"
"#;

// ---------------------------------------------------------------------------
// File creation functions
// ---------------------------------------------------------------------------

/// Writes the template to the XDG config path. See [`create_default_config_at`].
pub fn create_default_config(force: bool) -> Result<PathBuf, ConfigError> {
    let path = xdg::config_path();
    create_default_config_at(&path, force)?;
    Ok(path)
}

/// Writes the template to `path`.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, moves it to `.toml.backup` first.
pub fn create_default_config_at(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let backup_path = path.with_extension("toml.backup");
        fs::rename(path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_template(path)?;
    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}

/// Writes the template, creating parent dirs and setting 0600 permissions.
fn write_template(path: &Path) -> Result<(), ConfigError> {
    let write_error = |e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        xdg::ensure_dir(parent).map_err(write_error)?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_error)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
