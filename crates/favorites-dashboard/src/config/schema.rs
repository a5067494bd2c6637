//! TOML configuration schema for the favorites dashboard.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so a partial file fills in the rest.
//!
//! Duration fields use human-readable strings (e.g. `"200ms"`, `"4s"`)
//! parsed by the `humantime` crate at the call site.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::error::ConfigError;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
///
/// ```toml
/// [grid]
/// [timing]
/// [logging]
/// [[favoritable]]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Favorites grid widget settings.
    pub grid: GridConfig,
    /// Interaction delays and tolerances.
    pub timing: TimingConfig,
    /// Log verbosity.
    pub logging: LoggingConfig,
    /// Star wrapper instances.
    pub favoritable: Vec<StarConfig>,
}

impl Config {
    /// Checks every section, failing on the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.timing.timings()?;
        for star in &self.favoritable {
            star.validate()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Favorites grid widget configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    /// Header title. Empty hides the header.
    pub title: String,
    /// Number of grid columns (at least 1).
    pub columns: u16,
    /// Show `empty_message` when there are no favorites.
    pub show_empty_message: bool,
    /// Text shown for an empty list.
    pub empty_message: String,
    /// Show the temperature stepper on climate items.
    pub show_climate_controls: bool,
    /// Show open/stop/close buttons on cover items.
    pub show_cover_controls: bool,
    /// Render lights as compact toggle tiles.
    pub light_compact: bool,
    /// Allow drag-and-drop reordering.
    pub allow_reorder: bool,
    /// Colour theme.
    pub theme: Theme,
    /// Free-form style text appended to the theme.
    pub custom_style: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            title: "Favorites".to_string(),
            columns: 2,
            show_empty_message: true,
            empty_message: "No favorites yet!".to_string(),
            show_climate_controls: true,
            show_cover_controls: true,
            light_compact: true,
            allow_reorder: true,
            theme: Theme::Dark,
            custom_style: String::new(),
        }
    }
}

impl GridConfig {
    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::invalid("grid.columns", "must be at least 1"));
        }
        Ok(())
    }
}

/// Grid colour themes.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    /// Dark background (default).
    #[default]
    Dark,
    /// Light background.
    Light,
    /// Translucent panels.
    Glass,
    /// Deep blue background.
    Midnight,
}

impl Theme {
    /// All themes, in menu order.
    pub const ALL: [Theme; 4] = [Theme::Dark, Theme::Light, Theme::Glass, Theme::Midnight];

    /// Config spelling of the theme.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Glass => "glass",
            Theme::Midnight => "midnight",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConfigError::invalid("grid.theme", format!("unknown theme '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Interaction timing from the TOML `[timing]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Exit transition before a removed item disappears.
    pub remove_delay: String,
    /// Press duration before the rename glow starts.
    pub glow_delay: String,
    /// Press duration before the rename modal opens.
    pub rename_delay: String,
    /// Pointer travel (px) that cancels a long press.
    pub move_tolerance: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            remove_delay: "200ms".to_string(),
            glow_delay: "1s".to_string(),
            rename_delay: "4s".to_string(),
            move_tolerance: 10.0,
        }
    }
}

/// Parsed [`TimingConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timings {
    /// Exit transition before removal.
    pub remove_delay: Duration,
    /// Press-to-glow delay.
    pub glow_delay: Duration,
    /// Press-to-rename delay.
    pub rename_delay: Duration,
    /// Long-press movement tolerance in px.
    pub move_tolerance: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            remove_delay: Duration::from_millis(200),
            glow_delay: Duration::from_secs(1),
            rename_delay: Duration::from_secs(4),
            move_tolerance: 10.0,
        }
    }
}

impl TimingConfig {
    /// Parses the duration strings.
    ///
    /// The rename delay must not be shorter than the glow delay.
    pub fn timings(&self) -> Result<Timings, ConfigError> {
        let parse = |key: &str, raw: &str| {
            humantime::parse_duration(raw).map_err(|e| ConfigError::invalid(key, e.to_string()))
        };
        let timings = Timings {
            remove_delay: parse("timing.remove_delay", &self.remove_delay)?,
            glow_delay: parse("timing.glow_delay", &self.glow_delay)?,
            rename_delay: parse("timing.rename_delay", &self.rename_delay)?,
            move_tolerance: self.move_tolerance,
        };
        if timings.rename_delay < timings.glow_delay {
            return Err(ConfigError::invalid(
                "timing.rename_delay",
                "must not be shorter than timing.glow_delay",
            ));
        }
        if !self.move_tolerance.is_finite() || self.move_tolerance < 0.0 {
            return Err(ConfigError::invalid(
                "timing.move_tolerance",
                "must be a non-negative number",
            ));
        }
        Ok(timings)
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging configuration from the TOML `[logging]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Verbosity used when `FAVD_LOG` is unset.
    pub level: LogLevel,
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    #[default]
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Filter directive for the level.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// ---------------------------------------------------------------------------
// Star wrapper
// ---------------------------------------------------------------------------

/// One star wrapper, from a `[[favoritable]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StarConfig {
    /// Entity the star toggles. Falls back to `card.entity`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Corner of the child the star sits in.
    pub button_position: ButtonPosition,
    /// Star button size as a dimension string.
    pub button_size: String,
    /// Whether the star is shown at all.
    pub show_icon: bool,
    /// Embedded child widget configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<toml::Table>,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            entity: None,
            button_position: ButtonPosition::TopRight,
            button_size: "24px".to_string(),
            show_icon: true,
            card: None,
        }
    }
}

impl StarConfig {
    /// Star config for `entity` with all other fields at their defaults.
    pub fn for_entity(entity: &str) -> Self {
        Self {
            entity: Some(entity.to_string()),
            ..Self::default()
        }
    }

    /// `entity`, or the embedded card's `entity`.
    pub fn resolved_entity(&self) -> Option<&str> {
        self.entity
            .as_deref()
            .filter(|e| !e.is_empty())
            .or_else(|| {
                self.card
                    .as_ref()
                    .and_then(|card| card.get("entity"))
                    .and_then(toml::Value::as_str)
                    .filter(|e| !e.is_empty())
            })
    }

    /// Fails with [`ConfigError::MissingEntity`] if no entity resolves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolved_entity().is_none() {
            return Err(ConfigError::MissingEntity);
        }
        Ok(())
    }
}

/// Star button placement (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonPosition {
    /// Top-right corner (default).
    #[default]
    TopRight,
    /// Top-left corner.
    TopLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Bottom-left corner.
    BottomLeft,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
