//! Grid configuration editor.
//!
//! [`GRID_FIELDS`] describes the `[grid]` form for whatever renders it.
//! [`apply`] parses one raw value, validates the result and hands back the
//! changed configuration, leaving the input untouched on error.

use crate::config::error::ConfigError;
use crate::config::schema::{GridConfig, Theme};

/// Input kind of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Integer with a lower bound.
    Number {
        /// Smallest accepted value.
        min: u16,
    },
    /// Boolean switch.
    Toggle,
    /// One of a fixed set of options.
    Select {
        /// Accepted values, in menu order.
        options: &'static [&'static str],
    },
}

/// One editable `[grid]` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key in the `[grid]` table.
    pub key: &'static str,
    /// Form label.
    pub label: &'static str,
    /// Input kind.
    pub kind: FieldKind,
}

const THEME_OPTIONS: &[&str] = &["dark", "light", "glass", "midnight"];

/// The grid form, in display order.
pub const GRID_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "title",
        label: "Title",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "columns",
        label: "Columns",
        kind: FieldKind::Number { min: 1 },
    },
    FieldSpec {
        key: "theme",
        label: "Theme",
        kind: FieldKind::Select {
            options: THEME_OPTIONS,
        },
    },
    FieldSpec {
        key: "show_empty_message",
        label: "Show empty message",
        kind: FieldKind::Toggle,
    },
    FieldSpec {
        key: "empty_message",
        label: "Empty message",
        kind: FieldKind::Text,
    },
    FieldSpec {
        key: "show_climate_controls",
        label: "Show climate controls",
        kind: FieldKind::Toggle,
    },
    FieldSpec {
        key: "show_cover_controls",
        label: "Show cover controls",
        kind: FieldKind::Toggle,
    },
    FieldSpec {
        key: "light_compact",
        label: "Compact lights",
        kind: FieldKind::Toggle,
    },
    FieldSpec {
        key: "allow_reorder",
        label: "Allow drag to reorder",
        kind: FieldKind::Toggle,
    },
    FieldSpec {
        key: "custom_style",
        label: "Custom style",
        kind: FieldKind::Text,
    },
];

/// Field descriptor for `key`. Accepts both `columns` and `grid.columns`.
pub fn field(key: &str) -> Option<&'static FieldSpec> {
    let key = key.strip_prefix("grid.").unwrap_or(key);
    GRID_FIELDS.iter().find(|f| f.key == key)
}

/// Current value of `key`, formatted the way [`apply`] accepts it.
pub fn value_of(grid: &GridConfig, key: &str) -> Option<String> {
    let spec = field(key)?;
    let value = match spec.key {
        "title" => grid.title.clone(),
        "columns" => grid.columns.to_string(),
        "theme" => grid.theme.to_string(),
        "show_empty_message" => grid.show_empty_message.to_string(),
        "empty_message" => grid.empty_message.clone(),
        "show_climate_controls" => grid.show_climate_controls.to_string(),
        "show_cover_controls" => grid.show_cover_controls.to_string(),
        "light_compact" => grid.light_compact.to_string(),
        "allow_reorder" => grid.allow_reorder.to_string(),
        "custom_style" => grid.custom_style.clone(),
        _ => return None,
    };
    Some(value)
}

/// Returns `grid` with `key` set from `raw`.
pub fn apply(grid: &GridConfig, key: &str, raw: &str) -> Result<GridConfig, ConfigError> {
    let spec = field(key).ok_or_else(|| ConfigError::UnknownKey {
        key: key.to_string(),
    })?;
    let dotted = format!("grid.{}", spec.key);
    let mut next = grid.clone();

    match spec.kind {
        FieldKind::Text => {
            let text = raw.to_string();
            match spec.key {
                "title" => next.title = text,
                "empty_message" => next.empty_message = text,
                _ => next.custom_style = text,
            }
        }
        FieldKind::Number { min } => {
            let value: u16 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(&dotted, format!("'{raw}' is not a number")))?;
            if value < min {
                return Err(ConfigError::invalid(
                    &dotted,
                    format!("must be at least {min}"),
                ));
            }
            next.columns = value;
        }
        FieldKind::Toggle => {
            let value = parse_toggle(raw)
                .ok_or_else(|| ConfigError::invalid(&dotted, format!("'{raw}' is not on/off")))?;
            match spec.key {
                "show_empty_message" => next.show_empty_message = value,
                "show_climate_controls" => next.show_climate_controls = value,
                "show_cover_controls" => next.show_cover_controls = value,
                "light_compact" => next.light_compact = value,
                _ => next.allow_reorder = value,
            }
        }
        FieldKind::Select { .. } => {
            next.theme = raw.trim().parse::<Theme>()?;
        }
    }

    next.validate()?;
    tracing::debug!("grid config {} set to {:?}", spec.key, raw);
    Ok(next)
}

fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
