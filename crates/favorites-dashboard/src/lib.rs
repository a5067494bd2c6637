//! Favorites Dashboard library
//!
//! Dashboard widgets for a smart-home frontend: a favorites grid with
//! per-domain controls, a star wrapper that toggles membership of a single
//! entity, and the configuration editor behind the grid.
//!
//! The widgets share one synchronization protocol. Each pushes host snapshots
//! through [`snapshot`], keeps an optimistic working copy in
//! [`favorites::FavoriteList`], and asks [`render::RenderDiff`] whether the
//! visible tree must be rebuilt or only patched in place. Cross-widget
//! consistency travels over the page-scoped [`notify::NotificationBus`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Configuration loading, schema, and the grid config editor.
pub mod config;

/// Async driver serializing host, UI, timer and notification events.
pub mod controller;

/// Ordered favorites working copy with a membership mirror.
pub mod favorites;

/// The favorites grid component.
pub mod grid;

/// Pointer interaction state machines.
pub mod interaction;

/// Logging initialization.
pub mod logging;

/// Cross-widget favorite change notifications.
pub mod notify;

/// Render-diff engine and per-domain view models.
pub mod render;

/// Outbound service requests and the store-backed client.
pub mod service;

/// Host snapshot ingestion.
pub mod snapshot;

/// The star-toggle wrapper widget.
pub mod star;

/// Terminal rendering of the grid view model.
pub mod tui;

/// Entity domain, the part of an entity id before the first `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Domain {
    /// `light.*`
    Light,
    /// `switch.*`
    Switch,
    /// `climate.*`
    Climate,
    /// `cover.*`
    Cover,
    /// `fan.*`
    Fan,
    /// `lock.*`
    Lock,
    /// `media_player.*`
    MediaPlayer,
    /// `sensor.*`
    Sensor,
    /// `binary_sensor.*`
    BinarySensor,
    /// `input_boolean.*`
    InputBoolean,
    /// Any other domain.
    Other(String),
}

impl Domain {
    /// Domain of an entity id. Ids without a `.` are treated as a bare domain.
    pub fn of(entity_id: &str) -> Domain {
        let domain = entity_id.split('.').next().unwrap_or_default();
        domain.parse().unwrap_or_else(|e: Infallible| match e {})
    }

    /// Whether a plain click toggles entities of this domain.
    pub fn is_toggleable(&self) -> bool {
        matches!(self, Domain::Switch | Domain::Fan | Domain::InputBoolean)
    }

    /// Fallback icon when neither the favorite nor the entity names one.
    pub fn default_icon(&self) -> &'static str {
        match self {
            Domain::Light => "mdi:lightbulb",
            Domain::Switch => "mdi:toggle-switch",
            Domain::Climate => "mdi:thermostat",
            Domain::Cover => "mdi:window-shutter",
            Domain::Fan => "mdi:fan",
            Domain::Lock => "mdi:lock",
            Domain::MediaPlayer => "mdi:play-circle",
            Domain::Sensor => "mdi:eye",
            Domain::BinarySensor => "mdi:checkbox-marked-circle",
            Domain::InputBoolean | Domain::Other(_) => "mdi:help-circle",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Domain::Light => "light",
            Domain::Switch => "switch",
            Domain::Climate => "climate",
            Domain::Cover => "cover",
            Domain::Fan => "fan",
            Domain::Lock => "lock",
            Domain::MediaPlayer => "media_player",
            Domain::Sensor => "sensor",
            Domain::BinarySensor => "binary_sensor",
            Domain::InputBoolean => "input_boolean",
            Domain::Other(name) => name,
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Domain {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "light" => Domain::Light,
            "switch" => Domain::Switch,
            "climate" => Domain::Climate,
            "cover" => Domain::Cover,
            "fan" => Domain::Fan,
            "lock" => Domain::Lock,
            "media_player" => Domain::MediaPlayer,
            "sensor" => Domain::Sensor,
            "binary_sensor" => Domain::BinarySensor,
            "input_boolean" => Domain::InputBoolean,
            other => Domain::Other(other.to_string()),
        })
    }
}

/// One favorited entity as seen by the widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    /// Entity identifier, unique within one user's list.
    pub entity_id: String,
    /// Insertion timestamp, informational only.
    #[serde(default)]
    pub added_at: Option<String>,
    /// Display name override.
    #[serde(default)]
    pub custom_name: Option<String>,
    /// Icon override.
    #[serde(default)]
    pub custom_icon: Option<String>,
}

impl FavoriteRecord {
    /// A record with no overrides.
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            added_at: None,
            custom_name: None,
            custom_icon: None,
        }
    }

    /// Domain of the referenced entity.
    pub fn domain(&self) -> Domain {
        Domain::of(&self.entity_id)
    }
}

/// Live status of one entity, as published by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStatus {
    /// Raw state string (`on`, `off`, `heat`, `opening`, ...).
    pub state: String,
    /// Free-form attributes.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityStatus {
    /// Status with the given state and no attributes.
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// String attribute, if present and a string.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Numeric attribute, if present and a number.
    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).and_then(Value::as_f64)
    }

    /// List-of-strings attribute. Non-string entries are dropped.
    pub fn attr_str_list(&self, key: &str) -> Option<Vec<String>> {
        self.attributes.get(key).and_then(Value::as_array).map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
    }

    /// The host-provided display name.
    pub fn friendly_name(&self) -> Option<&str> {
        self.attr_str("friendly_name")
    }
}

#[cfg(test)]
mod test_utils;
