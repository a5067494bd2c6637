//! Host snapshot ingestion.
//!
//! The host pushes a full [`HomeState`] whenever anything changes. The
//! favorites of the viewing user live in the attributes of
//! [`FAVORITES_SENSOR`]; everything read from there is lenient, so a missing
//! sensor, user, or malformed record yields fewer favorites rather than an
//! error.

use crate::{EntityStatus, FavoriteRecord};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Entity whose attributes carry `users` and `count`.
pub const FAVORITES_SENSOR: &str = "sensor.favorites_list";

/// Immutable host snapshot: the viewer and every entity's status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeState {
    /// Identity of the viewing user, if known.
    pub user_id: Option<String>,
    /// Entity id to live status.
    pub states: HashMap<String, EntityStatus>,
}

impl HomeState {
    /// Empty snapshot for `user_id`.
    pub fn new(user_id: Option<&str>) -> Self {
        Self {
            user_id: user_id.map(str::to_string),
            states: HashMap::new(),
        }
    }

    /// Builder-style entity insertion.
    pub fn with_entity(mut self, entity_id: &str, status: EntityStatus) -> Self {
        self.states.insert(entity_id.to_string(), status);
        self
    }

    /// Builder-style replacement of the favorites sensor attributes.
    pub fn with_favorites(mut self, attributes: Value) -> Self {
        let attributes = match attributes {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let count = attributes
            .get("count")
            .and_then(Value::as_u64)
            .unwrap_or_default();
        self.states.insert(
            FAVORITES_SENSOR.to_string(),
            EntityStatus {
                state: count.to_string(),
                attributes,
            },
        );
        self
    }

    /// Live status of one entity.
    pub fn entity(&self, entity_id: &str) -> Option<&EntityStatus> {
        self.states.get(entity_id)
    }

    /// The viewing user's ordered favorites.
    ///
    /// Unknown viewer, absent sensor or absent user entry all give an empty
    /// list. Records without a string `entity_id` are skipped.
    pub fn user_favorites(&self) -> Vec<FavoriteRecord> {
        match (&self.user_id, self.entity(FAVORITES_SENSOR)) {
            (Some(user_id), Some(sensor)) => favorites_for_user(&sensor.attributes, user_id),
            _ => Vec::new(),
        }
    }
}

/// Extracts `users[user_id]` from favorites sensor attributes.
pub fn favorites_for_user(attributes: &Map<String, Value>, user_id: &str) -> Vec<FavoriteRecord> {
    let Some(items) = attributes
        .get("users")
        .and_then(|users| users.get(user_id))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<FavoriteRecord>(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("skipping malformed favorite record: {}", e);
                None
            }
        })
        .collect()
}

/// Identity of an ordered id sequence, used to detect material changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(Vec<String>);

impl Fingerprint {
    /// Fingerprint of the ids of `records`, in order.
    pub fn of(records: &[FavoriteRecord]) -> Self {
        Self(records.iter().map(|r| r.entity_id.clone()).collect())
    }

    /// Fingerprint of an explicit id sequence.
    pub fn from_ids(ids: Vec<String>) -> Self {
        Self(ids)
    }

    /// The ids, in order.
    pub fn ids(&self) -> &[String] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn home(user: Option<&str>, attributes: Value) -> HomeState {
        HomeState::new(user).with_favorites(attributes)
    }

    #[test]
    fn reads_current_users_favorites_in_order() {
        let state = home(
            Some("u1"),
            json!({"users": {
                "u1": [{"entity_id": "light.kitchen"}, {"entity_id": "climate.lr", "custom_name": "AC"}],
                "u2": [{"entity_id": "cover.blind"}]
            }, "count": 3}),
        );
        let favorites = state.user_favorites();
        let ids: Vec<&str> = favorites.iter().map(|f| f.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["light.kitchen", "climate.lr"]);
        assert_eq!(favorites[1].custom_name.as_deref(), Some("AC"));
    }

    #[test]
    fn unknown_or_missing_user_is_empty() {
        let attrs = json!({"users": {"u1": [{"entity_id": "light.kitchen"}]}});
        assert!(home(Some("u9"), attrs.clone()).user_favorites().is_empty());
        assert!(home(None, attrs).user_favorites().is_empty());
    }

    #[test]
    fn missing_sensor_or_attribute_is_empty() {
        assert!(HomeState::new(Some("u1")).user_favorites().is_empty());
        assert!(home(Some("u1"), json!({"count": 0})).user_favorites().is_empty());
        assert!(home(Some("u1"), json!({"users": {"u1": "nope"}}))
            .user_favorites()
            .is_empty());
    }

    #[test]
    fn malformed_records_are_skipped() {
        let state = home(
            Some("u1"),
            json!({"users": {"u1": [
                {"entity_id": "light.a"},
                {"name": "no id"},
                17,
                {"entity_id": "light.b"}
            ]}}),
        );
        let ids: Vec<String> = state
            .user_favorites()
            .into_iter()
            .map(|f| f.entity_id)
            .collect();
        assert_eq!(ids, vec!["light.a", "light.b"]);
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let a = Fingerprint::of(&[FavoriteRecord::new("light.a"), FavoriteRecord::new("light.b")]);
        let b = Fingerprint::of(&[FavoriteRecord::new("light.b"), FavoriteRecord::new("light.a")]);
        assert_ne!(a, b);
        assert_eq!(
            a,
            Fingerprint::from_ids(vec!["light.a".to_string(), "light.b".to_string()])
        );
    }

    #[test]
    fn fingerprint_ignores_overrides() {
        let mut renamed = FavoriteRecord::new("light.a");
        renamed.custom_name = Some("Desk".to_string());
        assert_eq!(
            Fingerprint::of(&[renamed]),
            Fingerprint::of(&[FavoriteRecord::new("light.a")])
        );
    }
}
