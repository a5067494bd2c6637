//! Shared fixtures for unit tests: sample homes and a recording client.

#![cfg(test)]

use crate::service::{ServiceCall, ServiceClient, ServiceError};
use crate::snapshot::HomeState;
use crate::EntityStatus;
use futures::future::BoxFuture;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Viewer used by the fixtures.
pub const USER: &str = "u1";

/// Thermostat at 22° heating, with fan modes.
pub fn thermostat(state: &str) -> EntityStatus {
    EntityStatus::new(state)
        .with_attr("friendly_name", "Living room")
        .with_attr("temperature", 22.0)
        .with_attr("min_temp", 16.0)
        .with_attr("max_temp", 30.0)
        .with_attr("hvac_modes", json!(["off", "heat", "cool", "auto"]))
        .with_attr("fan_modes", json!(["auto", "low", "high"]))
        .with_attr("fan_mode", "auto")
}

/// Kitchen light in `state`.
pub fn kitchen_light(state: &str) -> EntityStatus {
    EntityStatus::new(state).with_attr("friendly_name", "Kitchen")
}

/// Blind in `state` at `position` percent.
pub fn blind(state: &str, position: u64) -> EntityStatus {
    EntityStatus::new(state)
        .with_attr("friendly_name", "Blind")
        .with_attr("current_position", position)
}

/// Favorites sensor attributes holding `ids` for [`USER`] and one entry for
/// another viewer.
pub fn favorites_attrs(ids: &[&str]) -> Value {
    let mine: Vec<Value> = ids.iter().map(|id| json!({"entity_id": id})).collect();
    json!({
        "users": {
            USER: mine,
            "u2": [{"entity_id": "switch.garage"}]
        },
        "count": ids.len() + 1
    })
}

/// Home with the three sample entities and `ids` as [`USER`]'s favorites.
pub fn home_with(ids: &[&str]) -> HomeState {
    HomeState::new(Some(USER))
        .with_entity("climate.lr", thermostat("heat"))
        .with_entity("light.kitchen", kitchen_light("off"))
        .with_entity("cover.blind", blind("open", 40))
        .with_favorites(favorites_attrs(ids))
}

/// `light.kitchen, climate.lr, cover.blind` for [`USER`].
pub fn sample_home() -> HomeState {
    home_with(&["light.kitchen", "climate.lr", "cover.blind"])
}

/// [`ServiceClient`] that records every call and fails chosen services.
#[derive(Debug, Clone, Default)]
pub struct RecordingClient {
    calls: Arc<Mutex<Vec<ServiceCall>>>,
    failing: Arc<Mutex<HashSet<&'static str>>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call to `service` fail.
    pub fn fail(&self, service: &'static str) {
        self.failing.lock().expect("lock").insert(service);
    }

    /// Calls issued so far.
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().expect("lock").clone()
    }
}

impl ServiceClient for RecordingClient {
    fn call(&self, call: ServiceCall) -> BoxFuture<'static, Result<(), ServiceError>> {
        let failed = self.failing.lock().expect("lock").contains(call.service());
        let result = if failed {
            Err(ServiceError::Rejected {
                domain: call.domain(),
                service: call.service().to_string(),
                message: "refused by test".to_string(),
            })
        } else {
            Ok(())
        };
        self.calls.lock().expect("lock").push(call);
        Box::pin(async move { result })
    }
}
