//! Outbound service requests.
//!
//! Widgets never talk to a backend directly. They produce [`ServiceCall`]s and
//! hand them to a [`ServiceClient`], which may reject them asynchronously.
//! [`StoreClient`] answers the `favorites.*` services from a local
//! [`FavoritesStore`].

use crate::snapshot::HomeState;
use crate::{Domain, EntityStatus};
use favorites_store::{ChangeEvent, FavoritesStore};
use futures::future::BoxFuture;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::broadcast;

/// Cover motion commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverAction {
    /// Raise / open.
    Open,
    /// Lower / close.
    Close,
    /// Stop moving.
    Stop,
}

impl CoverAction {
    /// Host service name for the action.
    pub fn service(self) -> &'static str {
        match self {
            CoverAction::Open => "open_cover",
            CoverAction::Close => "close_cover",
            CoverAction::Stop => "stop_cover",
        }
    }
}

impl std::str::FromStr for CoverAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(CoverAction::Open),
            "close" => Ok(CoverAction::Close),
            "stop" => Ok(CoverAction::Stop),
            other => Err(format!("unknown cover action: {other}")),
        }
    }
}

/// One request to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    /// `favorites.toggle`
    ToggleFavorite {
        /// Entity to toggle.
        entity_id: String,
        /// Requesting viewer.
        user_id: Option<String>,
    },
    /// `favorites.remove`
    RemoveFavorite {
        /// Entity to remove.
        entity_id: String,
        /// Requesting viewer.
        user_id: Option<String>,
    },
    /// `favorites.reorder`
    ReorderFavorites {
        /// Complete new order.
        entity_ids: Vec<String>,
        /// Requesting viewer.
        user_id: Option<String>,
    },
    /// `favorites.update`
    UpdateFavorite {
        /// Entity to rename.
        entity_id: String,
        /// New display name, `None` resets to the default.
        custom_name: Option<String>,
        /// Requesting viewer.
        user_id: Option<String>,
    },
    /// `climate.set_hvac_mode`
    SetHvacMode {
        /// Climate entity.
        entity_id: String,
        /// Target mode.
        hvac_mode: String,
    },
    /// `climate.set_fan_mode`
    SetFanMode {
        /// Climate entity.
        entity_id: String,
        /// Target fan mode.
        fan_mode: String,
    },
    /// `climate.set_temperature`
    SetTemperature {
        /// Climate entity.
        entity_id: String,
        /// Target temperature.
        temperature: f64,
    },
    /// `light.toggle`
    ToggleLight {
        /// Light entity.
        entity_id: String,
    },
    /// `cover.open_cover`, `cover.close_cover` or `cover.stop_cover`
    Cover {
        /// Cover entity.
        entity_id: String,
        /// Motion command.
        action: CoverAction,
    },
    /// `<domain>.toggle` for switch-like domains
    ToggleEntity {
        /// Entity to toggle.
        entity_id: String,
    },
}

impl ServiceCall {
    /// Host domain that serves the call.
    pub fn domain(&self) -> String {
        match self {
            ServiceCall::ToggleFavorite { .. }
            | ServiceCall::RemoveFavorite { .. }
            | ServiceCall::ReorderFavorites { .. }
            | ServiceCall::UpdateFavorite { .. } => "favorites".to_string(),
            ServiceCall::SetHvacMode { .. }
            | ServiceCall::SetFanMode { .. }
            | ServiceCall::SetTemperature { .. } => "climate".to_string(),
            ServiceCall::ToggleLight { .. } => "light".to_string(),
            ServiceCall::Cover { .. } => "cover".to_string(),
            ServiceCall::ToggleEntity { entity_id } => Domain::of(entity_id).to_string(),
        }
    }

    /// Service name within the domain.
    pub fn service(&self) -> &'static str {
        match self {
            ServiceCall::ToggleFavorite { .. } => "toggle",
            ServiceCall::RemoveFavorite { .. } => "remove",
            ServiceCall::ReorderFavorites { .. } => "reorder",
            ServiceCall::UpdateFavorite { .. } => "update",
            ServiceCall::SetHvacMode { .. } => "set_hvac_mode",
            ServiceCall::SetFanMode { .. } => "set_fan_mode",
            ServiceCall::SetTemperature { .. } => "set_temperature",
            ServiceCall::ToggleLight { .. } | ServiceCall::ToggleEntity { .. } => "toggle",
            ServiceCall::Cover { action, .. } => action.service(),
        }
    }

    /// The single entity the call targets, if any.
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            ServiceCall::ReorderFavorites { .. } => None,
            ServiceCall::ToggleFavorite { entity_id, .. }
            | ServiceCall::RemoveFavorite { entity_id, .. }
            | ServiceCall::UpdateFavorite { entity_id, .. }
            | ServiceCall::SetHvacMode { entity_id, .. }
            | ServiceCall::SetFanMode { entity_id, .. }
            | ServiceCall::SetTemperature { entity_id, .. }
            | ServiceCall::ToggleLight { entity_id }
            | ServiceCall::Cover { entity_id, .. }
            | ServiceCall::ToggleEntity { entity_id } => Some(entity_id),
        }
    }

    /// JSON payload sent with the call.
    pub fn data(&self) -> Value {
        let mut data = Map::new();
        let with_user = |data: &mut Map<String, Value>, user_id: &Option<String>| {
            if let Some(user_id) = user_id {
                data.insert("user_id".to_string(), json!(user_id));
            }
        };
        match self {
            ServiceCall::ToggleFavorite { entity_id, user_id }
            | ServiceCall::RemoveFavorite { entity_id, user_id } => {
                data.insert("entity_id".to_string(), json!(entity_id));
                with_user(&mut data, user_id);
            }
            ServiceCall::ReorderFavorites {
                entity_ids,
                user_id,
            } => {
                data.insert("entity_ids".to_string(), json!(entity_ids));
                with_user(&mut data, user_id);
            }
            ServiceCall::UpdateFavorite {
                entity_id,
                custom_name,
                user_id,
            } => {
                data.insert("entity_id".to_string(), json!(entity_id));
                data.insert("custom_name".to_string(), json!(custom_name));
                with_user(&mut data, user_id);
            }
            ServiceCall::SetHvacMode {
                entity_id,
                hvac_mode,
            } => {
                data.insert("entity_id".to_string(), json!(entity_id));
                data.insert("hvac_mode".to_string(), json!(hvac_mode));
            }
            ServiceCall::SetFanMode {
                entity_id,
                fan_mode,
            } => {
                data.insert("entity_id".to_string(), json!(entity_id));
                data.insert("fan_mode".to_string(), json!(fan_mode));
            }
            ServiceCall::SetTemperature {
                entity_id,
                temperature,
            } => {
                data.insert("entity_id".to_string(), json!(entity_id));
                data.insert("temperature".to_string(), json!(temperature));
            }
            ServiceCall::ToggleLight { entity_id }
            | ServiceCall::Cover { entity_id, .. }
            | ServiceCall::ToggleEntity { entity_id } => {
                data.insert("entity_id".to_string(), json!(entity_id));
            }
        }
        Value::Object(data)
    }
}

impl fmt::Display for ServiceCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} {}", self.domain(), self.service(), self.data())
    }
}

/// Failure of a service request.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The client does not serve this domain/service.
    #[error("Service {domain}.{service} is not supported by this client")]
    Unsupported {
        /// Requested domain.
        domain: String,
        /// Requested service.
        service: String,
    },

    /// A favorites service was called without a viewer identity.
    #[error("Service favorites.{service} requires a user id")]
    MissingUser {
        /// Requested service.
        service: String,
    },

    /// The favorites store refused or failed the request.
    #[error("Favorites store error: {0}")]
    Store(#[from] favorites_store::Error),

    /// The blocking store task panicked or was cancelled.
    #[error("Favorites store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The host rejected the request.
    #[error("Service {domain}.{service} failed: {message}")]
    Rejected {
        /// Requested domain.
        domain: String,
        /// Requested service.
        service: String,
        /// Host-provided reason.
        message: String,
    },
}

/// Async seam for outbound requests.
pub trait ServiceClient: Send + Sync {
    /// Issues `call`, resolving once the host accepted or rejected it.
    fn call(&self, call: ServiceCall) -> BoxFuture<'static, Result<(), ServiceError>>;
}

/// Default capacity of the store change channel.
const DEFAULT_CHANGE_CHANNEL_CAPACITY: usize = 64;

/// [`ServiceClient`] answering `favorites.*` from a shared [`FavoritesStore`].
///
/// Device services (climate, light, cover, toggles) are reported as
/// [`ServiceError::Unsupported`]. Mutations and their file writes run on the
/// blocking pool.
#[derive(Clone)]
pub struct StoreClient {
    store: Arc<Mutex<FavoritesStore>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient")
            .field("subscriber_count", &self.changes.receiver_count())
            .finish_non_exhaustive()
    }
}

impl StoreClient {
    /// Client owning `store`.
    pub fn new(store: FavoritesStore) -> Self {
        let (changes, _rx) = broadcast::channel(DEFAULT_CHANGE_CHANNEL_CAPACITY);
        Self {
            store: Arc::new(Mutex::new(store)),
            changes,
        }
    }

    /// Receives every effective store mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    /// Current favorites sensor attributes (`{users, count}`).
    pub async fn attributes(&self) -> Value {
        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .attributes()
    }

    /// Host snapshot for `user_id` combining `states` with the current
    /// favorites sensor.
    pub async fn snapshot(
        &self,
        user_id: Option<&str>,
        states: HashMap<String, EntityStatus>,
    ) -> HomeState {
        let mut home = HomeState::new(user_id);
        home.states = states;
        home.with_favorites(self.attributes().await)
    }

    async fn handle(&self, call: ServiceCall) -> Result<(), ServiceError> {
        let user_id = match &call {
            ServiceCall::ToggleFavorite { user_id, .. }
            | ServiceCall::RemoveFavorite { user_id, .. }
            | ServiceCall::ReorderFavorites { user_id, .. }
            | ServiceCall::UpdateFavorite { user_id, .. } => {
                user_id.clone().ok_or_else(|| ServiceError::MissingUser {
                    service: call.service().to_string(),
                })?
            }
            other => {
                return Err(ServiceError::Unsupported {
                    domain: other.domain(),
                    service: other.service().to_string(),
                })
            }
        };

        let store = Arc::clone(&self.store);
        let event = tokio::task::spawn_blocking(move || {
            let mut store = store.lock().unwrap_or_else(PoisonError::into_inner);
            apply(&mut store, &user_id, call)
        })
        .await??;

        if let Some(event) = event {
            tracing::debug!("favorites {} for {}", event.action, event.user_id);
            if self.changes.send(event).is_err() {
                tracing::trace!("no subscribers for store change");
            }
        }
        Ok(())
    }
}

/// Runs one favorites mutation against the store, saving it to disk.
fn apply(
    store: &mut FavoritesStore,
    user_id: &str,
    call: ServiceCall,
) -> favorites_store::Result<Option<ChangeEvent>> {
    match call {
        ServiceCall::ToggleFavorite { entity_id, .. } => {
            store.toggle(user_id, &entity_id).map(Some)
        }
        ServiceCall::RemoveFavorite { entity_id, .. } => store.remove(user_id, &entity_id),
        ServiceCall::ReorderFavorites { entity_ids, .. } => store.reorder(user_id, &entity_ids),
        ServiceCall::UpdateFavorite {
            entity_id,
            custom_name,
            ..
        } => store.update(user_id, &entity_id, custom_name),
        _ => Ok(None),
    }
}

impl ServiceClient for StoreClient {
    fn call(&self, call: ServiceCall) -> BoxFuture<'static, Result<(), ServiceError>> {
        let client = self.clone();
        Box::pin(async move { client.handle(call).await })
    }
}
