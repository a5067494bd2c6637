//! Star-toggle wrapper around an arbitrary child widget.
//!
//! The wrapper tracks membership of exactly one entity for the current
//! viewer. A click flips the star immediately, tells sibling widgets, and
//! asks the store to toggle; a rejected request flips it back.

use crate::config::{ButtonPosition, ConfigError, StarConfig};
use crate::grid::Command;
use crate::notify::FavoriteChanged;
use crate::service::{ServiceCall, ServiceError};
use crate::snapshot::HomeState;

/// Icon of a starred entity.
pub const STAR_ON: &str = "mdi:star";
/// Icon of an entity that is not a favorite.
pub const STAR_OFF: &str = "mdi:star-outline";

/// What the star button shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarView {
    /// Current membership.
    pub is_favorite: bool,
    /// [`STAR_ON`] or [`STAR_OFF`].
    pub icon: &'static str,
    /// Corner of the child the star sits in.
    pub position: ButtonPosition,
    /// Button size as a dimension string.
    pub size: String,
    /// Whether the star is drawn.
    pub visible: bool,
}

/// The star wrapper.
#[derive(Debug, Clone)]
pub struct StarWrapper {
    config: StarConfig,
    entity_id: String,
    user_id: Option<String>,
    is_favorite: bool,
    synced: bool,
    /// Membership asked for by the toggle in flight.
    pending: Option<bool>,
}

impl StarWrapper {
    /// Wrapper for `config`. Fails if no entity resolves.
    pub fn new(config: StarConfig) -> Result<Self, ConfigError> {
        let entity_id = config
            .resolved_entity()
            .ok_or(ConfigError::MissingEntity)?
            .to_string();
        Ok(Self {
            config,
            entity_id,
            user_id: None,
            is_favorite: false,
            synced: false,
            pending: None,
        })
    }

    /// Entity whose membership the star toggles.
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Current membership.
    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    /// Embedded child configuration, passed through untouched.
    pub fn card(&self) -> Option<&toml::Table> {
        self.config.card.as_ref()
    }

    /// Star button state.
    pub fn view(&self) -> StarView {
        StarView {
            is_favorite: self.is_favorite,
            icon: if self.is_favorite { STAR_ON } else { STAR_OFF },
            position: self.config.button_position,
            size: self.config.button_size.clone(),
            visible: self.config.show_icon,
        }
    }

    /// Reads membership from a host snapshot.
    pub fn ingest(&mut self, home: &HomeState) {
        self.synced = true;
        self.user_id = home.user_id.clone();
        self.is_favorite = home
            .user_favorites()
            .iter()
            .any(|r| r.entity_id == self.entity_id);
    }

    /// Applies a sibling widget's change to this entity. Returns whether the
    /// star changed.
    pub fn apply_notification(&mut self, change: &FavoriteChanged) -> bool {
        if change.entity_id != self.entity_id
            || !change.applies_to(self.user_id.as_deref())
            || change.is_favorite == self.is_favorite
        {
            return false;
        }
        self.is_favorite = change.is_favorite;
        true
    }

    /// Star clicked. Ignored until the first snapshot arrives.
    pub fn toggle(&mut self) -> Vec<Command> {
        if !self.synced {
            return Vec::new();
        }
        self.is_favorite = !self.is_favorite;
        self.pending = Some(self.is_favorite);
        tracing::debug!(
            "toggling {} (favorite: {})",
            self.entity_id,
            self.is_favorite
        );
        vec![
            Command::Notify(self.change(self.is_favorite)),
            Command::Call(ServiceCall::ToggleFavorite {
                entity_id: self.entity_id.clone(),
                user_id: self.user_id.clone(),
            }),
        ]
    }

    /// Outcome of the toggle request. A rejection restores the membership from
    /// before the toggle, whatever snapshots arrived meanwhile, and tells
    /// siblings about the revert.
    pub fn request_finished(
        &mut self,
        call: &ServiceCall,
        outcome: Result<(), &ServiceError>,
    ) -> Vec<Command> {
        let ServiceCall::ToggleFavorite { entity_id, .. } = call else {
            return Vec::new();
        };
        if *entity_id != self.entity_id {
            return Vec::new();
        }
        let Some(intended) = self.pending.take() else {
            return Vec::new();
        };
        let Err(error) = outcome else {
            return Vec::new();
        };
        tracing::warn!("toggle of {} failed, reverting: {}", entity_id, error);
        self.is_favorite = !intended;
        vec![Command::Notify(self.change(self.is_favorite))]
    }

    fn change(&self, is_favorite: bool) -> FavoriteChanged {
        FavoriteChanged {
            entity_id: self.entity_id.clone(),
            is_favorite,
            user_id: self.user_id.clone(),
        }
    }
}
