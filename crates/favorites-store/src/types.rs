//! Type definitions for favorites-store
//!
//! The on-disk layout, change events and request validation helpers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ValidationError;

/// A single favorited entity for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteItem {
    /// Entity identifier (`domain.object_id`)
    pub entity_id: String,
    /// ISO 8601 timestamp of insertion
    #[serde(default)]
    pub added_at: String,
    /// Position within the user's list, rewritten after every mutation
    #[serde(default)]
    pub order: usize,
    /// Display name override
    #[serde(default)]
    pub custom_name: Option<String>,
    /// Icon override
    #[serde(default)]
    pub custom_icon: Option<String>,
    /// Area the entity belonged to when it was added
    #[serde(default)]
    pub area_id: Option<String>,
}

/// Full storage document: user id to ordered favorites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreData {
    /// Favorites per user
    #[serde(default)]
    pub users: BTreeMap<String, Vec<FavoriteItem>>,
}

/// Kind of mutation reported by a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    /// An entity was added
    Add,
    /// An entity was removed
    Remove,
    /// The list was reordered
    Reorder,
    /// The list was emptied
    Clear,
    /// An item's display override changed
    Update,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeAction::Add => "add",
            ChangeAction::Remove => "remove",
            ChangeAction::Reorder => "reorder",
            ChangeAction::Clear => "clear",
            ChangeAction::Update => "update",
        };
        write!(f, "{}", s)
    }
}

/// Notification emitted after an effective mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// What happened
    pub action: ChangeAction,
    /// Whose list changed
    pub user_id: String,
    /// Affected entity, if the action targets one
    pub entity_id: Option<String>,
    /// The user's entity ids after the change
    pub favorites: Vec<String>,
}

/// Aggregate numbers across all users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Total favorites across all users
    pub count: usize,
    /// Whether any user has at least one favorite
    pub has_favorites: bool,
}

/// Checks that `entity_id` looks like `domain.object_id`.
///
/// Both halves must be non-empty and consist of lowercase ASCII letters,
/// digits and underscores.
pub fn validate_entity_id(entity_id: &str) -> Result<(), ValidationError> {
    let valid_part = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    };
    match entity_id.split_once('.') {
        Some((domain, object_id)) if valid_part(domain) && valid_part(object_id) => Ok(()),
        _ => Err(ValidationError::InvalidEntityId(entity_id.to_string())),
    }
}

/// Checks that a user id was supplied.
pub fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    if user_id.trim().is_empty() {
        Err(ValidationError::MissingUser)
    } else {
        Ok(())
    }
}
