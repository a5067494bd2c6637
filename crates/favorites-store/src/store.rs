//! Favorites storage and mutation
//!
//! Holds every user's ordered favorites, persists them as pretty JSON with
//! temp-file-then-rename writes, and reports each effective mutation as a
//! [`ChangeEvent`].

use crate::error::{Result, StorageError};
use crate::types::{
    validate_entity_id, validate_user_id, ChangeAction, ChangeEvent, FavoriteItem, StoreData,
    Summary,
};
use chrono::Local;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(test)]
mod tests;

/// User id that receives favorites migrated from the single-list format.
pub const MIGRATED_USER: &str = "migrated_default";

const APP_NAME: &str = "favorites-dashboard";

/// Returns the default storage file location.
///
/// Location: `<data dir>/favorites-dashboard/favorites.json`, falling back to
/// the current directory when no data directory can be determined.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("favorites.json")
}

/// Per-user favorites store.
///
/// Every mutation is validated, applied, renumbered and saved before the
/// change event is returned. A failed save puts the user's previous list
/// back, so memory never holds a change the file refused. A store created with [`FavoritesStore::in_memory`]
/// skips the save step.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    path: Option<PathBuf>,
    data: StoreData,
}

impl FavoritesStore {
    /// Creates an empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StoreData::default(),
        }
    }

    /// Loads the store from `path`.
    ///
    /// A missing file yields an empty store. A file in the legacy single-list
    /// format (`{"items": [...]}`) is migrated under [`MIGRATED_USER`] and
    /// saved right away.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file exists but cannot be read, and
    /// `StorageError::Parse` if it is not valid JSON or has a malformed
    /// `users` section.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No favorites file at {}, starting empty", path.display());
                return Ok(Self {
                    path: Some(path),
                    data: StoreData::default(),
                });
            }
            Err(source) => return Err(StorageError::Io { path, source }.into()),
        };

        let value: Value = serde_json::from_str(&content).map_err(|e| StorageError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let (data, migrated) = parse_document(value, &path)?;
        let store = Self {
            path: Some(path),
            data,
        };
        if migrated {
            log::info!("Migrating favorites to per-user format");
            store.save()?;
        }
        Ok(store)
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes the store atomically (temp file, fsync, rename).
    ///
    /// On failure before the rename the temp file is left behind as a safety
    /// copy. No-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let timestamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "favorites.json".to_string());
        let temp_path = path.with_file_name(format!("{}.tmp.{}", file_name, timestamp));

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;
        fs::write(&temp_path, json).map_err(|source| StorageError::Io {
            path: temp_path.clone(),
            source,
        })?;

        let file = fs::File::open(&temp_path).map_err(|source| StorageError::Io {
            path: temp_path.clone(),
            source,
        })?;
        file.sync_all().map_err(|source| StorageError::Io {
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, path).map_err(|_| StorageError::WriteAtomic {
            path: path.clone(),
            temp_path: temp_path.clone(),
        })?;
        Ok(())
    }

    /// All users and their favorites.
    pub fn users(&self) -> &BTreeMap<String, Vec<FavoriteItem>> {
        &self.data.users
    }

    /// The favorites of one user, empty for unknown users.
    pub fn user_items(&self, user_id: &str) -> &[FavoriteItem] {
        self.data
            .users
            .get(user_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Entity ids of one user's favorites, in order.
    pub fn user_entity_ids(&self, user_id: &str) -> Vec<String> {
        self.user_items(user_id)
            .iter()
            .map(|item| item.entity_id.clone())
            .collect()
    }

    /// Whether `entity_id` is among the user's favorites.
    pub fn is_favorite(&self, user_id: &str, entity_id: &str) -> bool {
        self.user_items(user_id)
            .iter()
            .any(|item| item.entity_id == entity_id)
    }

    /// Looks up one favorite.
    pub fn get_item(&self, user_id: &str, entity_id: &str) -> Option<&FavoriteItem> {
        self.user_items(user_id)
            .iter()
            .find(|item| item.entity_id == entity_id)
    }

    /// Appends `entity_id` to the user's favorites.
    ///
    /// Returns `Ok(None)` if it is already a favorite.
    pub fn add(
        &mut self,
        user_id: &str,
        entity_id: &str,
        custom_name: Option<String>,
        custom_icon: Option<String>,
    ) -> Result<Option<ChangeEvent>> {
        validate_user_id(user_id)?;
        validate_entity_id(entity_id)?;
        if self.is_favorite(user_id, entity_id) {
            return Ok(None);
        }

        let previous = self.data.users.get(user_id).cloned();
        let items = self.data.users.entry(user_id.to_string()).or_default();
        items.push(FavoriteItem {
            entity_id: entity_id.to_string(),
            added_at: Local::now().to_rfc3339(),
            order: items.len(),
            custom_name,
            custom_icon,
            area_id: None,
        });
        self.persist(user_id, previous)?;
        log::info!("Added {} to favorites for user {}", entity_id, user_id);
        Ok(Some(self.event(ChangeAction::Add, user_id, Some(entity_id))))
    }

    /// Removes `entity_id` from the user's favorites.
    ///
    /// Returns `Ok(None)` if the user or the entity is unknown.
    pub fn remove(&mut self, user_id: &str, entity_id: &str) -> Result<Option<ChangeEvent>> {
        validate_user_id(user_id)?;
        validate_entity_id(entity_id)?;
        let Some(items) = self.data.users.get_mut(user_id) else {
            return Ok(None);
        };
        let previous = items.clone();
        items.retain(|item| item.entity_id != entity_id);
        if items.len() == previous.len() {
            return Ok(None);
        }
        renumber(items);
        self.persist(user_id, Some(previous))?;
        log::info!("Removed {} from favorites for user {}", entity_id, user_id);
        Ok(Some(self.event(ChangeAction::Remove, user_id, Some(entity_id))))
    }

    /// Adds `entity_id` if absent, removes it if present.
    ///
    /// The returned event's action tells which of the two happened.
    pub fn toggle(&mut self, user_id: &str, entity_id: &str) -> Result<ChangeEvent> {
        let event = if self.is_favorite(user_id, entity_id) {
            self.remove(user_id, entity_id)?
        } else {
            self.add(user_id, entity_id, None, None)?
        };
        let event = match event {
            Some(event) => event,
            None => self.event(ChangeAction::Remove, user_id, Some(entity_id)),
        };
        log::info!(
            "Toggled {} for user {} - now {}",
            entity_id,
            user_id,
            if event.action == ChangeAction::Add {
                "favorited"
            } else {
                "not favorited"
            }
        );
        Ok(event)
    }

    /// Reorders the user's favorites.
    ///
    /// Known ids from `entity_ids` come first in the given order; favorites
    /// not mentioned keep their relative order at the end. Unknown ids are
    /// ignored. Returns `Ok(None)` for unknown users.
    pub fn reorder(&mut self, user_id: &str, entity_ids: &[String]) -> Result<Option<ChangeEvent>> {
        validate_user_id(user_id)?;
        let Some(items) = self.data.users.get_mut(user_id) else {
            return Ok(None);
        };
        let previous = items.clone();

        let mut remaining: Vec<Option<FavoriteItem>> = items.drain(..).map(Some).collect();
        let mut reordered = Vec::with_capacity(remaining.len());
        for entity_id in entity_ids {
            if let Some(slot) = remaining
                .iter_mut()
                .find(|slot| matches!(slot, Some(item) if &item.entity_id == entity_id))
            {
                if let Some(item) = slot.take() {
                    reordered.push(item);
                }
            }
        }
        reordered.extend(remaining.into_iter().flatten());
        renumber(&mut reordered);
        *items = reordered;

        self.persist(user_id, Some(previous))?;
        log::info!("Reordered favorites for user {}", user_id);
        Ok(Some(self.event(ChangeAction::Reorder, user_id, None)))
    }

    /// Removes every favorite of the user.
    pub fn clear(&mut self, user_id: &str) -> Result<ChangeEvent> {
        validate_user_id(user_id)?;
        let previous = self.data.users.insert(user_id.to_string(), Vec::new());
        self.persist(user_id, previous)?;
        log::info!("Cleared all favorites for user {}", user_id);
        Ok(self.event(ChangeAction::Clear, user_id, None))
    }

    /// Sets or clears the display name override of one favorite.
    ///
    /// Returns `Ok(None)` if the favorite does not exist.
    pub fn update(
        &mut self,
        user_id: &str,
        entity_id: &str,
        custom_name: Option<String>,
    ) -> Result<Option<ChangeEvent>> {
        validate_user_id(user_id)?;
        validate_entity_id(entity_id)?;
        let Some(item) = self.item_mut(user_id, entity_id) else {
            return Ok(None);
        };
        let previous = std::mem::replace(&mut item.custom_name, custom_name);
        if let Err(e) = self.save() {
            if let Some(item) = self.item_mut(user_id, entity_id) {
                item.custom_name = previous;
            }
            return Err(e);
        }
        log::info!(
            "Updated {} for user {} - name: {}",
            entity_id,
            user_id,
            self.get_item(user_id, entity_id)
                .and_then(|item| item.custom_name.as_deref())
                .unwrap_or("(default)")
        );
        Ok(Some(self.event(ChangeAction::Update, user_id, Some(entity_id))))
    }

    /// Totals across all users.
    pub fn summary(&self) -> Summary {
        let count = self.data.users.values().map(Vec::len).sum();
        Summary {
            count,
            has_favorites: count > 0,
        }
    }

    /// The state attributes published for dashboards: `{users, count}`.
    pub fn attributes(&self) -> Value {
        json!({
            "users": self.data.users,
            "count": self.summary().count,
        })
    }

    fn item_mut(&mut self, user_id: &str, entity_id: &str) -> Option<&mut FavoriteItem> {
        self.data
            .users
            .get_mut(user_id)
            .and_then(|items| items.iter_mut().find(|item| item.entity_id == entity_id))
    }

    /// Saves, or restores `previous` as the user's list if the save fails.
    /// `None` means the user had no entry before.
    fn persist(&mut self, user_id: &str, previous: Option<Vec<FavoriteItem>>) -> Result<()> {
        let Err(e) = self.save() else {
            return Ok(());
        };
        log::warn!("Save failed, keeping previous favorites for user {}", user_id);
        match previous {
            Some(items) => {
                self.data.users.insert(user_id.to_string(), items);
            }
            None => {
                self.data.users.remove(user_id);
            }
        }
        Err(e)
    }

    fn event(&self, action: ChangeAction, user_id: &str, entity_id: Option<&str>) -> ChangeEvent {
        ChangeEvent {
            action,
            user_id: user_id.to_string(),
            entity_id: entity_id.map(str::to_string),
            favorites: self.user_entity_ids(user_id),
        }
    }
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Interprets a storage document, returning the data and whether it was
/// migrated from the legacy single-list layout.
fn parse_document(value: Value, path: &Path) -> Result<(StoreData, bool)> {
    let Value::Object(map) = value else {
        log::warn!("Unexpected favorites document at {}, starting empty", path.display());
        return Ok((StoreData::default(), false));
    };

    if map.contains_key("users") {
        let data: StoreData =
            serde_json::from_value(Value::Object(map)).map_err(|e| StorageError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        return Ok((data, false));
    }

    if let Some(Value::Array(items)) = map.get("items") {
        let mut items: Vec<FavoriteItem> = items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect();
        renumber(&mut items);
        let mut data = StoreData::default();
        data.users.insert(MIGRATED_USER.to_string(), items);
        return Ok((data, true));
    }

    Ok((StoreData::default(), false))
}

fn renumber(items: &mut [FavoriteItem]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.order = index;
    }
}
