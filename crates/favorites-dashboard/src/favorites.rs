//! Ordered favorites working copy.
//!
//! [`FavoriteList`] keeps the ordered records and a set of their ids in
//! lockstep. Every mutation goes through this type so the two never diverge.

use crate::snapshot::Fingerprint;
use crate::FavoriteRecord;
use chrono::Utc;
use std::collections::HashSet;

/// Ordered favorites plus an O(1) membership mirror.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoriteList {
    items: Vec<FavoriteRecord>,
    ids: HashSet<String>,
}

impl FavoriteList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// List built from `records`; later duplicates of an id are dropped.
    pub fn from_records(records: Vec<FavoriteRecord>) -> Self {
        let mut list = Self::new();
        list.replace(records);
        list
    }

    /// Replaces the whole list.
    pub fn replace(&mut self, records: Vec<FavoriteRecord>) {
        self.items.clear();
        self.ids.clear();
        for record in records {
            if self.ids.insert(record.entity_id.clone()) {
                self.items.push(record);
            }
        }
    }

    /// Records in display order.
    pub fn records(&self) -> &[FavoriteRecord] {
        &self.items
    }

    /// Ids in display order.
    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|r| r.entity_id.clone()).collect()
    }

    /// Fingerprint of the current order.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.items)
    }

    /// Number of favorites.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Membership test.
    pub fn contains(&self, entity_id: &str) -> bool {
        self.ids.contains(entity_id)
    }

    /// Record for `entity_id`.
    pub fn get(&self, entity_id: &str) -> Option<&FavoriteRecord> {
        self.items.iter().find(|r| r.entity_id == entity_id)
    }

    /// Index of `entity_id`.
    pub fn position(&self, entity_id: &str) -> Option<usize> {
        self.items.iter().position(|r| r.entity_id == entity_id)
    }

    /// Appends `record` unless its id is already present.
    pub fn add(&mut self, record: FavoriteRecord) -> bool {
        if !self.ids.insert(record.entity_id.clone()) {
            return false;
        }
        self.items.push(record);
        true
    }

    /// Removes `entity_id`, returning its former index and record.
    pub fn remove(&mut self, entity_id: &str) -> Option<(usize, FavoriteRecord)> {
        if !self.ids.remove(entity_id) {
            return None;
        }
        let index = self.position(entity_id)?;
        Some((index, self.items.remove(index)))
    }

    /// Puts a removed record back at `index` (clamped to the end).
    ///
    /// No-op if the id came back in the meantime.
    pub fn restore(&mut self, index: usize, record: FavoriteRecord) -> bool {
        if !self.ids.insert(record.entity_id.clone()) {
            return false;
        }
        let index = index.min(self.items.len());
        self.items.insert(index, record);
        true
    }

    /// Applies a membership change.
    ///
    /// Adding appends a fresh record stamped now. Returns whether the list
    /// changed; repeating the same change is a no-op.
    pub fn apply_change(&mut self, entity_id: &str, is_favorite: bool) -> bool {
        if is_favorite {
            self.add(FavoriteRecord {
                added_at: Some(Utc::now().to_rfc3339()),
                ..FavoriteRecord::new(entity_id)
            })
        } else {
            self.remove(entity_id).is_some()
        }
    }

    /// Moves `dragged` to the index `target` occupied before the move.
    ///
    /// Insertion, not swap. Returns `false` and leaves the order untouched if
    /// either id is absent or both are the same.
    pub fn move_onto(&mut self, dragged: &str, target: &str) -> bool {
        if dragged == target {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(dragged), self.position(target)) else {
            return false;
        };
        let record = self.items.remove(from);
        self.items.insert(to, record);
        true
    }

    /// Sets or clears the display name override of one favorite.
    pub fn set_custom_name(&mut self, entity_id: &str, custom_name: Option<String>) -> bool {
        match self.items.iter_mut().find(|r| r.entity_id == entity_id) {
            Some(record) => {
                record.custom_name = custom_name;
                true
            }
            None => false,
        }
    }
}
