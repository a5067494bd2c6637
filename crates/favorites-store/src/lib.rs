//! Per-user favorites storage
//!
//! The authoritative store behind the favorites dashboard widgets. Each user
//! owns an ordered list of favorited entities; the store persists them as JSON
//! with atomic writes and reports every effective mutation as a
//! [`ChangeEvent`] so the dashboard can publish it.
//!
//! # Examples
//!
//! ```ignore
//! use favorites_store::FavoritesStore;
//!
//! let mut store = FavoritesStore::load(favorites_store::default_store_path())?;
//! store.add("u1", "light.kitchen", None, None)?;
//! assert!(store.is_favorite("u1", "light.kitchen"));
//! ```

#![warn(missing_docs)]

mod error;
mod store;
mod types;

pub use error::{Error, Result, StorageError, ValidationError};
pub use store::{default_store_path, FavoritesStore, MIGRATED_USER};
pub use types::{
    validate_entity_id, validate_user_id, ChangeAction, ChangeEvent, FavoriteItem, StoreData,
    Summary,
};
