//! `favd store`: direct operations on the favorites store file.

use clap::Subcommand;
use favorites_store::{ChangeEvent, FavoritesStore};
use std::path::Path;
use std::process::ExitCode;

/// Actions for the `store` subcommand.
#[derive(Debug, Subcommand)]
pub(crate) enum StoreAction {
    /// List a user's favorites in order
    List {
        /// User id
        user: String,
    },
    /// Add an entity to a user's favorites
    Add {
        /// User id
        user: String,
        /// Entity id (`domain.object_id`)
        entity: String,
        /// Display name override
        #[arg(long)]
        name: Option<String>,
        /// Icon override
        #[arg(long)]
        icon: Option<String>,
    },
    /// Remove an entity from a user's favorites
    Remove {
        /// User id
        user: String,
        /// Entity id
        entity: String,
    },
    /// Add the entity if absent, remove it otherwise
    Toggle {
        /// User id
        user: String,
        /// Entity id
        entity: String,
    },
    /// Reorder a user's favorites
    Reorder {
        /// User id
        user: String,
        /// Entity ids in the new order; unlisted favorites keep their order after these
        #[arg(required = true)]
        entity_ids: Vec<String>,
    },
    /// Remove all of a user's favorites
    Clear {
        /// User id
        user: String,
    },
    /// Set or clear a favorite's display name
    Update {
        /// User id
        user: String,
        /// Entity id
        entity: String,
        /// New display name; omit to clear the override
        #[arg(long)]
        name: Option<String>,
    },
    /// Show totals across all users
    Summary,
}

/// Opens the store at `path` (or the default location) and runs `action`.
pub(crate) fn run_store_command(path: Option<&Path>, action: StoreAction) -> ExitCode {
    let result = match path {
        Some(path) => FavoritesStore::load(path),
        None => FavoritesStore::load(favorites_store::default_store_path()),
    }
    .and_then(|mut store| execute(&mut store, action));

    match result {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Store error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Applies `action` and returns the lines to print.
pub(crate) fn execute(
    store: &mut FavoritesStore,
    action: StoreAction,
) -> favorites_store::Result<Vec<String>> {
    let event = match action {
        StoreAction::List { user } => {
            return Ok(store
                .user_items(&user)
                .iter()
                .map(|item| match &item.custom_name {
                    Some(name) => format!("{}\t{}", item.entity_id, name),
                    None => item.entity_id.clone(),
                })
                .collect());
        }
        StoreAction::Summary => {
            let summary = store.summary();
            return Ok(vec![
                format!("count: {}", summary.count),
                format!("has_favorites: {}", summary.has_favorites),
            ]);
        }
        StoreAction::Add {
            user,
            entity,
            name,
            icon,
        } => store.add(&user, &entity, name, icon)?,
        StoreAction::Remove { user, entity } => store.remove(&user, &entity)?,
        StoreAction::Toggle { user, entity } => Some(store.toggle(&user, &entity)?),
        StoreAction::Reorder { user, entity_ids } => store.reorder(&user, &entity_ids)?,
        StoreAction::Clear { user } => Some(store.clear(&user)?),
        StoreAction::Update { user, entity, name } => store.update(&user, &entity, name)?,
    };
    Ok(vec![describe(event.as_ref())])
}

fn describe(event: Option<&ChangeEvent>) -> String {
    match event.map(serde_json::to_string) {
        Some(Ok(json)) => json,
        Some(Err(e)) => format!("changed ({e})"),
        None => "no change".to_string(),
    }
}
