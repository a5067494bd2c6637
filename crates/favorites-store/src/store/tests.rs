use super::*;
use crate::error::{Error, ValidationError};
use tempfile::TempDir;

fn ids(store: &FavoritesStore, user: &str) -> Vec<String> {
    store.user_entity_ids(user)
}

fn seeded(user: &str, entities: &[&str]) -> FavoritesStore {
    let mut store = FavoritesStore::in_memory();
    for entity in entities {
        store.add(user, entity, None, None).expect("add should succeed");
    }
    store
}

#[test]
fn test_add_appends_with_order_and_timestamp() {
    let mut store = FavoritesStore::in_memory();
    let event = store
        .add("u1", "light.kitchen", None, None)
        .expect("add")
        .expect("first add should change the store");

    assert_eq!(event.action, ChangeAction::Add);
    assert_eq!(event.user_id, "u1");
    assert_eq!(event.entity_id.as_deref(), Some("light.kitchen"));
    assert_eq!(event.favorites, vec!["light.kitchen"]);

    store.add("u1", "cover.blind", None, None).expect("add");
    let item = store.get_item("u1", "cover.blind").expect("item should exist");
    assert_eq!(item.order, 1);
    assert!(!item.added_at.is_empty(), "added_at should be stamped");
}

#[test]
fn test_add_duplicate_is_noop() {
    let mut store = seeded("u1", &["light.kitchen"]);
    let event = store.add("u1", "light.kitchen", None, None).expect("add");
    assert!(event.is_none(), "duplicate add should not emit an event");
    assert_eq!(ids(&store, "u1"), vec!["light.kitchen"]);
}

#[test]
fn test_add_keeps_overrides() {
    let mut store = FavoritesStore::in_memory();
    store
        .add(
            "u1",
            "light.kitchen",
            Some("Counter".to_string()),
            Some("mdi:lamp".to_string()),
        )
        .expect("add");
    let item = store.get_item("u1", "light.kitchen").expect("item");
    assert_eq!(item.custom_name.as_deref(), Some("Counter"));
    assert_eq!(item.custom_icon.as_deref(), Some("mdi:lamp"));
}

#[test]
fn test_remove_renumbers() {
    let mut store = seeded("u1", &["light.a", "light.b", "light.c"]);
    let event = store
        .remove("u1", "light.a")
        .expect("remove")
        .expect("should change");
    assert_eq!(event.action, ChangeAction::Remove);
    assert_eq!(event.favorites, vec!["light.b", "light.c"]);

    let orders: Vec<usize> = store.user_items("u1").iter().map(|i| i.order).collect();
    assert_eq!(orders, vec![0, 1]);
}

#[test]
fn test_remove_unknown_user_or_entity_is_noop() {
    let mut store = seeded("u1", &["light.a"]);
    assert!(store.remove("u2", "light.a").expect("remove").is_none());
    assert!(store.remove("u1", "light.zzz").expect("remove").is_none());
    assert_eq!(ids(&store, "u1"), vec!["light.a"]);
}

#[test]
fn test_toggle_flips_membership() {
    let mut store = FavoritesStore::in_memory();
    let first = store.toggle("u1", "switch.fan").expect("toggle");
    assert_eq!(first.action, ChangeAction::Add);
    assert!(store.is_favorite("u1", "switch.fan"));

    let second = store.toggle("u1", "switch.fan").expect("toggle");
    assert_eq!(second.action, ChangeAction::Remove);
    assert!(!store.is_favorite("u1", "switch.fan"));
    assert!(second.favorites.is_empty());
}

#[test]
fn test_reorder_listed_first_then_rest() {
    let mut store = seeded("u1", &["light.a", "light.b", "light.c", "light.d"]);
    let order = vec![
        "light.c".to_string(),
        "light.unknown".to_string(),
        "light.a".to_string(),
    ];
    let event = store
        .reorder("u1", &order)
        .expect("reorder")
        .expect("known user should emit");

    assert_eq!(event.action, ChangeAction::Reorder);
    assert!(event.entity_id.is_none());
    assert_eq!(
        ids(&store, "u1"),
        vec!["light.c", "light.a", "light.b", "light.d"]
    );
    let orders: Vec<usize> = store.user_items("u1").iter().map(|i| i.order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
}

#[test]
fn test_reorder_ignores_repeated_ids() {
    let mut store = seeded("u1", &["light.a", "light.b"]);
    let order = vec![
        "light.b".to_string(),
        "light.b".to_string(),
        "light.a".to_string(),
    ];
    store.reorder("u1", &order).expect("reorder");
    assert_eq!(ids(&store, "u1"), vec!["light.b", "light.a"]);
}

#[test]
fn test_reorder_unknown_user_is_noop() {
    let mut store = FavoritesStore::in_memory();
    let event = store
        .reorder("ghost", &["light.a".to_string()])
        .expect("reorder");
    assert!(event.is_none());
    assert!(store.users().is_empty());
}

#[test]
fn test_clear_empties_only_that_user() {
    let mut store = seeded("u1", &["light.a", "light.b"]);
    store.add("u2", "light.a", None, None).expect("add");

    let event = store.clear("u1").expect("clear");
    assert_eq!(event.action, ChangeAction::Clear);
    assert!(event.favorites.is_empty());
    assert!(store.user_items("u1").is_empty());
    assert_eq!(ids(&store, "u2"), vec!["light.a"]);
}

#[test]
fn test_update_sets_and_clears_custom_name() {
    let mut store = seeded("u1", &["light.a"]);
    store
        .update("u1", "light.a", Some("Desk".to_string()))
        .expect("update")
        .expect("should change");
    assert_eq!(
        store.get_item("u1", "light.a").and_then(|i| i.custom_name.clone()),
        Some("Desk".to_string())
    );

    let event = store
        .update("u1", "light.a", None)
        .expect("update")
        .expect("should change");
    assert_eq!(event.action, ChangeAction::Update);
    assert!(store
        .get_item("u1", "light.a")
        .expect("item")
        .custom_name
        .is_none());
}

#[test]
fn test_update_missing_item_is_noop() {
    let mut store = seeded("u1", &["light.a"]);
    assert!(store
        .update("u1", "light.b", Some("x".to_string()))
        .expect("update")
        .is_none());
    assert!(store
        .update("u2", "light.a", Some("x".to_string()))
        .expect("update")
        .is_none());
}

#[test]
fn test_invalid_ids_are_rejected() {
    let mut store = FavoritesStore::in_memory();
    let err = store
        .add("u1", "Not An Entity", None, None)
        .expect_err("malformed entity id should fail");
    assert!(matches!(
        err,
        Error::Validation(ValidationError::InvalidEntityId(_))
    ));

    let err = store.clear("").expect_err("empty user should fail");
    assert!(matches!(err, Error::Validation(ValidationError::MissingUser)));
    assert!(store.users().is_empty(), "failed requests must not mutate");
}

#[test]
fn test_summary_and_attributes() {
    let mut store = seeded("u1", &["light.a", "light.b"]);
    store.add("u2", "cover.c", None, None).expect("add");

    let summary = store.summary();
    assert_eq!(summary.count, 3);
    assert!(summary.has_favorites);

    let attrs = store.attributes();
    assert_eq!(attrs["count"], 3);
    assert_eq!(attrs["users"]["u1"][1]["entity_id"], "light.b");
    assert_eq!(attrs["users"]["u2"][0]["entity_id"], "cover.c");
}

#[test]
fn test_summary_empty_store() {
    let mut store = seeded("u1", &["light.a"]);
    store.clear("u1").expect("clear");
    assert_eq!(
        store.summary(),
        Summary {
            count: 0,
            has_favorites: false
        }
    );
}

#[test]
fn test_load_missing_file_is_empty() {
    let dir = TempDir::new().expect("tempdir");
    let store = FavoritesStore::load(dir.path().join("favorites.json")).expect("load");
    assert!(store.users().is_empty());
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("nested").join("favorites.json");

    let mut store = FavoritesStore::load(&path).expect("load");
    store.add("u1", "light.a", None, None).expect("add");
    store.add("u1", "climate.lr", None, None).expect("add");
    assert!(path.exists(), "mutation should persist");

    let reloaded = FavoritesStore::load(&path).expect("reload");
    assert_eq!(ids(&reloaded, "u1"), vec!["light.a", "climate.lr"]);
}

#[test]
fn test_save_leaves_no_temp_files() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("favorites.json");
    let mut store = FavoritesStore::load(&path).expect("load");
    store.add("u1", "light.a", None, None).expect("add");

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .expect("read_dir")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
        .collect();
    assert!(leftovers.is_empty(), "temp file should be renamed away");
}

#[test]
fn test_load_migrates_legacy_items() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("favorites.json");
    fs::write(
        &path,
        r#"{"items": [{"entity_id": "light.a", "order": 5}, {"entity_id": "cover.b"}]}"#,
    )
    .expect("write");

    let store = FavoritesStore::load(&path).expect("load");
    assert_eq!(ids(&store, MIGRATED_USER), vec!["light.a", "cover.b"]);
    assert_eq!(store.user_items(MIGRATED_USER)[0].order, 0);

    let on_disk: Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
    assert!(on_disk.get("users").is_some(), "migration should be saved");
    assert!(on_disk.get("items").is_none());
}

#[test]
fn test_load_unknown_shape_is_empty() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("favorites.json");
    fs::write(&path, r#"{"something": 1}"#).expect("write");
    let store = FavoritesStore::load(&path).expect("load");
    assert!(store.users().is_empty());
}

#[test]
fn test_load_invalid_json_is_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("favorites.json");
    fs::write(&path, "{not json").expect("write");
    let err = FavoritesStore::load(&path).expect_err("should fail");
    assert!(matches!(err, Error::Storage(StorageError::Parse { .. })));
}

#[test]
fn test_in_memory_save_is_noop() {
    let store = FavoritesStore::in_memory();
    assert!(store.path().is_none());
    store.save().expect("in-memory save should succeed");
}

#[test]
fn test_default_store_path_file_name() {
    let path = default_store_path();
    assert!(path.ends_with("favorites-dashboard/favorites.json"));
}

#[test]
fn test_failed_save_keeps_previous_state() {
    let dir = TempDir::new().expect("tempdir");
    let sub = dir.path().join("sub");
    let mut store = FavoritesStore::load(sub.join("favorites.json")).expect("load");
    store.add("u1", "light.a", None, None).expect("add");
    store.add("u1", "cover.b", None, None).expect("add");

    // the parent directory can no longer be written
    fs::remove_dir_all(&sub).expect("remove dir");
    fs::write(&sub, "not a directory").expect("write file");
    let before = store.attributes();

    assert!(store.add("u1", "light.kitchen", None, None).is_err());
    assert!(!store.is_favorite("u1", "light.kitchen"));
    assert!(store.add("u2", "light.kitchen", None, None).is_err());
    assert!(!store.users().contains_key("u2"));
    assert!(store.remove("u1", "light.a").is_err());
    assert!(store.toggle("u1", "cover.b").is_err());
    assert!(store
        .reorder("u1", &["cover.b".to_string(), "light.a".to_string()])
        .is_err());
    assert!(store.clear("u1").is_err());
    assert!(store.update("u1", "light.a", Some("Lamp".into())).is_err());

    assert_eq!(store.attributes(), before);
    assert_eq!(ids(&store, "u1"), vec!["light.a", "cover.b"]);
    assert!(store.get_item("u1", "light.a").expect("kept").custom_name.is_none());
}
