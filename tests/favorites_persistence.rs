//! Favorites survive a restart when written through the on-disk store.

use periodic::favorites::{FavoritesSet, FavoritesStore, FAVORITES_KEY};
use periodic::storage::{FileStore, KeyValueStore};
use proptest::prelude::*;
use std::sync::Arc;

fn open(dir: &std::path::Path) -> FavoritesStore {
    FavoritesStore::open(Arc::new(FileStore::new(dir)))
}

#[test]
fn toggle_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    open(dir.path()).toggle(26);

    let reloaded = open(dir.path());
    assert!(reloaded.current().contains(26));
}

#[test]
fn clear_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());
    for n in [1, 8, 26, 79] {
        store.toggle(n);
    }
    assert!(store.clear().is_empty());
    assert!(open(dir.path()).current().is_empty());
}

#[test]
fn corrupt_file_starts_empty_and_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStore::new(dir.path());
    storage.set(FAVORITES_KEY, "{oops").unwrap();

    let store = open(dir.path());
    assert!(store.current().is_empty());
    store.toggle(6);
    assert_eq!(storage.get(FAVORITES_KEY).unwrap().as_deref(), Some("[6]"));
}

#[test]
fn unwritable_directory_degrades_to_session_only() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the storage directory should be.
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, "not a directory").unwrap();

    let store = open(&blocked);
    assert!(store.toggle(92).contains(92));
    assert!(store.current().contains(92));
    assert!(open(&blocked).current().is_empty());
}

proptest! {
    #[test]
    fn double_toggle_restores_membership(
        initial in prop::collection::btree_set(1u32..=118, 0..20),
        n in 1u32..=118,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStore::new(dir.path());
        let before: FavoritesSet = initial.into_iter().collect();
        storage.set(FAVORITES_KEY, &before.encode()).unwrap();

        let store = open(dir.path());
        prop_assert_eq!(store.current(), before.clone());
        let once = store.toggle(n);
        prop_assert_eq!(once.contains(n), !before.contains(n));
        let twice = store.toggle(n);
        prop_assert_eq!(&twice, &before);
        prop_assert_eq!(open(dir.path()).current(), before);
    }

    #[test]
    fn clear_always_empties(initial in prop::collection::btree_set(1u32..=118, 0..30)) {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());
        for n in initial {
            store.toggle(n);
        }
        prop_assert!(store.clear().is_empty());
        prop_assert!(open(dir.path()).current().is_empty());
    }
}
