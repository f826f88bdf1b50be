//! The user's favorite elements, mirrored to local storage.
//!
//! The set is read once when the store opens. Every toggle or clear runs
//! under one lock: read the current set, write the new set through to
//! storage, then install it. A failed write is logged and the new set is
//! installed anyway, so favorites keep working for the session even when
//! they will not survive a restart.

use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{error, warn};

pub const FAVORITES_KEY: &str = "periodic-table-favorites";

/// Set of favorite atomic numbers. Serialized as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesSet(BTreeSet<u32>);

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, atomic_number: u32) -> bool {
        self.0.contains(&atomic_number)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    fn toggled(&self, atomic_number: u32) -> Self {
        let mut next = self.0.clone();
        if !next.remove(&atomic_number) {
            next.insert(atomic_number);
        }
        FavoritesSet(next)
    }

    /// Decodes the persisted form; `None` when the value is not an array of
    /// atomic numbers.
    pub fn decode(raw: &str) -> Option<Self> {
        let numbers: Vec<u32> = serde_json::from_str(raw).ok()?;
        Some(numbers.into_iter().collect())
    }

    pub fn encode(&self) -> String {
        let numbers: Vec<u32> = self.iter().collect();
        serde_json::to_string(&numbers).unwrap_or_else(|_| "[]".to_string())
    }
}

impl FromIterator<u32> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        FavoritesSet(iter.into_iter().collect())
    }
}

pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
    current: Mutex<FavoritesSet>,
}

impl FavoritesStore {
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let current = Self::load(storage.as_ref());
        FavoritesStore {
            storage,
            current: Mutex::new(current),
        }
    }

    /// Reads the persisted set. Missing, unreadable, or malformed state
    /// yields an empty set.
    pub fn load(storage: &dyn KeyValueStore) -> FavoritesSet {
        match storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => FavoritesSet::decode(&raw).unwrap_or_else(|| {
                warn!(key = FAVORITES_KEY, "discarding malformed favorites");
                FavoritesSet::new()
            }),
            Ok(None) => FavoritesSet::new(),
            Err(e) => {
                warn!(key = FAVORITES_KEY, error = %e, "could not read favorites");
                FavoritesSet::new()
            }
        }
    }

    pub fn current(&self) -> FavoritesSet {
        self.lock().clone()
    }

    pub fn contains(&self, atomic_number: u32) -> bool {
        self.lock().contains(atomic_number)
    }

    /// Adds `atomic_number` if absent, removes it if present.
    pub fn toggle(&self, atomic_number: u32) -> FavoritesSet {
        self.update(|set| set.toggled(atomic_number))
    }

    pub fn clear(&self) -> FavoritesSet {
        self.update(|_| FavoritesSet::new())
    }

    fn update(&self, change: impl FnOnce(&FavoritesSet) -> FavoritesSet) -> FavoritesSet {
        let mut current = self.lock();
        let next = change(&current);
        if let Err(e) = self.storage.set(FAVORITES_KEY, &next.encode()) {
            error!(key = FAVORITES_KEY, error = %e, "could not persist favorites");
        }
        *current = next.clone();
        next
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FavoritesSet> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(Some("[8]".to_string()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
    }

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn starts_empty_without_state() {
        let store = FavoritesStore::open(memory());
        assert!(store.current().is_empty());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let store = FavoritesStore::open(memory());
        let once = store.toggle(26);
        assert!(once.contains(26));
        let twice = store.toggle(26);
        assert!(twice.is_empty());
        assert_eq!(store.current(), FavoritesSet::new());
    }

    #[test]
    fn toggle_is_persisted_immediately() {
        let storage = memory();
        let store = FavoritesStore::open(storage.clone());
        store.toggle(26);
        store.toggle(1);
        assert_eq!(storage.get(FAVORITES_KEY).unwrap().as_deref(), Some("[1,26]"));

        let reloaded = FavoritesStore::open(storage);
        assert_eq!(reloaded.current(), [1, 26].into_iter().collect());
    }

    #[test]
    fn clear_empties_and_persists() {
        let storage = memory();
        let store = FavoritesStore::open(storage.clone());
        store.toggle(2);
        store.toggle(10);
        assert!(store.clear().is_empty());
        assert_eq!(storage.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
        assert!(FavoritesStore::open(storage).current().is_empty());
    }

    #[test]
    fn malformed_state_resets_to_empty() {
        for raw in ["not json", "{\"a\":1}", "[1, \"two\"]", "[-4]", ""] {
            let storage = memory();
            storage.set(FAVORITES_KEY, raw).unwrap();
            let store = FavoritesStore::open(storage);
            assert!(store.current().is_empty(), "{raw:?} should be discarded");
        }
    }

    #[test]
    fn duplicate_entries_collapse() {
        let storage = memory();
        storage.set(FAVORITES_KEY, "[3, 3, 1]").unwrap();
        let store = FavoritesStore::open(storage);
        assert_eq!(store.current().iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn failed_writes_keep_the_session_copy() {
        let store = FavoritesStore::open(Arc::new(ReadOnlyStore));
        assert!(store.contains(8));
        let after = store.toggle(79);
        assert!(after.contains(79));
        assert!(store.contains(79));
        assert!(store.clear().is_empty());
        assert!(!store.contains(8));
    }

    #[test]
    fn concurrent_toggles_do_not_lose_updates() {
        let store = Arc::new(FavoritesStore::open(memory()));
        let handles: Vec<_> = (1..=16u32)
            .map(|n| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store.toggle(n);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.current().len(), 16);
    }
}
