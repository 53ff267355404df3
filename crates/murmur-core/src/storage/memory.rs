//! In-memory store for tests and simulation.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::{KeyValueStore, StorageError};

/// In-memory storage implementation for testing and simulation
///
/// Entries live in a `BTreeMap` behind `Arc<Mutex<_>>`, so clones share
/// state and `keys()` comes back ordered. A poisoned lock is recovered
/// rather than propagated: every operation leaves the map consistent.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    /// Create a new empty `MemoryStore`
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently set.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no key is set.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::new();
        let clone = store.clone();

        store.set("dark-mode", "true").unwrap();

        assert_eq!(clone.get("dark-mode").unwrap().as_deref(), Some("true"));
        assert_eq!(clone.len(), 1);
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let store = MemoryStore::new();
        store.remove("nothing").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn keys_are_sorted() {
        let store = MemoryStore::new();
        store.set("user-settings", "{}").unwrap();
        store.set("chat-messages", "{}").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["chat-messages", "user-settings"]);
    }
}
