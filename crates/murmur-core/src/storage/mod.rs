//! Key-value storage abstraction.
//!
//! Persisted state is a handful of named entries, each holding one
//! JSON-serialized value. The trait is synchronous: writes are small and
//! happen after every mutation, from the runtime rather than the state
//! machine.

mod chaotic;
mod error;
mod file;
mod memory;

pub use chaotic::ChaoticStore;
pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;
use serde::{Serialize, de::DeserializeOwned};

/// Synchronous string key-value store.
///
/// Must be Clone (shared between the runtime and tests) and Send + Sync.
/// Implementations share internal state, so clones see the same entries.
pub trait KeyValueStore: Clone + Send + Sync + 'static {
    /// Raw value stored under `key`. `None` if the key has never been set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` if the key cannot be represented
    /// and `StorageError::Io` if the write fails. A failed write leaves the
    /// previous value intact.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// All keys currently set, in ascending order.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Load and decode the value under `key`, falling back to `default`.
///
/// Missing keys fall back silently. Unreadable or malformed values fall back
/// with a warning: corrupt persisted state must never prevent startup.
pub fn load_or<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(e) => {
            tracing::warn!("failed to read {key}, using default: {e}");
            return default;
        },
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("malformed value for {key}, using default: {e}");
            default
        },
    }
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails, otherwise
/// whatever the store's `set` returns.
pub fn save<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore,
{
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Serialization {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn load_missing_key_uses_default() {
        let store = MemoryStore::new();
        let value: Vec<u64> = load_or(&store, "favorites", vec![9]);
        assert_eq!(value, vec![9]);
    }

    #[test]
    fn load_malformed_value_uses_default() {
        let store = MemoryStore::new();
        store.set("favorites", "{not json").unwrap();

        let value: Vec<u64> = load_or(&store, "favorites", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn load_wrong_shape_uses_default() {
        let store = MemoryStore::new();
        store.set("dark-mode", "\"yes\"").unwrap();

        assert!(!load_or(&store, "dark-mode", false));
    }

    #[test]
    fn save_then_load() {
        let store = MemoryStore::new();
        let mut unread = BTreeMap::new();
        unread.insert(3u64, 2u32);

        save(&store, "unread-counts", &unread).unwrap();

        assert_eq!(store.get("unread-counts").unwrap().as_deref(), Some(r#"{"3":2}"#));
        let loaded: BTreeMap<u64, u32> = load_or(&store, "unread-counts", BTreeMap::new());
        assert_eq!(loaded, unread);
    }

    #[test]
    fn read_failure_uses_default() {
        let store = ChaoticStore::with_seed(MemoryStore::new(), 1.0, 7);
        assert!(load_or(&store, "dark-mode", true));
    }
}
