//! File-backed store: one `<key>.json` file per key.
//!
//! Writes go to a temporary sibling file that is renamed over the target, so
//! a crash mid-write leaves the previous value readable.

use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use super::{KeyValueStore, StorageError};

const EXTENSION: &str = "json";
const TEMP_PREFIX: &str = ".tmp-";

/// Durable storage in a directory on disk.
///
/// Clone is cheap (Arc). Concurrent writers to the same key are last-writer
/// wins; Murmur only writes from the runtime thread.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: Arc<PathBuf>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        tracing::debug!("opened file store at {}", dir.display());
        Ok(Self { dir: Arc::new(dir) })
    }

    /// Directory holding the value files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let temp = self.dir.join(format!("{TEMP_PREFIX}{key}.{EXTENSION}"));

        let mut file = fs::File::create(&temp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(self.dir.as_path())? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }
            keys.push(stem.to_string());
        }
        keys.sort_unstable();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempdir().unwrap();

        let store = FileStore::open(dir.path()).unwrap();
        store.set("favorites", "[1,4]").unwrap();
        drop(store);

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("favorites").unwrap().as_deref(), Some("[1,4]"));
    }

    #[test]
    fn missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("dark-mode").unwrap(), None);
    }

    #[test]
    fn overwrite_replaces_value() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("dark-mode", "false").unwrap();
        store.set("dark-mode", "true").unwrap();

        assert_eq!(store.get("dark-mode").unwrap().as_deref(), Some("true"));
        assert_eq!(store.keys().unwrap(), vec!["dark-mode"]);
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(
                matches!(store.set(key, "1"), Err(StorageError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn remove_deletes_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("unread-counts", "{}").unwrap();
        store.remove("unread-counts").unwrap();
        store.remove("unread-counts").unwrap();

        assert!(store.keys().unwrap().is_empty());
        assert!(!dir.path().join("unread-counts.json").exists());
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("murmur").join("data");

        let store = FileStore::open(&nested).unwrap();

        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }
}
