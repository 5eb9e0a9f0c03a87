//! File and in-memory key-value backends.
//!
//! `FileStore` keeps one file per key inside a directory (the device-local
//! equivalent of browser local storage). `MemoryStore` is a plain map.

use std::collections::HashMap;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{KeyValueStore, Result, StorageError};

/// File-based key-value backend.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory holding the values.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // Bytes outside `[A-Za-z0-9._-]` are percent-encoded, so distinct keys
    // always map to distinct files.
    fn value_path(&self, key: &str) -> Result<PathBuf> {
        if key.trim().is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let mut file_name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.') {
                file_name.push(char::from(byte));
            } else {
                let _ = write!(file_name, "%{:02X}", byte);
            }
        }
        Ok(self.root.join(format!("{}.json", file_name)))
    }

    /// Delete every stored value.
    pub fn clear(&mut self) -> Result<()> {
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.value_path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                debug!(key, error = %e, "Failed to read value");
                Err(e.into())
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::write(self.value_path(key)?, value.as_bytes())?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        fs::remove_file(self.value_path(key)?).or_else(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Ok(())
            } else {
                Err(e)
            }
        })?;
        Ok(())
    }
}

/// In-memory key-value backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();

        assert_eq!(store.get("sarms-worker-session-w1").unwrap(), None);
        store.set("sarms-worker-session-w1", "{\"a\":1}").unwrap();
        assert_eq!(
            store.get("sarms-worker-session-w1").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        store.remove("sarms-worker-session-w1").unwrap();
        assert_eq!(store.get("sarms-worker-session-w1").unwrap(), None);
        // removing again is fine
        store.remove("sarms-worker-session-w1").unwrap();
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();

        store.set("../escape/attempt", "x").unwrap();
        assert!(dir.path().join("..%2Fescape%2Fattempt.json").exists());
        assert!(matches!(store.set("  ", "x"), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_file_store_keys_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();

        store.set("sarms-worker-session-علي", "ali").unwrap();
        assert_eq!(store.get("sarms-worker-session-سعد").unwrap(), None);
        store.set("sarms-worker-session-سعد", "saad").unwrap();
        assert_eq!(store.get("sarms-worker-session-علي").unwrap().as_deref(), Some("ali"));

        store.set("w/1", "slash").unwrap();
        store.set("w_1", "underscore").unwrap();
        store.set("w%2F1", "percent").unwrap();
        assert_eq!(store.get("w/1").unwrap().as_deref(), Some("slash"));
        assert_eq!(store.get("w_1").unwrap().as_deref(), Some("underscore"));
        assert_eq!(store.get("w%2F1").unwrap().as_deref(), Some("percent"));
    }

    #[test]
    fn test_file_store_unreadable_value_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        fs::create_dir(dir.path().join("k.json")).unwrap();

        assert!(matches!(store.get("k"), Err(StorageError::Io(_))));
    }

    #[test]
    fn test_file_store_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }
}
