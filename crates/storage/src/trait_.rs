//! Key-value storage abstraction.

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Key cannot be stored by this backend
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Durable string key-value substrate (browser local storage, a directory
/// of files, a map in tests).
///
/// Writes are synchronous. Callers treat failures as best-effort: a failed
/// write never blocks the in-memory state it mirrors.
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write (create or replace) a value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Absent keys are not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
