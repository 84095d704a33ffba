//! Durable key-value storage for the AdminHub client
//!
//! This module provides a small file-backed key-value store used to persist
//! client state (the session token and the user snapshot) across restarts.
//! Each key maps to one file under a state directory; a `set` is flushed to
//! disk before it returns, so every subsequent `get` observes the write.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::{StorageError, StorageResult};

/// Configuration for the storage directory
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding one file per stored key
    pub dir: PathBuf,
}

impl StorageConfig {
    /// Create a new StorageConfig from environment variables
    ///
    /// # Environment Variables
    /// - `ADMINHUB_STATE_DIR`: state directory (default: "$HOME/.adminhub",
    ///   falling back to ".adminhub" when HOME is unset)
    pub fn from_env() -> StorageResult<Self> {
        let dir = match std::env::var("ADMINHUB_STATE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => match std::env::var("HOME") {
                Ok(home) => PathBuf::from(home).join(".adminhub"),
                Err(_) => PathBuf::from(".adminhub"),
            },
        };

        Ok(StorageConfig { dir })
    }
}

/// File-backed key-value store
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    dir: PathBuf,
}

impl KeyValueStore {
    /// Open the store, creating the state directory if needed
    pub fn open(config: &StorageConfig) -> StorageResult<Self> {
        fs::create_dir_all(&config.dir).map_err(StorageError::Io)?;
        info!("Key-value store opened at {}", config.dir.display());

        Ok(KeyValueStore {
            dir: config.dir.clone(),
        })
    }

    /// Resolve the backing file for a key
    fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        // Keys are plain identifiers; anything path-like is rejected.
        if key.is_empty() || key.contains(['/', '\\', '.']) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(key))
    }

    /// Set a key-value pair, durable before return
    pub fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        let tmp = path.with_extension("tmp");

        // Write to a sidecar file first so a crash never leaves a torn value.
        fs::write(&tmp, value).map_err(StorageError::Io)?;
        fs::rename(&tmp, &path).map_err(StorageError::Io)?;

        Ok(())
    }

    /// Get a value by key, `None` when the key has never been set
    pub fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_path(key)?;

        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// Delete a key; deleting an absent key is not an error
    pub fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> KeyValueStore {
        let dir = std::env::temp_dir().join(format!(
            "adminhub-store-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let config = StorageConfig { dir };
        KeyValueStore::open(&config).expect("failed to open store")
    }

    #[test]
    fn test_set_get_delete() -> StorageResult<()> {
        let store = temp_store();

        store.set("token", "test_value")?;
        assert_eq!(store.get("token")?, Some("test_value".to_string()));

        store.delete("token")?;
        assert_eq!(store.get("token")?, None);

        Ok(())
    }

    #[test]
    fn test_overwrite_is_read_your_writes() -> StorageResult<()> {
        let store = temp_store();

        store.set("counter", "1")?;
        store.set("counter", "2")?;
        assert_eq!(store.get("counter")?, Some("2".to_string()));

        store.delete("counter")?;
        Ok(())
    }

    #[test]
    fn test_path_like_keys_rejected() {
        let store = temp_store();

        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("a/b").is_err());
        assert!(store.delete("").is_err());
    }
}
