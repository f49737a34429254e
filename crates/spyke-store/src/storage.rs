//! # Persistence Adapters
//!
//! Key/value storage the cart is persisted to, modelled on browser local
//! storage: string keys, string (JSON) values, whole-value writes.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    KeyValueStorage                                      │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────────┐  │
//! │  │   MemoryStorage      │        │   FileStorage                    │  │
//! │  │                      │        │                                  │  │
//! │  │  HashMap in process  │        │  <dir>/<key>.json                │  │
//! │  │  tests, ephemeral    │        │  temp file + persist on write    │  │
//! │  └──────────────────────┘        └──────────────────────────────────┘  │
//! │                                                                         │
//! │  Single writer per key. No cross-process coordination.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// String key/value persistence.
pub trait KeyValueStorage {
    /// Reads the value for `key`; `None` when it was never written.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces the value for `key`.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

// =============================================================================
// Memory Storage
// =============================================================================

/// In-process storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// File Storage
// =============================================================================

/// One JSON file per key inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Uses `dir` for storage; it is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// Keys are restricted to `[A-Za-z0-9_.-]` so they cannot escape the
    /// directory.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

        if !valid {
            return Err(StoreError::storage(
                key,
                io::Error::new(io::ErrorKind::InvalidInput, "invalid storage key"),
            ));
        }

        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(?path, bytes = contents.len(), "Read storage key");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::storage(key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.dir).map_err(|e| StoreError::storage(key, e))?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| StoreError::storage(key, e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| StoreError::storage(key, e))?;
        tmp.persist(&path)
            .map_err(|e| StoreError::storage(key, e.error))?;

        debug!(?path, bytes = value.len(), "Wrote storage key");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::storage(key, e)),
        }
    }
}
