//! Persistent key-value storage for the cart.
//!
//! The store holds plain strings under string keys. The cart is kept as one
//! JSON array under a single key, read once at startup and overwritten
//! wholesale on every mutation.
//!
//! # Backends
//!
//! - [`FileStore`] - JSON object on disk; survives process restarts
//! - [`MemoryStore`] - in-process map for tests and throwaway sessions

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use rocketshoes_core::Cart;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur when reading or writing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("Storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Stored data could not be (de)serialized.
    #[error("Storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value storage that outlives the process.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

// =============================================================================
// Cart Serialization
// =============================================================================

/// Read the cart stored under `key`.
///
/// Returns `Ok(None)` when nothing has been stored yet.
///
/// # Errors
///
/// Returns `StoreError` if the store cannot be read or the stored value is
/// not a valid cart.
pub fn load_cart(store: &dyn KeyValueStore, key: &str) -> Result<Option<Cart>, StoreError> {
    store
        .get(key)?
        .map(|raw| serde_json::from_str::<Cart>(&raw))
        .transpose()
        .map_err(StoreError::from)
}

/// Overwrite the cart stored under `key`.
///
/// # Errors
///
/// Returns `StoreError` if serialization or the write fails.
pub fn save_cart(store: &dyn KeyValueStore, key: &str, cart: &Cart) -> Result<(), StoreError> {
    let raw = serde_json::to_string(cart)?;
    store.set(key, &raw)
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// Store backed by a single JSON object file.
///
/// Writes go to a temporary file in the same directory that is then renamed
/// over the target, so a crash mid-write leaves the previous contents intact.
/// A file that is not a JSON object fails reads and is replaced on the next
/// write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open a store at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let raw = serde_json::to_string_pretty(entries)?;
        // Dropped without persisting on error, which deletes it.
        let mut file = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        file.write_all(raw.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| self.io_error(e))?;
        file.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StoreError::Serialize(e)) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Storage file is not a JSON object, overwriting"
                );
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}
