//! Session credential storage.
//!
//! DESIGN
//! ======
//! The client keeps exactly one credential. Views never touch the backing
//! storage; they go through `TokenStore`, which has a durable file backend
//! for the binary and an in-memory backend for tests and throwaway sessions.
//!
//! The file backend stores a flat JSON object keyed like browser storage
//! (`{"authToken": "..."}`), so other keys written alongside it survive a
//! save or remove.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Key under which the credential is persisted.
pub const TOKEN_KEY: &str = "authToken";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("token store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("token store encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single flat credential slot.
///
/// `save` with an empty token is a no-op: it never clears what is stored.
pub trait TokenStore: Send + Sync {
    fn save(&self, token: &str) -> Result<(), StoreError>;
    fn get(&self) -> Option<String>;
    fn remove(&self) -> Result<(), StoreError>;

    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

fn is_blank(token: &str) -> bool {
    token.trim().is_empty()
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store. A blank token leaves it empty, as `save` would.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let slot = if is_blank(token) { None } else { Some(token.to_owned()) };
        Self { slot: Mutex::new(slot) }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        if is_blank(token) {
            return Ok(());
        }
        *self.slot() = Some(token.to_owned());
        Ok(())
    }

    fn get(&self) -> Option<String> {
        self.slot().clone()
    }

    fn remove(&self) -> Result<(), StoreError> {
        *self.slot() = None;
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// Durable store backed by a JSON file that survives restarts.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path, lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Read the stored entries. A missing file is an empty map.
    fn read_entries(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    /// Entries to rewrite. A corrupt file is replaced rather than blocking writes.
    fn entries_for_write(&self) -> Result<Map<String, Value>, StoreError> {
        match self.read_entries() {
            Ok(map) => Ok(map),
            Err(StoreError::Json(e)) => {
                warn!(path = %self.path.display(), error = %e, "token file is corrupt; rewriting");
                Ok(Map::new())
            }
            Err(e) => Err(e),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let rendered = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, rendered)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        if is_blank(token) {
            debug!("ignoring empty credential");
            return Ok(());
        }
        let _guard = self.guard();
        let mut entries = self.entries_for_write()?;
        entries.insert(TOKEN_KEY.to_owned(), Value::String(token.to_owned()));
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), "credential saved");
        Ok(())
    }

    fn get(&self) -> Option<String> {
        let _guard = self.guard();
        match self.read_entries() {
            Ok(entries) => entries
                .get(TOKEN_KEY)
                .and_then(Value::as_str)
                .filter(|token| !is_blank(token))
                .map(ToOwned::to_owned),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "token file unreadable; treating as signed out");
                None
            }
        }
    }

    fn remove(&self) -> Result<(), StoreError> {
        let _guard = self.guard();
        let mut entries = self.entries_for_write()?;
        if entries.remove(TOKEN_KEY).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), "credential removed");
        Ok(())
    }
}
