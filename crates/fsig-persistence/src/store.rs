//! Persistence store implementations.
//!
//! `JsonFileStore` keeps one pretty-printed JSON file per key:
//! key `device` lives in `{dir}/device.json`, key `verified` in
//! `{dir}/verified.json`. Reads never fail; a missing or corrupt file
//! reads as absent.

use crate::error::{PersistenceError, PersistenceResult};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Key-value store for small JSON records.
pub trait PersistenceStore: Send + Sync {
    /// Read a record. Absent or unreadable records are `None`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a record, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> PersistenceResult<()>;
}

/// Arc wrapper for PersistenceStore trait objects.
pub type DynStore = Arc<dyn PersistenceStore>;

fn validate_key(key: &str) -> PersistenceResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidKey(key.to_string()))
    }
}

/// File-backed store, one `{key}.json` file per record.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PersistenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        validate_key(key).ok()?;
        let path = self.path_for(key);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Record not readable");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt record ignored");
                None
            }
        }
    }

    fn set(&self, key: &str, value: Value) -> PersistenceResult<()> {
        validate_key(key)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, serde_json::to_vec_pretty(&value)?)?;
        fs::rename(&tmp, &path)?;

        debug!(path = %path.display(), "Record written");
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Value>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with `Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.records.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> PersistenceResult<()> {
        validate_key(key)?;
        if *self.fail_writes.lock() {
            return Err(PersistenceError::Unavailable(format!(
                "write to '{key}' refused"
            )));
        }
        self.records.lock().insert(key.to_string(), value);
        Ok(())
    }
}
