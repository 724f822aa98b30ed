//! File-backed key-value store.
//!
//! The whole keyspace lives in one JSON object on disk; writes go
//! through a temp file + atomic rename so a crash mid-write never leaves
//! a half-written store behind. This is the `localStorage`-like backing:
//! contents survive restarts.

use purposely_core::error::{PurposelyError, Result};
use purposely_core::storage::KeyValueStore;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key-value store persisted as a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store at `base_dir/store.json`, creating the directory
    /// if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        fs::create_dir_all(base_dir)
            .map_err(|e| PurposelyError::storage(format!("failed to create {:?}: {}", base_dir, e)))?;
        Ok(Self {
            path: base_dir.join("store.json"),
            write_lock: Mutex::new(()),
        })
    }

    fn load_map(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| PurposelyError::storage(format!("failed to read {:?}: {}", self.path, e)))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            PurposelyError::storage(format!("corrupted store file {:?}: {}", self.path, e))
        })
    }

    fn save_map(&self, map: &HashMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(map)?;
        let tmp_path = self.path.with_extension("json.tmp");

        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| PurposelyError::storage("file store lock poisoned"))?;
        let mut map = self.load_map()?;
        map.insert(key.to_string(), value.to_string());
        self.save_map(&map)
    }
}
