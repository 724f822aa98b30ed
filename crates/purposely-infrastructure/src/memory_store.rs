//! In-memory key-value store.

use purposely_core::error::{PurposelyError, Result};
use purposely_core::storage::KeyValueStore;
use std::collections::HashMap;
use std::sync::Mutex;

/// Map-backed store for tests and session-scoped state.
///
/// Mirrors `sessionStorage` semantics: contents live and die with the
/// process.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self
            .map
            .lock()
            .map_err(|_| PurposelyError::storage("memory store lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self
            .map
            .lock()
            .map_err(|_| PurposelyError::storage("memory store lock poisoned"))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("ap:history:u1", "[\"h1\"]").unwrap();
        assert_eq!(store.get("ap:history:u1").unwrap().unwrap(), "[\"h1\"]");

        store.set("ap:history:u1", "[\"h1\",\"h2\"]").unwrap();
        assert_eq!(store.get("ap:history:u1").unwrap().unwrap(), "[\"h1\",\"h2\"]");
    }
}
