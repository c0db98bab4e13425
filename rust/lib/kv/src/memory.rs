use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::KVError;
use crate::traits::KVStore;

/// MemoryStore is a process-local KVStore over a `BTreeMap`.
///
/// Nothing is persisted. Used by tests and by `hms --in-memory` dry runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned<T>(_: T) -> KVError {
        KVError::Storage("memory store lock poisoned".into())
    }
}

impl KVStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let entries = self.entries.read().map_err(Self::poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let mut entries = self.entries.write().map_err(Self::poisoned)?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        let mut entries = self.entries.write().map_err(Self::poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError> {
        // One write guard for the whole batch.
        let mut entries = self.entries.write().map_err(Self::poisoned)?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("demands", b"[]").unwrap();
        assert_eq!(store.get("demands").unwrap().unwrap(), b"[]");
        assert_eq!(store.len(), 1);

        store.delete("demands").unwrap();
        assert!(store.get("demands").unwrap().is_none());
    }

    #[test]
    fn test_batch_delete() {
        let store = MemoryStore::new();
        store.set("x:1", b"a").unwrap();
        store.set("x:2", b"b").unwrap();
        store.set("y:1", b"c").unwrap();

        store.batch_delete(&["x:1", "x:2", "missing"]).unwrap();
        assert!(store.get("x:1").unwrap().is_none());
        assert!(store.get("x:2").unwrap().is_none());
        assert_eq!(store.get("y:1").unwrap().unwrap(), b"c");
        assert_eq!(store.len(), 1);
    }
}
