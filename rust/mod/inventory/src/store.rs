//! Whole-collection persistence over a `KVStore`.
//!
//! Each record type owns one slot (a single KV key) holding its full ordered
//! collection as a JSON array. Writers load the whole collection, change it in
//! memory and save it back in one `set`, so a failed validation never touches
//! the store.

use std::sync::Arc;

use hms_kv::{KVError, KVStore};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::model::{Demand, UsageRecord};

/// Named persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Demands,
    UsageRecords,
}

impl Slot {
    /// KV key for the slot.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Demands => "demands",
            Self::UsageRecords => "usage_records",
        }
    }

    pub const ALL: [Slot; 2] = [Slot::Demands, Slot::UsageRecords];
}

/// A record type stored as one collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const SLOT: Slot;
}

impl Record for Demand {
    const SLOT: Slot = Slot::Demands;
}

impl Record for UsageRecord {
    const SLOT: Slot = Slot::UsageRecords;
}

/// Load/save/clear of whole collections.
#[derive(Clone)]
pub struct CollectionStore {
    kv: Arc<dyn KVStore>,
}

impl CollectionStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    /// Full collection in storage order. Empty if never written.
    pub fn load<T: Record>(&self) -> Result<Vec<T>, KVError> {
        let key = T::SLOT.key();
        match self.kv.get(key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| KVError::Serialization(format!("{key}: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the collection.
    pub fn save<T: Record>(&self, records: &[T]) -> Result<(), KVError> {
        let key = T::SLOT.key();
        let bytes = serde_json::to_vec(records)
            .map_err(|e| KVError::Serialization(format!("{key}: {e}")))?;
        debug!(slot = key, records = records.len(), "save collection");
        self.kv.set(key, &bytes)
    }

    /// Remove one slot, as if never written.
    pub fn clear(&self, slot: Slot) -> Result<(), KVError> {
        debug!(slot = slot.key(), "clear collection");
        self.kv.delete(slot.key())
    }

    /// Remove several slots in one backend transaction.
    pub fn clear_all(&self, slots: &[Slot]) -> Result<(), KVError> {
        let keys: Vec<&str> = slots.iter().map(Slot::key).collect();
        debug!(?keys, "clear collections");
        self.kv.batch_delete(&keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DemandStatus;
    use hms_kv::MemoryStore;

    fn demand(id: &str) -> Demand {
        Demand {
            id: id.into(),
            department: "Cardiology".into(),
            item: "Stents".into(),
            subcategory: "Coronary".into(),
            quantity: 4,
            date: "2024-03-10".into(),
            timestamp: 1,
            status: DemandStatus::Pending,
            owner_id: "2".into(),
        }
    }

    #[test]
    fn test_load_empty_slot() {
        let store = CollectionStore::new(Arc::new(MemoryStore::new()));
        let demands: Vec<Demand> = store.load().unwrap();
        assert!(demands.is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_order() {
        let store = CollectionStore::new(Arc::new(MemoryStore::new()));
        store.save(&[demand("b"), demand("a"), demand("c")]).unwrap();

        let ids: Vec<String> = store.load::<Demand>().unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_slots_are_independent() {
        let kv = Arc::new(MemoryStore::new());
        let store = CollectionStore::new(kv.clone());
        store.save(&[demand("d1")]).unwrap();

        assert!(store.load::<UsageRecord>().unwrap().is_empty());
        assert!(kv.get("demands").unwrap().is_some());
        assert!(kv.get("usage_records").unwrap().is_none());

        store.clear(Slot::Demands).unwrap();
        assert!(kv.get("demands").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_slot_is_serialization_error() {
        let kv = Arc::new(MemoryStore::new());
        kv.set("demands", b"{not json").unwrap();
        let store = CollectionStore::new(kv);

        let err = store.load::<Demand>().unwrap_err();
        assert!(matches!(err, KVError::Serialization(_)), "got {err:?}");
    }

    #[test]
    fn test_clear_all_removes_both_slots() {
        let kv = Arc::new(MemoryStore::new());
        let store = CollectionStore::new(kv.clone());
        store.save(&[demand("d1")]).unwrap();
        kv.set("usage_records", b"[]").unwrap();

        store.clear_all(&Slot::ALL).unwrap();
        assert!(kv.is_empty());
    }
}
