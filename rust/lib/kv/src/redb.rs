use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("hms");

/// RedbStore is a KVStore backed by redb, a pure-Rust embedded database.
///
/// Each `set`/`delete`/`batch_delete` runs in its own write transaction, so a
/// whole-collection replace is committed atomically and survives restart.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(KVError::storage)?;
            }
        }
        let db = Database::create(path).map_err(KVError::storage)?;

        // Create the table up front so readers never hit a missing table.
        let write_txn = db.begin_write().map_err(KVError::storage)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(KVError::storage)?;
        }
        write_txn.commit().map_err(KVError::storage)?;

        debug!("opened redb store at {}", path.display());
        Ok(Self { db: Arc::new(db) })
    }

    /// Run `f` against the table inside one write transaction and commit.
    fn write<F>(&self, f: F) -> Result<(), KVError>
    where
        F: FnOnce(&mut redb::Table<'_, &'static str, &'static [u8]>) -> Result<(), KVError>,
    {
        let write_txn = self.db.begin_write().map_err(KVError::storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(KVError::storage)?;
            f(&mut table)?;
        }
        write_txn.commit().map_err(KVError::storage)
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = read_txn.open_table(TABLE).map_err(KVError::storage)?;

        let value = table.get(key).map_err(KVError::storage)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        debug!(key, bytes = value.len(), "redb set");
        self.write(|table| {
            table.insert(key, value).map_err(KVError::storage)?;
            Ok(())
        })
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        debug!(key, "redb delete");
        self.write(|table| {
            table.remove(key).map_err(KVError::storage)?;
            Ok(())
        })
    }

    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError> {
        debug!(?keys, "redb batch delete");
        self.write(|table| {
            for key in keys {
                table.remove(*key).map_err(KVError::storage)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_tmp() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (store, dir)
    }

    #[test]
    fn test_get_missing_key_is_none() {
        let (store, _dir) = open_tmp();
        assert!(store.get("demands").unwrap().is_none());
    }

    #[test]
    fn test_set_replaces_value() {
        let (store, _dir) = open_tmp();
        store.set("demands", b"[1]").unwrap();
        store.set("demands", b"[1,2]").unwrap();
        assert_eq!(store.get("demands").unwrap().unwrap(), b"[1,2]");
    }

    #[test]
    fn test_delete_missing_key_is_ok() {
        let (store, _dir) = open_tmp();
        store.delete("nope").unwrap();
    }

    #[test]
    fn test_batch_delete_removes_all_keys() {
        let (store, _dir) = open_tmp();
        store.set("demands", b"[]").unwrap();
        store.set("usage_records", b"[]").unwrap();
        store.set("other", b"x").unwrap();

        store.batch_delete(&["demands", "usage_records"]).unwrap();

        assert!(store.get("demands").unwrap().is_none());
        assert!(store.get("usage_records").unwrap().is_none());
        assert_eq!(store.get("other").unwrap().unwrap(), b"x");
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persist.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.set("usage_records", b"[{\"id\":\"u1\"}]").unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(
            store.get("usage_records").unwrap().unwrap(),
            b"[{\"id\":\"u1\"}]"
        );
    }
}
