use crate::error::KVError;

/// KVStore is the persisted-store interface the ledgers are written against.
///
/// Keys are short slot names (`demands`, `usage_records`). Every write is
/// atomic from the caller's point of view: a concurrent reader sees either the
/// previous value or the new one, never a partial write.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key has never been written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Replace the value for a key.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Delete several keys in one transaction.
    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError>;
}
