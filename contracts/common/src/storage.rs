//! State Storage
//!
//! Pool and registry records outlive a single call. Contracts persist
//! them as Borsh-encoded values in a key-value [`StateStore`].

use borsh::{BorshDeserialize, BorshSerialize};
use tracing::{debug, warn};

use crate::constants::storage::{POOL_PREFIX, REGISTRY_PREFIX};
use crate::errors::{ContestError, ContestResult};
use crate::types::Address;
use crate::{BTreeMap, Vec};

/// Durable key-value store
pub trait StateStore {
    /// Read the value at `key`
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Write `value` at `key`, replacing any previous value
    fn put(&mut self, key: Vec<u8>, value: Vec<u8>);
}

/// Store held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.insert(key, value);
    }
}

// ============ Keys ============

fn prefixed_key(prefix: &[u8], address: &Address) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + address.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(address);
    key
}

/// Key of the registry record at `address`
pub fn registry_key(address: &Address) -> Vec<u8> {
    prefixed_key(REGISTRY_PREFIX, address)
}

/// Key of the pool record at `address`
pub fn pool_key(address: &Address) -> Vec<u8> {
    prefixed_key(POOL_PREFIX, address)
}

// ============ Records ============

/// Encode `record` and write it at `key`
pub fn save_record<S, T>(store: &mut S, key: Vec<u8>, record: &T) -> ContestResult<()>
where
    S: StateStore + ?Sized,
    T: BorshSerialize,
{
    let bytes = borsh::to_vec(record).map_err(|_| ContestError::Storage {
        reason: "failed to encode record",
    })?;
    debug!(key_len = key.len(), bytes = bytes.len(), "record saved");
    store.put(key, bytes);
    Ok(())
}

/// Read and decode the record at `key`, if any
pub fn load_record<S, T>(store: &S, key: &[u8]) -> ContestResult<Option<T>>
where
    S: StateStore + ?Sized,
    T: BorshDeserialize,
{
    let Some(bytes) = store.get(key) else {
        return Ok(None);
    };
    match borsh::from_slice(&bytes) {
        Ok(record) => Ok(Some(record)),
        Err(_) => {
            warn!(key_len = key.len(), "stored record is corrupt");
            Err(ContestError::Storage {
                reason: "failed to decode record",
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PoolPolicy;

    #[test]
    fn test_missing_record_is_none() {
        let store = MemoryStore::new();
        let loaded: Option<PoolPolicy> = load_record(&store, &pool_key(&[1u8; 32])).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_record_written_and_read() {
        let mut store = MemoryStore::new();
        let policy = PoolPolicy::new(3_600, 20);

        save_record(&mut store, registry_key(&[1u8; 32]), &policy).unwrap();
        let loaded: Option<PoolPolicy> = load_record(&store, &registry_key(&[1u8; 32])).unwrap();

        assert_eq!(loaded, Some(policy));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_corrupt_record_is_storage_error() {
        let mut store = MemoryStore::new();
        store.put(pool_key(&[1u8; 32]), vec![0xff]);

        let loaded: ContestResult<Option<PoolPolicy>> = load_record(&store, &pool_key(&[1u8; 32]));
        assert!(matches!(loaded, Err(ContestError::Storage { .. })));
    }

    #[test]
    fn test_registry_and_pool_keys_do_not_collide() {
        let address = [5u8; 32];
        assert_ne!(registry_key(&address), pool_key(&address));
    }
}
