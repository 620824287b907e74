//! Deterministic device id allocation.
//!
//! The counter is derived from ledger content at call time: the candidate
//! id is the configured prefix followed by `record count + 1`. No counter
//! lives in process memory, so every node executing the same transaction
//! against the same world state derives the same id, and a host restart
//! loses nothing.
//!
//! A candidate that already exists (e.g. seeded directly, or left behind
//! by a gap in the numbering) is reported as a collision. The allocator
//! never skips ahead to the next free number.

use tracing::warn;

use devreg_core::DeviceId;
use devreg_store::{AssetStore, Ledger, StoreError, TxContext};

use crate::error::Result;

/// Allocates fresh device ids from ledger state.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    prefix: String,
}

impl IdAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The id to try when `existing` records are already stored.
    pub fn candidate(&self, existing: usize) -> DeviceId {
        DeviceId::numbered(&self.prefix, existing + 1)
    }

    /// Produce an id not yet present in `store`.
    ///
    /// Fails with `StoreError::AlreadyExists` when the candidate is taken.
    pub fn allocate<L: Ledger, C: TxContext>(&self, store: &AssetStore<L, C>) -> Result<DeviceId> {
        let id = self.candidate(store.count()?);
        if store.exists(&id)? {
            warn!(id = %id, "allocated device id collides with an existing asset");
            return Err(StoreError::AlreadyExists(id).into());
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegistryError;
    use devreg_core::DeviceAsset;
    use devreg_store::{MemoryLedger, SystemContext};

    fn store() -> AssetStore<MemoryLedger, SystemContext> {
        AssetStore::new(MemoryLedger::new(), SystemContext::new())
    }

    #[test]
    fn test_first_id_is_one() {
        let allocator = IdAllocator::new("device");
        assert_eq!(allocator.allocate(&store()).unwrap().as_str(), "device1");
    }

    #[test]
    fn test_candidate_uses_prefix() {
        assert_eq!(IdAllocator::new("sensor").candidate(0).as_str(), "sensor1");
        assert_eq!(IdAllocator::new("device").candidate(41).as_str(), "device42");
    }

    #[test]
    fn test_follows_record_count() {
        let store = store();
        let allocator = IdAllocator::new("device");

        for _ in 0..3 {
            let id = allocator.allocate(&store).unwrap();
            store.create(DeviceAsset::new(id, "owner")).unwrap();
        }

        assert_eq!(allocator.allocate(&store).unwrap().as_str(), "device4");
    }

    #[test]
    fn test_collision_is_surfaced() {
        let store = store();
        // One record, stored under the id the allocator will try next.
        store
            .create(DeviceAsset::new(DeviceId::new("device2").unwrap(), "seed"))
            .unwrap();

        let err = IdAllocator::new("device").allocate(&store).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Store(StoreError::AlreadyExists(ref id)) if id.as_str() == "device2"
        ));
    }

    #[test]
    fn test_is_stateless() {
        let store = store();
        let a = IdAllocator::new("device");
        let b = IdAllocator::new("device");
        assert_eq!(a.allocate(&store).unwrap(), b.allocate(&store).unwrap());
    }
}
