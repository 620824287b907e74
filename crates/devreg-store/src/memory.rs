//! In-memory implementation of the Ledger trait.
//!
//! Used for tests and as a stand-in host. Keys are kept in a `BTreeMap`, so
//! scans follow byte-wise key order just like the SQLite backend.

use std::collections::BTreeMap;
use std::sync::RwLock;

use bytes::Bytes;

use crate::error::{LedgerError, LedgerResult};
use crate::traits::{Ledger, SnapshotCursor, StateCursor};

/// In-memory world state.
///
/// All data is lost when the ledger is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: RwLock<BTreeMap<String, Bytes>>,
}

impl MemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> LedgerResult<usize> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.len())
    }

    pub fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl Ledger for MemoryLedger {
    fn get_state(&self, key: &str) -> LedgerResult<Option<Bytes>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: Bytes) -> LedgerResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.insert(key.to_owned(), value);
        Ok(())
    }

    fn scan_all(&self) -> LedgerResult<Box<dyn StateCursor + '_>> {
        let state = self.state.read().map_err(poisoned)?;
        let entries = state
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(Box::new(SnapshotCursor::new(entries)))
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> LedgerError {
    LedgerError::LockPoisoned(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_ledger_basic() {
        let ledger = MemoryLedger::new();
        assert_eq!(ledger.get_state("device1").unwrap(), None);

        ledger
            .put_state("device1", Bytes::from_static(b"{}"))
            .unwrap();
        assert_eq!(
            ledger.get_state("device1").unwrap(),
            Some(Bytes::from_static(b"{}"))
        );
        assert_eq!(ledger.len().unwrap(), 1);
    }

    #[test]
    fn test_put_overwrites() {
        let ledger = MemoryLedger::new();
        ledger.put_state("k", Bytes::from_static(b"a")).unwrap();
        ledger.put_state("k", Bytes::from_static(b"b")).unwrap();

        assert_eq!(ledger.get_state("k").unwrap(), Some(Bytes::from_static(b"b")));
        assert_eq!(ledger.len().unwrap(), 1);
    }

    #[test]
    fn test_scan_is_key_ordered() {
        let ledger = MemoryLedger::new();
        for key in ["device2", "device10", "device1"] {
            ledger.put_state(key, Bytes::from_static(b"x")).unwrap();
        }

        let cursor = ledger.scan_all().unwrap();
        let keys: Vec<String> = cursor.map(|entry| entry.unwrap().0).collect();
        assert_eq!(keys, vec!["device1", "device10", "device2"]);
    }

    #[test]
    fn test_scan_is_a_snapshot() {
        let ledger = MemoryLedger::new();
        ledger.put_state("a", Bytes::from_static(b"1")).unwrap();

        let mut cursor = ledger.scan_all().unwrap();
        ledger.put_state("b", Bytes::from_static(b"2")).unwrap();

        assert!(cursor.next().is_some());
        assert!(cursor.next().is_none());
        cursor.close().unwrap();
    }
}
