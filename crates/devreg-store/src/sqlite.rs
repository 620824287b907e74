//! SQLite implementation of the Ledger trait.
//!
//! A persistent stand-in for the host's world state, using rusqlite with
//! bundled SQLite. Scans materialize their rows when opened, so a cursor
//! never holds the connection lock.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::migration;
use crate::traits::{Ledger, SnapshotCursor, StateCursor, StateEntry};

/// SQLite-backed world state. Clones share one connection.
#[derive(Clone)]
pub struct SqliteLedger {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLedger {
    /// Open (or create) the world state file at `path`, migrating it.
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        Self::migrated(Connection::open(path)?)
    }

    /// A private world state that lives as long as the ledger.
    pub fn open_memory() -> LedgerResult<Self> {
        Self::migrated(Connection::open_in_memory()?)
    }

    fn migrated(mut conn: Connection) -> LedgerResult<Self> {
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| LedgerError::LockPoisoned(format!("sqlite connection: {}", e)))
    }
}

impl Ledger for SqliteLedger {
    fn get_state(&self, key: &str) -> LedgerResult<Option<Bytes>> {
        let conn = self.lock()?;
        let value: Option<Vec<u8>> = conn
            .query_row(
                "SELECT value FROM world_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.map(Bytes::from))
    }

    fn put_state(&self, key: &str, value: Bytes) -> LedgerResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO world_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, &value[..]],
        )?;
        Ok(())
    }

    fn scan_all(&self) -> LedgerResult<Box<dyn StateCursor + '_>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM world_state ORDER BY key")?;
        let entries = stmt
            .query_map([], |row| {
                let key: String = row.get(0)?;
                let value: Vec<u8> = row.get(1)?;
                Ok((key, Bytes::from(value)))
            })?
            .collect::<std::result::Result<Vec<StateEntry>, _>>()?;

        debug!(entries = entries.len(), "opened world state scan");
        Ok(Box::new(SnapshotCursor::new(entries)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_put() {
        let ledger = SqliteLedger::open_memory().unwrap();
        assert_eq!(ledger.get_state("device1").unwrap(), None);

        ledger
            .put_state("device1", Bytes::from_static(b"v1"))
            .unwrap();
        ledger
            .put_state("device1", Bytes::from_static(b"v2"))
            .unwrap();

        assert_eq!(
            ledger.get_state("device1").unwrap(),
            Some(Bytes::from_static(b"v2"))
        );
    }

    #[test]
    fn test_scan_orders_by_key() {
        let ledger = SqliteLedger::open_memory().unwrap();
        for key in ["device2", "device10", "device1"] {
            ledger.put_state(key, Bytes::from_static(b"x")).unwrap();
        }

        let keys: Vec<String> = ledger
            .scan_all()
            .unwrap()
            .map(|entry| entry.unwrap().0)
            .collect();
        assert_eq!(keys, vec!["device1", "device10", "device2"]);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.db");

        {
            let ledger = SqliteLedger::open(&path).unwrap();
            ledger
                .put_state("device1", Bytes::from_static(b"kept"))
                .unwrap();
        }

        let ledger = SqliteLedger::open(&path).unwrap();
        assert_eq!(
            ledger.get_state("device1").unwrap(),
            Some(Bytes::from_static(b"kept"))
        );
    }
}
