//! The ledger access port and transaction context.
//!
//! Both are provided by the transaction host. The registry only consumes
//! them; [`MemoryLedger`](crate::MemoryLedger) and
//! [`SqliteLedger`](crate::SqliteLedger) are reference backends.

use std::sync::Arc;

use bytes::Bytes;
use devreg_core::TxTimestamp;

use crate::error::LedgerResult;

/// A `(key, value)` pair produced by a range scan.
pub type StateEntry = (String, Bytes);

/// A closeable cursor over a full-range scan.
///
/// Entries arrive in ledger key order. `close` releases the host's
/// iterator and may itself fail.
pub trait StateCursor: Iterator<Item = LedgerResult<StateEntry>> {
    fn close(self: Box<Self>) -> LedgerResult<()>;
}

/// Key-value world state with point reads, point writes, and full scans.
///
/// All methods are synchronous: each registry operation is a plain sequence
/// of ledger calls inside one host-managed transaction.
pub trait Ledger: Send + Sync {
    /// Read the value under `key`. `None` means absent, which is not an error.
    fn get_state(&self, key: &str) -> LedgerResult<Option<Bytes>>;

    /// Write `value` under `key`, replacing any previous value.
    fn put_state(&self, key: &str, value: Bytes) -> LedgerResult<()>;

    /// Open an unbounded range scan over every key.
    fn scan_all(&self) -> LedgerResult<Box<dyn StateCursor + '_>>;
}

/// The host's execution environment for the current transaction.
pub trait TxContext: Send + Sync {
    /// The transaction timestamp.
    fn timestamp(&self) -> LedgerResult<TxTimestamp>;

    /// Identity of the invoking client, if the host exposes one.
    fn invoker(&self) -> Option<String> {
        None
    }
}

/// Cursor over entries materialized when the scan was opened.
pub struct SnapshotCursor {
    entries: std::vec::IntoIter<StateEntry>,
}

impl SnapshotCursor {
    pub fn new(entries: Vec<StateEntry>) -> Self {
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl Iterator for SnapshotCursor {
    type Item = LedgerResult<StateEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(Ok)
    }
}

impl StateCursor for SnapshotCursor {
    fn close(self: Box<Self>) -> LedgerResult<()> {
        Ok(())
    }
}

impl<L: Ledger + ?Sized> Ledger for &L {
    fn get_state(&self, key: &str) -> LedgerResult<Option<Bytes>> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: Bytes) -> LedgerResult<()> {
        (**self).put_state(key, value)
    }

    fn scan_all(&self) -> LedgerResult<Box<dyn StateCursor + '_>> {
        (**self).scan_all()
    }
}

impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    fn get_state(&self, key: &str) -> LedgerResult<Option<Bytes>> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: Bytes) -> LedgerResult<()> {
        (**self).put_state(key, value)
    }

    fn scan_all(&self) -> LedgerResult<Box<dyn StateCursor + '_>> {
        (**self).scan_all()
    }
}

impl<C: TxContext + ?Sized> TxContext for &C {
    fn timestamp(&self) -> LedgerResult<TxTimestamp> {
        (**self).timestamp()
    }

    fn invoker(&self) -> Option<String> {
        (**self).invoker()
    }
}

impl<C: TxContext + ?Sized> TxContext for Arc<C> {
    fn timestamp(&self) -> LedgerResult<TxTimestamp> {
        (**self).timestamp()
    }

    fn invoker(&self) -> Option<String> {
        (**self).invoker()
    }
}

/// Transaction context backed by the wall clock.
#[derive(Debug, Clone, Default)]
pub struct SystemContext {
    invoker: Option<String>,
}

impl SystemContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invoker(mut self, invoker: impl Into<String>) -> Self {
        self.invoker = Some(invoker.into());
        self
    }
}

impl TxContext for SystemContext {
    fn timestamp(&self) -> LedgerResult<TxTimestamp> {
        Ok(TxTimestamp::now())
    }

    fn invoker(&self) -> Option<String> {
        self.invoker.clone()
    }
}
