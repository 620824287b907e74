//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use devreg::{Registry, RegistryConfig};
use devreg_access::{Requester, ResolutionObserver};
use devreg_core::{ContentPointer, DeviceId, TxTimestamp};
use devreg_store::{
    Ledger, LedgerError, LedgerResult, MemoryLedger, StateCursor, StateEntry, TxContext,
};

/// A transaction context whose clock advances one second per reading.
///
/// Successive mutations therefore always see strictly increasing times.
#[derive(Debug)]
pub struct ManualClock {
    seconds: AtomicI64,
    invoker: Option<String>,
}

impl ManualClock {
    /// Start at 2023-11-14T22:13:20Z.
    pub fn new() -> Self {
        Self::starting_at(1_700_000_000)
    }

    pub fn starting_at(seconds: i64) -> Self {
        Self {
            seconds: AtomicI64::new(seconds),
            invoker: None,
        }
    }

    pub fn with_invoker(mut self, invoker: impl Into<String>) -> Self {
        self.invoker = Some(invoker.into());
        self
    }

    /// The time the next reading will return, without advancing.
    pub fn peek(&self) -> TxTimestamp {
        TxTimestamp {
            seconds: self.seconds.load(Ordering::SeqCst),
            nanos: 0,
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TxContext for ManualClock {
    fn timestamp(&self) -> LedgerResult<TxTimestamp> {
        Ok(TxTimestamp {
            seconds: self.seconds.fetch_add(1, Ordering::SeqCst),
            nanos: 0,
        })
    }

    fn invoker(&self) -> Option<String> {
        self.invoker.clone()
    }
}

/// A ledger wrapper that injects failures on demand.
pub struct FaultyLedger<L = MemoryLedger> {
    inner: L,
    fail_gets: AtomicBool,
    fail_close: AtomicBool,
    puts_allowed: AtomicUsize,
    scan_fails_after: AtomicUsize,
    closes: AtomicUsize,
}

impl FaultyLedger<MemoryLedger> {
    pub fn new() -> Self {
        Self::wrap(MemoryLedger::new())
    }
}

impl Default for FaultyLedger<MemoryLedger> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Ledger> FaultyLedger<L> {
    /// Wrap `inner` with every fault disabled.
    pub fn wrap(inner: L) -> Self {
        Self {
            inner,
            fail_gets: AtomicBool::new(false),
            fail_close: AtomicBool::new(false),
            puts_allowed: AtomicUsize::new(usize::MAX),
            scan_fails_after: AtomicUsize::new(usize::MAX),
            closes: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Make every `get_state` fail.
    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Allow only `count` more successful `put_state` calls.
    pub fn allow_puts(&self, count: usize) {
        self.puts_allowed.store(count, Ordering::SeqCst);
    }

    /// Make scans fail after yielding `entries` entries.
    pub fn fail_scans_after(&self, entries: usize) {
        self.scan_fails_after.store(entries, Ordering::SeqCst);
    }

    /// Make closing a scan cursor fail.
    pub fn fail_close(&self, fail: bool) {
        self.fail_close.store(fail, Ordering::SeqCst);
    }

    /// Number of scan cursors closed so far.
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Write raw bytes, bypassing fault injection.
    pub fn put_raw(&self, key: &str, value: &'static [u8]) -> LedgerResult<()> {
        self.inner.put_state(key, Bytes::from_static(value))
    }
}

impl<L: Ledger> Ledger for FaultyLedger<L> {
    fn get_state(&self, key: &str) -> LedgerResult<Option<Bytes>> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(injected("get_state"));
        }
        self.inner.get_state(key)
    }

    fn put_state(&self, key: &str, value: Bytes) -> LedgerResult<()> {
        let allowed = self
            .puts_allowed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if allowed.is_err() {
            return Err(injected("put_state"));
        }
        self.inner.put_state(key, value)
    }

    fn scan_all(&self) -> LedgerResult<Box<dyn StateCursor + '_>> {
        Ok(Box::new(FaultyCursor {
            inner: self.inner.scan_all()?,
            remaining: self.scan_fails_after.load(Ordering::SeqCst),
            failed: false,
            fail_close: self.fail_close.load(Ordering::SeqCst),
            closes: &self.closes,
        }))
    }
}

struct FaultyCursor<'a> {
    inner: Box<dyn StateCursor + 'a>,
    remaining: usize,
    failed: bool,
    fail_close: bool,
    closes: &'a AtomicUsize,
}

impl Iterator for FaultyCursor<'_> {
    type Item = LedgerResult<StateEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.remaining == 0 {
            self.failed = true;
            return Some(Err(injected("scan")));
        }
        self.remaining -= 1;
        self.inner.next()
    }
}

impl StateCursor for FaultyCursor<'_> {
    fn close(self: Box<Self>) -> LedgerResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close()?;
        if self.fail_close {
            return Err(injected("close"));
        }
        Ok(())
    }
}

fn injected(op: &str) -> LedgerError {
    LedgerError::Backend(format!("injected {} failure", op))
}

/// A resolution observer that records every event as a line of text.
///
/// Clones share one log, so a test can keep a handle after moving the
/// observer into a registry.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn record(&self, event: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl ResolutionObserver for RecordingObserver {
    fn on_empty_assets(&self, requester: &Requester<'_>) {
        self.record(format!("empty {}", requester));
    }

    fn on_match(&self, requester: &Requester<'_>, asset: &DeviceId, pointer: &ContentPointer) {
        self.record(format!("match {} {} {}", requester, asset, pointer));
    }

    fn on_no_match(&self, requester: &Requester<'_>, scanned: usize) {
        self.record(format!("none {} {}", requester, scanned));
    }
}

/// A shared in-memory ledger and deterministic clock.
///
/// Every registry built from one fixture sees the same world state, like
/// successive transactions against one host.
pub struct TestFixture {
    pub ledger: Arc<MemoryLedger>,
    pub clock: Arc<ManualClock>,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(MemoryLedger::new()),
            clock: Arc::new(ManualClock::new()),
        }
    }

    /// A registry with the default configuration.
    pub fn registry(&self) -> devreg::Result<Registry<Arc<MemoryLedger>, Arc<ManualClock>>> {
        self.registry_with(RegistryConfig::default())
    }

    pub fn registry_with(
        &self,
        config: RegistryConfig,
    ) -> devreg::Result<Registry<Arc<MemoryLedger>, Arc<ManualClock>>> {
        Registry::new(Arc::clone(&self.ledger), Arc::clone(&self.clock), config)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_strictly_increases() {
        let clock = ManualClock::new();
        let a = clock.timestamp().unwrap();
        let b = clock.timestamp().unwrap();
        assert!(a < b);
        assert_eq!(clock.peek().seconds, b.seconds + 1);
    }

    #[test]
    fn test_put_budget() {
        let ledger = FaultyLedger::new();
        ledger.allow_puts(1);
        assert!(ledger.put_state("a", Bytes::from_static(b"1")).is_ok());
        assert!(ledger.put_state("b", Bytes::from_static(b"2")).is_err());
        assert_eq!(ledger.inner().len().unwrap(), 1);
    }

    #[test]
    fn test_scan_failure_after_entries() {
        let ledger = FaultyLedger::new();
        ledger.put_raw("a", b"1").unwrap();
        ledger.put_raw("b", b"2").unwrap();
        ledger.fail_scans_after(1);

        let results: Vec<_> = ledger.scan_all().unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_recording_observer_clones_share_log() {
        let observer = RecordingObserver::new();
        let handle = observer.clone();
        observer.on_no_match(&Requester::Device("device7"), 2);
        assert_eq!(handle.events(), vec!["none device:device7 2"]);
    }

    #[test]
    fn test_fixture_registries_share_state() {
        let fixture = TestFixture::new();
        fixture.registry().unwrap().initialize().unwrap();
        assert!(fixture.registry().unwrap().asset_exists("device1").unwrap());
    }
}
