//! # Device Registry Testkit
//!
//! Testing utilities for the device registry.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a shared in-memory ledger with a deterministic clock,
//!   a ledger wrapper that injects storage failures, and an observer that
//!   records resolution events
//! - **Generators**: Proptest strategies for ids, emails, and assets
//!
//! ## Test Fixtures
//!
//! ```rust
//! use devreg_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let registry = fixture.registry().unwrap();
//! registry.initialize().unwrap();
//! assert_eq!(registry.get_all_assets().unwrap().len(), 2);
//! ```
//!
//! ## Fault Injection
//!
//! Wrap a ledger to make storage calls fail on demand:
//!
//! ```rust
//! use std::sync::Arc;
//! use devreg::{Registry, RegistryConfig};
//! use devreg_testkit::fixtures::{FaultyLedger, ManualClock};
//!
//! let ledger = Arc::new(FaultyLedger::new());
//! let registry =
//!     Registry::new(Arc::clone(&ledger), ManualClock::new(), RegistryConfig::default()).unwrap();
//! registry.initialize().unwrap();
//!
//! ledger.fail_scans_after(1);
//! assert!(registry.get_all_assets().is_err());
//! ```
//!
//! Strategies in [`generators`] feed `proptest!` blocks directly.

pub mod fixtures;
pub mod generators;

pub use fixtures::{FaultyLedger, ManualClock, RecordingObserver, TestFixture};
pub use generators::{device_asset, device_id, distinct_assets, email};
