//! # Device Registry Store
//!
//! The ledger access port and the device asset store built on it.
//!
//! ## Overview
//!
//! The host's key-value world state is abstracted behind the [`Ledger`]
//! trait (point get, point put, closeable full-range scan), and its
//! per-transaction environment behind [`TxContext`]. [`AssetStore`] layers
//! device-asset CRUD on top and is the only component that touches the
//! ledger.
//!
//! ## Key Types
//!
//! - [`Ledger`] - The world state port
//! - [`TxContext`] - Transaction timestamp and invoker identity
//! - [`AssetStore`] - Exists / read / create / update / list over assets
//! - [`MemoryLedger`] - In-memory world state for tests
//! - [`SqliteLedger`] - SQLite-backed world state
//!
//! ## Usage
//!
//! ```rust
//! use devreg_core::{DeviceAsset, DeviceId};
//! use devreg_store::{AssetStore, MemoryLedger, SystemContext};
//!
//! let store = AssetStore::new(MemoryLedger::new(), SystemContext::new());
//! let id = DeviceId::new("device1").unwrap();
//!
//! store.create(DeviceAsset::new(id.clone(), "Tomoko")).unwrap();
//! assert!(store.exists(&id).unwrap());
//! ```
//!
//! ## Design Notes
//!
//! - **Full overwrite**: updates replace the whole record
//! - **Fatal corruption**: undecodable records are errors, never coerced
//! - **Known race**: create is check-then-act; the host's commit-time
//!   conflict detection settles concurrent creates of one id

pub mod assets;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use assets::AssetStore;
pub use error::{LedgerError, LedgerResult, Result, StoreError};
pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;
pub use traits::{Ledger, SnapshotCursor, StateCursor, StateEntry, SystemContext, TxContext};
