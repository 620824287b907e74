//! # Device Registry
//!
//! An access-controlled registry of device assets on a key-value ledger.
//!
//! ## Overview
//!
//! Each device asset owns a pointer to externally stored content (an IPFS
//! hash) and two access lists, authorized devices and authorized users,
//! that gate who may resolve that pointer. The registry provides:
//!
//! - **Store**: transactional CRUD over assets in the host's world state
//! - **Allocation**: deterministic, collision-checked device ids
//! - **Resolution**: mapping a device id or user email to the pointers it may see
//!
//! ## Usage
//!
//! ```rust
//! use devreg::{Registry, RegistryConfig};
//! use devreg::store::{MemoryLedger, SystemContext};
//!
//! let registry = Registry::new(
//!     MemoryLedger::new(),
//!     SystemContext::new(),
//!     RegistryConfig::default(),
//! )
//! .unwrap();
//!
//! registry.initialize().unwrap();
//! let pointer = registry.resolve_device_access("device3").unwrap();
//! assert!(pointer.is_some());
//! ```
//!
//! ## Re-exports
//!
//! - `devreg::core` - Data model and wire codec
//! - `devreg::store` - Ledger port, backends, and asset store
//! - `devreg::access` - Authorization resolution

pub mod allocator;
pub mod config;
pub mod error;
pub mod registry;

// Re-export component crates
pub use devreg_access as access;
pub use devreg_core as core;
pub use devreg_store as store;

pub use allocator::IdAllocator;
pub use config::{example_assets, RegistryConfig, DEFAULT_ID_PREFIX};
pub use error::{RegistryError, Result};
pub use registry::{AssetUpdate, CreateResult, Registry};

// Re-export commonly used types
pub use devreg_core::{AccessList, ContentPointer, DeviceAsset, DeviceId, TxTimestamp};
pub use devreg_store::{Ledger, StoreError, TxContext};
