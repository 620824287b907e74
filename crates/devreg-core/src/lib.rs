//! # Device Registry Core
//!
//! Pure data model for the device registry: device assets, their access
//! lists, and the JSON wire format they persist as.
//!
//! This crate contains no I/O, no storage, no logging. It is pure
//! computation over the registry's records.
//!
//! ## Key Types
//!
//! - [`DeviceAsset`] - The sole persisted entity, keyed by its [`DeviceId`]
//! - [`DeviceId`] - Non-empty identifier, also the ledger key
//! - [`ContentPointer`] - Opaque pointer (IPFS hash) to externally stored content
//! - [`AccessList`] - Set of principals allowed to resolve a content pointer
//! - [`TxTimestamp`] - Host-assigned transaction time
//!
//! ## Wire Format
//!
//! Assets persist as JSON objects with capitalized field names
//! (`ID`, `Owner`, `IPFSHash`, ...). See the [`codec`] module.

pub mod access;
pub mod asset;
pub mod codec;
pub mod error;
pub mod time;
pub mod types;

pub use access::AccessList;
pub use asset::{DeviceAsset, SchemaGeneration};
pub use codec::{decode_asset, encode_asset};
pub use error::{CoreError, Result};
pub use time::TxTimestamp;
pub use types::{ContentPointer, DeviceId};
