//! # Device Registry Access
//!
//! Authorization resolution: which content pointers may a requester see?
//!
//! ## Overview
//!
//! A requester is either a device (matched against each asset's
//! authorized-device list) or a user (matched against the authorized-user
//! list). Resolution is a pure function over a slice of assets: no ledger
//! access, no hidden state. Diagnostics go through a caller-supplied
//! [`ResolutionObserver`] instead of being printed.
//!
//! ## Policies
//!
//! - [`resolve_by_device`] - pointer of the LAST matching asset in scan order
//! - [`resolve_all_by_device`] - every matching pointer, in scan order
//! - [`resolve_by_user`] - every matching pointer, in scan order
//! - [`access_to`] - single-target check against one asset
//!
//! ## Usage
//!
//! ```rust
//! use devreg_access::{resolve_by_user, NoopObserver};
//! use devreg_core::{DeviceAsset, DeviceId};
//!
//! let assets = vec![DeviceAsset::new(DeviceId::new("device1").unwrap(), "Tomoko")
//!     .with_content_pointer("h1")
//!     .with_authorized_users(["a@x.com"])];
//!
//! let pointers = resolve_by_user("a@x.com", &assets, &NoopObserver);
//! assert_eq!(pointers.len(), 1);
//! ```

pub mod observer;
pub mod resolver;

pub use observer::{NoopObserver, ResolutionObserver, TracingObserver};
pub use resolver::{
    access_to, resolve_all_by_device, resolve_by_device, resolve_by_user, Requester,
};
