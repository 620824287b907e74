//! Error types for the Registry.

use devreg_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Storage error, carrying the store's error kind unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A caller-supplied argument was rejected before touching the ledger.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The registry configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for Registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
