//! Error types for the store module.

use devreg_core::DeviceId;
use thiserror::Error;

/// Failures reported by a ledger backend or the transaction context.
///
/// This is the generic storage error of the ledger access port.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A backend lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// Failure reported by a host-provided backend.
    #[error("backend error: {0}")]
    Backend(String),

    /// A scanned entry is not a well-formed record.
    #[error("corrupt entry under key {key:?}: {reason}")]
    CorruptEntry { key: String, reason: String },

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

/// Errors surfaced by [`AssetStore`](crate::AssetStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Ledger I/O failure.
    #[error("failed to access world state: {0}")]
    Storage(#[from] LedgerError),

    /// Stored bytes are not a well-formed asset.
    #[error("corrupt asset record under key {key:?}: {reason}")]
    Decode { key: String, reason: String },

    /// An asset could not be encoded for writing.
    #[error("failed to encode asset {id}: {reason}")]
    Encode { id: DeviceId, reason: String },

    /// The operation required an existing asset.
    #[error("the asset {0} does not exist")]
    NotFound(DeviceId),

    /// A create collided with an existing asset.
    #[error("the asset {0} already exists")]
    AlreadyExists(DeviceId),

    /// The transaction context returned an unusable timestamp.
    #[error("transaction context error: {0}")]
    Context(String),
}

/// Result type for ledger backends.
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
