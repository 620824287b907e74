//! Error types for the registry core.

use thiserror::Error;

/// Errors raised while constructing or (de)serializing core records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid device id: {0:?}")]
    InvalidDeviceId(String),

    #[error("invalid timestamp: {seconds}s {nanos}ns")]
    InvalidTimestamp { seconds: i64, nanos: u32 },

    #[error("encoding error: {0}")]
    Encode(String),

    #[error("decoding error: {0}")]
    Decode(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
