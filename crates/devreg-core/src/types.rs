//! Strong type definitions for the registry.
//!
//! Identifiers and pointers are newtypes so a device id can never be passed
//! where a content hash is expected.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Identifier of a device asset. Also the ledger key of its record.
///
/// Never empty: construction and decoding both reject `""`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a device id, rejecting the empty string.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::InvalidDeviceId(id));
        }
        Ok(Self(id))
    }

    /// `prefix` followed by the decimal `n`, e.g. `device3`.
    ///
    /// Never empty, since the decimal suffix always has a digit.
    pub fn numbered(prefix: &str, n: usize) -> Self {
        Self(format!("{}{}", prefix, n))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeviceId {
    type Error = CoreError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl TryFrom<&str> for DeviceId {
    type Error = CoreError;

    fn try_from(id: &str) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl FromStr for DeviceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

/// Opaque pointer to externally stored content (an IPFS hash).
///
/// The registry never interprets the bytes. The empty pointer means no
/// content has been published yet.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentPointer(String);

impl ContentPointer {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// The empty pointer.
    pub fn none() -> Self {
        Self(String::new())
    }

    /// Whether any content has been published behind this pointer.
    pub fn is_published(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ContentPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentPointer({:?})", self.0)
    }
}

impl fmt::Display for ContentPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentPointer {
    fn from(hash: &str) -> Self {
        Self::new(hash)
    }
}

impl From<String> for ContentPointer {
    fn from(hash: String) -> Self {
        Self(hash)
    }
}

impl PartialEq<str> for ContentPointer {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ContentPointer {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
