//! The device asset record.
//!
//! One schema covers both record generations seen on the ledger: the minimal
//! core (`ID`, `Owner`, `IPFSHash`, `AuthorizedDevices`, `AuthorizedUsers`)
//! and the extended shape that adds `Name`, `Region` and `UpdatedAt`. The
//! extended fields are optional and omitted from the wire when unset, so
//! records of either generation decode into [`DeviceAsset`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::AccessList;
use crate::types::{ContentPointer, DeviceId};

/// Which generation of the asset schema a record uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaGeneration {
    /// Only the core fields.
    Minimal,
    /// At least one of `Name`, `Region` or `UpdatedAt` is present.
    Extended,
}

/// A registered device, its content pointer, and who may resolve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAsset {
    /// Unique, immutable id. Doubles as the ledger key.
    #[serde(rename = "ID")]
    pub id: DeviceId,

    /// The principal that registered the device.
    #[serde(rename = "Owner")]
    pub owner: String,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "Region", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Pointer to the device's published content. Empty until published.
    #[serde(rename = "IPFSHash")]
    pub content_pointer: ContentPointer,

    /// Devices allowed to resolve `content_pointer`.
    #[serde(rename = "AuthorizedDevices", default)]
    pub authorized_devices: AccessList,

    /// User emails allowed to resolve `content_pointer`.
    #[serde(rename = "AuthorizedUsers", default)]
    pub authorized_users: AccessList,

    /// Time of the last mutation, assigned by the transaction host.
    #[serde(rename = "UpdatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DeviceAsset {
    /// A fresh asset: no content published, nobody authorized.
    pub fn new(id: DeviceId, owner: impl Into<String>) -> Self {
        Self {
            id,
            owner: owner.into(),
            name: None,
            region: None,
            content_pointer: ContentPointer::none(),
            authorized_devices: AccessList::new(),
            authorized_users: AccessList::new(),
            updated_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_content_pointer(mut self, pointer: impl Into<ContentPointer>) -> Self {
        self.content_pointer = pointer.into();
        self
    }

    /// Replace the authorized-device list.
    pub fn with_authorized_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorized_devices = devices.into_iter().collect();
        self
    }

    /// Replace the authorized-user list.
    pub fn with_authorized_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorized_users = users.into_iter().collect();
        self
    }

    /// Whether `device_id` may resolve this asset's content pointer.
    pub fn authorizes_device(&self, device_id: &str) -> bool {
        self.authorized_devices.contains(device_id)
    }

    /// Whether `email` may resolve this asset's content pointer.
    pub fn authorizes_user(&self, email: &str) -> bool {
        self.authorized_users.contains(email)
    }

    pub fn generation(&self) -> SchemaGeneration {
        if self.name.is_none() && self.region.is_none() && self.updated_at.is_none() {
            SchemaGeneration::Minimal
        } else {
            SchemaGeneration::Extended
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DeviceId {
        DeviceId::new(s).unwrap()
    }

    #[test]
    fn test_new_asset_is_unpublished_and_closed() {
        let asset = DeviceAsset::new(id("device1"), "Tomoko");
        assert!(!asset.content_pointer.is_published());
        assert!(asset.authorized_devices.is_empty());
        assert!(asset.authorized_users.is_empty());
        assert_eq!(asset.generation(), SchemaGeneration::Minimal);
    }

    #[test]
    fn test_builder_sets_acls() {
        let asset = DeviceAsset::new(id("device1"), "Tomoko")
            .with_content_pointer("h1")
            .with_authorized_devices(["device2", "device3"])
            .with_authorized_users(["a@x.com"]);

        assert!(asset.authorizes_device("device2"));
        assert!(!asset.authorizes_device("device1"));
        assert!(asset.authorizes_user("a@x.com"));
        assert_eq!(asset.content_pointer, "h1");
    }

    #[test]
    fn test_generation_extended() {
        let asset = DeviceAsset::new(id("device1"), "Tomoko").with_region("us-west");
        assert_eq!(asset.generation(), SchemaGeneration::Extended);
    }
}
