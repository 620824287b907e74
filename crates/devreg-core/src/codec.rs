//! JSON wire codec for device assets.
//!
//! ## Rules
//!
//! 1. Field names are capitalized (`ID`, `Owner`, `IPFSHash`, ...).
//! 2. `ID`, `Owner` and `IPFSHash` are required; an empty `ID` is rejected.
//! 3. Access lists encode as ascending arrays; `null` or absent decodes as empty.
//! 4. `Name`, `Region` and `UpdatedAt` are omitted when unset.
//! 5. Unknown fields are ignored on decode.
//!
//! Rule 3 makes encoding deterministic: equal assets produce equal bytes.

use crate::asset::DeviceAsset;
use crate::error::{CoreError, Result};

/// Encode an asset to its wire bytes.
pub fn encode_asset(asset: &DeviceAsset) -> Result<Vec<u8>> {
    serde_json::to_vec(asset).map_err(|e| CoreError::Encode(e.to_string()))
}

/// Decode an asset from its wire bytes.
pub fn decode_asset(bytes: &[u8]) -> Result<DeviceAsset> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TxTimestamp;
    use crate::types::DeviceId;
    use crate::SchemaGeneration;

    #[test]
    fn test_decodes_minimal_generation() {
        let json = br#"{
            "ID": "device1",
            "Owner": "Tomoko",
            "IPFSHash": "jgf783y4uf",
            "AuthorizedDevices": ["device3", "device2"],
            "AuthorizedUsers": ["sandhya.shekar@sjsu.edu", "dylan.zhang@sjsu.edu"]
        }"#;

        let asset = decode_asset(json).unwrap();
        assert_eq!(asset.id.as_str(), "device1");
        assert_eq!(asset.owner, "Tomoko");
        assert!(asset.authorizes_device("device2"));
        assert!(asset.authorizes_user("dylan.zhang@sjsu.edu"));
        assert_eq!(asset.generation(), SchemaGeneration::Minimal);
    }

    #[test]
    fn test_decodes_null_access_lists() {
        let json = br#"{"ID":"device4","Owner":"o","IPFSHash":"","AuthorizedDevices":null,"AuthorizedUsers":null}"#;
        let asset = decode_asset(json).unwrap();
        assert!(asset.authorized_devices.is_empty());
        assert!(asset.authorized_users.is_empty());
    }

    #[test]
    fn test_ignores_unknown_fields() {
        let json = br#"{"ID":"device1","Owner":"o","IPFSHash":"h","Firmware":"2.1","Tags":[1,2]}"#;
        assert!(decode_asset(json).is_ok());
    }

    #[test]
    fn test_rejects_missing_core_fields() {
        assert!(matches!(
            decode_asset(br#"{"ID":"device1","IPFSHash":"h"}"#),
            Err(CoreError::Decode(_))
        ));
        assert!(decode_asset(br#"{"ID":"","Owner":"o","IPFSHash":"h"}"#).is_err());
        assert!(decode_asset(b"not json").is_err());
    }

    #[test]
    fn test_encodes_canonical_field_names() {
        let asset = DeviceAsset::new(DeviceId::new("device1").unwrap(), "Tomoko")
            .with_content_pointer("h1")
            .with_authorized_devices(["device3", "device2"]);

        let json = String::from_utf8(encode_asset(&asset).unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"ID":"device1","Owner":"Tomoko","IPFSHash":"h1","AuthorizedDevices":["device2","device3"],"AuthorizedUsers":[]}"#
        );
    }

    #[test]
    fn test_extended_fields_survive_encoding() {
        let updated = TxTimestamp::new(1_700_000_000, 0).unwrap().to_datetime().unwrap();
        let mut asset = DeviceAsset::new(DeviceId::new("device9").unwrap(), "Dylan")
            .with_name("thermostat")
            .with_region("us-west");
        asset.updated_at = Some(updated);

        let bytes = encode_asset(&asset).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.contains(r#""UpdatedAt":"2023-11-14T22:13:20Z""#));
        assert_eq!(decode_asset(&bytes).unwrap(), asset);
    }
}
