//! Proptest generators for property-based testing.

use std::collections::BTreeMap;

use proptest::prelude::*;

use devreg::AssetUpdate;
use devreg_core::{ContentPointer, DeviceAsset, DeviceId};

/// Generate a device id like `device17` or `gw3`.
pub fn device_id() -> impl Strategy<Value = DeviceId> {
    ("[a-z]{1,8}", 0u32..1000).prop_filter_map("non-empty id", |(prefix, n)| {
        DeviceId::new(format!("{}{}", prefix, n)).ok()
    })
}

/// Generate a plausible user email.
pub fn email() -> impl Strategy<Value = String> {
    ("[a-z][a-z.]{0,10}", "[a-z]{2,8}")
        .prop_map(|(local, domain)| format!("{}@{}.edu", local, domain))
}

/// Generate a content pointer, sometimes unpublished.
pub fn content_pointer() -> impl Strategy<Value = ContentPointer> {
    prop_oneof![
        1 => Just(ContentPointer::none()),
        4 => "Qm[1-9A-HJ-NP-Za-km-z]{8,44}".prop_map(ContentPointer::from),
    ]
}

fn optional_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[A-Za-z0-9 ]{1,16}")
}

/// Generate an asset with arbitrary access lists and no timestamp.
pub fn device_asset() -> impl Strategy<Value = DeviceAsset> {
    (
        device_id(),
        "[A-Za-z]{1,12}",
        optional_text(),
        optional_text(),
        content_pointer(),
        prop::collection::vec(device_id(), 0..5),
        prop::collection::vec(email(), 0..5),
    )
        .prop_map(|(id, owner, name, region, pointer, devices, users)| {
            let mut asset = DeviceAsset::new(id, owner)
                .with_content_pointer(pointer)
                .with_authorized_devices(devices.into_iter().map(DeviceId::into_inner))
                .with_authorized_users(users);
            asset.name = name;
            asset.region = region;
            asset
        })
}

/// Generate up to `max` assets with pairwise distinct ids.
pub fn distinct_assets(max: usize) -> impl Strategy<Value = Vec<DeviceAsset>> {
    prop::collection::vec(device_asset(), 0..=max).prop_map(|assets| {
        assets
            .into_iter()
            .map(|asset| (asset.id.clone(), asset))
            .collect::<BTreeMap<_, _>>()
            .into_values()
            .collect()
    })
}

/// Generate a full-overwrite update payload.
pub fn asset_update() -> impl Strategy<Value = AssetUpdate> {
    (
        "[A-Za-z]{1,12}",
        optional_text(),
        optional_text(),
        content_pointer(),
        prop::collection::vec(device_id(), 0..4),
        prop::collection::vec(email(), 0..4),
    )
        .prop_map(|(owner, name, region, pointer, devices, users)| {
            let mut update = AssetUpdate::new(owner)
                .with_content_pointer(pointer)
                .with_authorized_devices(devices.into_iter().map(DeviceId::into_inner))
                .with_authorized_users(users);
            if let Some(name) = name {
                update = update.with_name(name);
            }
            if let Some(region) = region {
                update = update.with_region(region);
            }
            update
        })
}
