//! Registry configuration.

use std::collections::HashSet;

use serde::Deserialize;

use devreg_core::{DeviceAsset, DeviceId};

use crate::error::{RegistryError, Result};

/// Default prefix for allocated device ids.
pub const DEFAULT_ID_PREFIX: &str = "device";

/// Configuration for the Registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Allocated ids are this prefix followed by a decimal counter.
    pub id_prefix: String,
    /// Assets written by `initialize`, in order. Uses the asset wire format.
    pub seed_assets: Vec<DeviceAsset>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_owned(),
            seed_assets: example_assets(),
        }
    }
}

impl RegistryConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RegistryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn with_seed_assets(mut self, assets: Vec<DeviceAsset>) -> Self {
        self.seed_assets = assets;
        self
    }

    /// Check the prefix is non-empty and seed ids are unique.
    pub fn validate(&self) -> Result<()> {
        if self.id_prefix.is_empty() {
            return Err(RegistryError::Config("id_prefix must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for asset in &self.seed_assets {
            if !seen.insert(asset.id.as_str()) {
                return Err(RegistryError::Config(format!(
                    "duplicate seed asset {}",
                    asset.id
                )));
            }
        }

        Ok(())
    }
}

/// The two example devices written by a default `initialize`.
pub fn example_assets() -> Vec<DeviceAsset> {
    vec![
        example_device(1, "Tomoko", "jgf783y4uf"),
        example_device(2, "Tomoko2", "csd214h"),
    ]
}

fn example_device(n: usize, owner: &str, pointer: &str) -> DeviceAsset {
    DeviceAsset::new(DeviceId::numbered(DEFAULT_ID_PREFIX, n), owner)
        .with_content_pointer(pointer)
        .with_authorized_devices(["device2", "device3"])
        .with_authorized_users(["sandhya.shekar@sjsu.edu", "dylan.zhang@sjsu.edu"])
}
