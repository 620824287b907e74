//! CRUD over device assets, built directly on the ledger access port.
//!
//! [`AssetStore`] is the only component that touches the ledger. Each
//! operation issues at most one `put_state`, so a failed operation never
//! leaves a partially written record.
//!
//! # Concurrency
//!
//! `create` checks existence and then writes. Two transactions creating the
//! same id can both pass the check; the host's commit-time conflict
//! detection rejects one of them. Nothing here locks across transactions.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use devreg_core::{decode_asset, encode_asset, DeviceAsset, DeviceId};

use crate::error::{LedgerError, Result, StoreError};
use crate::traits::{Ledger, StateEntry, TxContext};

/// Device asset store over a ledger and a transaction context.
pub struct AssetStore<L, C> {
    ledger: L,
    ctx: C,
}

impl<L: Ledger, C: TxContext> AssetStore<L, C> {
    pub fn new(ledger: L, ctx: C) -> Self {
        Self { ledger, ctx }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// True iff a ledger entry exists under `id`.
    pub fn exists(&self, id: &DeviceId) -> Result<bool> {
        Ok(self.ledger.get_state(id.as_str())?.is_some())
    }

    /// Read the asset stored under `id`.
    pub fn read(&self, id: &DeviceId) -> Result<DeviceAsset> {
        let bytes = self
            .ledger
            .get_state(id.as_str())?
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        decode_record(id.as_str(), &bytes)
    }

    /// Persist a new asset. Fails if its id is already taken.
    ///
    /// Returns the record as written, with `updated_at` stamped.
    pub fn create(&self, asset: DeviceAsset) -> Result<DeviceAsset> {
        if self.exists(&asset.id)? {
            return Err(StoreError::AlreadyExists(asset.id));
        }
        let written = self.write(asset)?;
        debug!(id = %written.id, owner = %written.owner, "created device asset");
        Ok(written)
    }

    /// Overwrite an existing asset in full.
    ///
    /// No field of the previous version survives; `updated_at` is set to
    /// the current transaction time.
    pub fn update(&self, asset: DeviceAsset) -> Result<DeviceAsset> {
        if !self.exists(&asset.id)? {
            return Err(StoreError::NotFound(asset.id));
        }
        let written = self.write(asset)?;
        debug!(id = %written.id, "updated device asset");
        Ok(written)
    }

    /// Write an asset whether or not it exists. Used for seeding.
    pub fn put(&self, asset: DeviceAsset) -> Result<DeviceAsset> {
        let written = self.write(asset)?;
        debug!(id = %written.id, "put device asset");
        Ok(written)
    }

    /// Every asset in the store, in ledger key order.
    ///
    /// Any read or decode failure aborts the scan with
    /// [`StoreError::Storage`]; no partial list is returned.
    pub fn list_all(&self) -> Result<Vec<DeviceAsset>> {
        let assets = self
            .scan()?
            .into_iter()
            .map(|(key, bytes)| decode_record(&key, &bytes).map_err(corrupt_entry))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = assets.len(), "listed device assets");
        Ok(assets)
    }

    /// Number of records in the store. Records are neither decoded nor kept.
    pub fn count(&self) -> Result<usize> {
        let mut count = 0;
        self.drain(|_| count += 1)?;
        Ok(count)
    }

    fn write(&self, mut asset: DeviceAsset) -> Result<DeviceAsset> {
        asset.updated_at = Some(self.now()?);
        let bytes = encode_asset(&asset).map_err(|e| StoreError::Encode {
            id: asset.id.clone(),
            reason: e.to_string(),
        })?;
        self.ledger.put_state(asset.id.as_str(), Bytes::from(bytes))?;
        Ok(asset)
    }

    fn now(&self) -> Result<DateTime<Utc>> {
        self.ctx
            .timestamp()?
            .to_datetime()
            .map_err(|e| StoreError::Context(e.to_string()))
    }

    fn scan(&self) -> Result<Vec<StateEntry>> {
        let mut entries = Vec::new();
        self.drain(|entry| entries.push(entry))?;
        Ok(entries)
    }

    /// Feed every scanned entry to `visit`, closing the cursor on every path.
    fn drain(&self, mut visit: impl FnMut(StateEntry)) -> Result<()> {
        let mut cursor = self.ledger.scan_all()?;
        let mut failure = None;

        for item in cursor.by_ref() {
            match item {
                Ok(entry) => visit(entry),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        let closed = cursor.close();
        if let Some(e) = failure {
            return Err(e.into());
        }
        closed?;
        Ok(())
    }
}

fn decode_record(key: &str, bytes: &[u8]) -> Result<DeviceAsset> {
    let asset = decode_asset(bytes).map_err(|e| {
        warn!(key, error = %e, "corrupt device asset record");
        StoreError::Decode {
            key: key.to_owned(),
            reason: e.to_string(),
        }
    })?;

    if asset.id.as_str() != key {
        warn!(key, id = %asset.id, "device asset stored under foreign key");
        return Err(StoreError::Decode {
            key: key.to_owned(),
            reason: format!("record carries id {}", asset.id),
        });
    }

    Ok(asset)
}

/// A record that fails to decode mid-scan is a storage failure.
fn corrupt_entry(err: StoreError) -> StoreError {
    match err {
        StoreError::Decode { key, reason } => LedgerError::CorruptEntry { key, reason }.into(),
        other => other,
    }
}
