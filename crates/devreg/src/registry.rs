//! The Registry: the transaction surface of the device registry.
//!
//! The Registry composes the asset store, the id allocator, and the
//! authorization resolver into the operations a transaction host invokes.
//! A Registry is cheap to build, so a host can create one per transaction
//! around a shared ledger (`&L` and `Arc<L>` are ledgers too).

use tracing::{debug, info, warn};

use devreg_access::{
    access_to, resolve_all_by_device, resolve_by_device, resolve_by_user, Requester,
    ResolutionObserver, TracingObserver,
};
use devreg_core::{AccessList, ContentPointer, DeviceAsset, DeviceId};
use devreg_store::{AssetStore, Ledger, StoreError, TxContext};

use crate::allocator::IdAllocator;
use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};

/// Outcome of [`Registry::create_new_device`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateResult {
    /// The device was registered under this id.
    Created(DeviceId),
    /// The allocated id was already taken; nothing was written.
    AlreadyExists(DeviceId),
}

impl CreateResult {
    pub fn id(&self) -> &DeviceId {
        match self {
            CreateResult::Created(id) | CreateResult::AlreadyExists(id) => id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, CreateResult::Created(_))
    }
}

/// The full replacement state for [`Registry::update_asset`].
///
/// Updates overwrite the whole record: fields left at their defaults here
/// are cleared on the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetUpdate {
    pub owner: String,
    pub name: Option<String>,
    pub region: Option<String>,
    pub content_pointer: ContentPointer,
    pub authorized_devices: AccessList,
    pub authorized_users: AccessList,
}

impl AssetUpdate {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            ..Self::default()
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

    pub fn with_authorized_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorized_devices = devices.into_iter().collect();
        self
    }

    pub fn with_authorized_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorized_users = users.into_iter().collect();
        self
    }

    fn into_asset(self, id: DeviceId) -> DeviceAsset {
        DeviceAsset {
            id,
            owner: self.owner,
            name: self.name,
            region: self.region,
            content_pointer: self.content_pointer,
            authorized_devices: self.authorized_devices,
            authorized_users: self.authorized_users,
            updated_at: None,
        }
    }
}

/// The device registry.
///
/// Provides the transaction surface:
/// - Seeding example assets
/// - Registering devices under allocated ids
/// - Reading, updating, and listing assets
/// - Resolving which content pointers a device or user may access
///
/// There is no delete operation.
pub struct Registry<L, C> {
    store: AssetStore<L, C>,
    allocator: IdAllocator,
    config: RegistryConfig,
    observer: Box<dyn ResolutionObserver + Send + Sync>,
}

impl<L: Ledger, C: TxContext> Registry<L, C> {
    /// Create a registry over `ledger`, validating `config`.
    ///
    /// Resolution events go to a [`TracingObserver`] unless replaced with
    /// [`with_observer`](Self::with_observer).
    pub fn new(ledger: L, ctx: C, config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: AssetStore::new(ledger, ctx),
            allocator: IdAllocator::new(config.id_prefix.clone()),
            config,
            observer: Box::new(TracingObserver),
        })
    }

    /// Replace the resolution observer.
    pub fn with_observer(
        mut self,
        observer: impl ResolutionObserver + Send + Sync + 'static,
    ) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Get the store reference.
    pub fn store(&self) -> &AssetStore<L, C> {
        &self.store
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Write the configured seed assets, overwriting any existing records.
    ///
    /// Seeding is not atomic across records: if one fails, the ones before
    /// it stay written and the error is returned.
    pub fn initialize(&self) -> Result<usize> {
        for asset in &self.config.seed_assets {
            self.store.put(asset.clone())?;
        }
        info!(count = self.config.seed_assets.len(), "seeded device assets");
        Ok(self.config.seed_assets.len())
    }

    /// Register a new device under a freshly allocated id.
    ///
    /// The asset starts with no content and empty access lists. An id
    /// collision is reported as [`CreateResult::AlreadyExists`], not as an
    /// error; storage failures are still errors.
    pub fn create_new_device(
        &self,
        owner: &str,
        name: Option<&str>,
        region: Option<&str>,
    ) -> Result<CreateResult> {
        let id = match self.allocator.allocate(&self.store) {
            Ok(id) => id,
            Err(RegistryError::Store(StoreError::AlreadyExists(id))) => {
                return Ok(CreateResult::AlreadyExists(id));
            }
            Err(e) => return Err(e),
        };

        let mut asset = DeviceAsset::new(id, owner);
        asset.name = name.map(str::to_owned);
        asset.region = region.map(str::to_owned);

        match self.store.create(asset) {
            Ok(created) => {
                info!(id = %created.id, owner, "registered new device");
                Ok(CreateResult::Created(created.id))
            }
            Err(StoreError::AlreadyExists(id)) => {
                warn!(id = %id, "device id taken during create");
                Ok(CreateResult::AlreadyExists(id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the asset `id` with `update`. Fails if `id` does not exist.
    pub fn update_asset(&self, id: &str, update: AssetUpdate) -> Result<DeviceAsset> {
        let id = parse_id(id)?;
        Ok(self.store.update(update.into_asset(id))?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn read_asset(&self, id: &str) -> Result<DeviceAsset> {
        Ok(self.store.read(&parse_id(id)?)?)
    }

    /// True iff a record is stored under `id`. No record has an empty id.
    pub fn asset_exists(&self, id: &str) -> Result<bool> {
        match DeviceId::new(id) {
            Ok(id) => Ok(self.store.exists(&id)?),
            Err(_) => Ok(false),
        }
    }

    /// Every asset, in ledger key order.
    pub fn get_all_assets(&self) -> Result<Vec<DeviceAsset>> {
        Ok(self.store.list_all()?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Access Resolution
    // ─────────────────────────────────────────────────────────────────────────

    /// The pointer `device_id` may access; the last authorizing asset in key
    /// order wins.
    pub fn resolve_device_access(&self, device_id: &str) -> Result<Option<ContentPointer>> {
        let assets = self.get_all_assets()?;
        let pointer = resolve_by_device(device_id, &assets, self.observer.as_ref()).cloned();
        debug!(device_id, granted = pointer.is_some(), "resolved device access");
        Ok(pointer)
    }

    /// Every pointer `device_id` may access, in key order.
    pub fn resolve_all_device_access(&self, device_id: &str) -> Result<Vec<ContentPointer>> {
        let assets = self.get_all_assets()?;
        Ok(resolve_all_by_device(device_id, &assets, self.observer.as_ref())
            .into_iter()
            .cloned()
            .collect())
    }

    /// Every pointer `email` may access, in key order.
    pub fn resolve_user_access(&self, email: &str) -> Result<Vec<ContentPointer>> {
        let assets = self.get_all_assets()?;
        Ok(resolve_by_user(email, &assets, self.observer.as_ref())
            .into_iter()
            .cloned()
            .collect())
    }

    /// The pointer of asset `target`, if it authorizes `device_id`.
    pub fn device_access_to(
        &self,
        device_id: &str,
        target: &str,
    ) -> Result<Option<ContentPointer>> {
        self.access_to_target(Requester::Device(device_id), target)
    }

    /// The pointer of asset `target`, if it authorizes `email`.
    pub fn user_access_to(&self, email: &str, target: &str) -> Result<Option<ContentPointer>> {
        self.access_to_target(Requester::User(email), target)
    }

    fn access_to_target(
        &self,
        requester: Requester<'_>,
        target: &str,
    ) -> Result<Option<ContentPointer>> {
        let asset = self.read_asset(target)?;
        Ok(access_to(requester, &asset, self.observer.as_ref()).cloned())
    }
}

fn parse_id(id: &str) -> Result<DeviceId> {
    DeviceId::new(id).map_err(|e| RegistryError::InvalidArgument(e.to_string()))
}
