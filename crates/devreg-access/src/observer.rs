//! Observability hook for authorization resolution.

use devreg_core::{ContentPointer, DeviceId};
use tracing::{debug, info};

use crate::resolver::Requester;

/// Receives resolution events. Every method defaults to doing nothing.
pub trait ResolutionObserver {
    /// The resolver was handed no assets at all.
    fn on_empty_assets(&self, _requester: &Requester<'_>) {}

    /// `asset` authorizes the requester.
    fn on_match(&self, _requester: &Requester<'_>, _asset: &DeviceId, _pointer: &ContentPointer) {}

    /// None of the `scanned` assets authorizes the requester.
    fn on_no_match(&self, _requester: &Requester<'_>, _scanned: usize) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ResolutionObserver for NoopObserver {}

/// Emits every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ResolutionObserver for TracingObserver {
    fn on_empty_assets(&self, requester: &Requester<'_>) {
        info!(requester = %requester, "no assets found");
    }

    fn on_match(&self, requester: &Requester<'_>, asset: &DeviceId, pointer: &ContentPointer) {
        debug!(requester = %requester, asset = %asset, pointer = %pointer, "access granted");
    }

    fn on_no_match(&self, requester: &Requester<'_>, scanned: usize) {
        debug!(requester = %requester, scanned, "no asset grants access");
    }
}
