//! Test modules for the cleanup coordinator
//!
//! Organized by functional area.

mod concurrent;
mod registration;

use std::sync::Arc;

use crate::cleanup::api::{CleanupConfig, CleanupCoordinator, HostBindings};
use crate::host::FixedHeapProbe;

/// Coordinator without delays or heap telemetry
pub(super) fn immediate_coordinator(host: HostBindings) -> CleanupCoordinator {
    CleanupCoordinator::new()
        .with_host(host.with_heap_probe(Arc::new(FixedHeapProbe(None))))
        .with_config(CleanupConfig::immediate())
}
