//! Common test utilities and helpers
//!
//! Shared coordinator and config-file fixtures for the integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;

use scenesweep::cleanup::api::{CleanupConfig, CleanupCoordinator, HostBindings};
use scenesweep::host::FixedHeapProbe;
use tempfile::NamedTempFile;

/// Coordinator without delays or heap telemetry, bound to `host`
pub fn immediate_coordinator(host: HostBindings) -> CleanupCoordinator {
    CleanupCoordinator::new()
        .with_host(host.with_heap_probe(Arc::new(FixedHeapProbe(None))))
        .with_config(CleanupConfig::immediate())
}

/// Temporary TOML file holding `contents`
pub fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}
