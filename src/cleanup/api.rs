//! Public API for the cleanup coordinator
//!
//! External modules should import from here rather than directly from
//! internal modules. Also hosts the process-wide coordinator used by code
//! that has no coordinator of its own to hand around.

use std::sync::{Arc, LazyLock};

pub use crate::cleanup::config::{CleanupConfig, MAX_DELAY_MS};
pub use crate::cleanup::coordinator::CleanupCoordinator;
pub use crate::cleanup::error::{ConfigError, ConfigResult};
pub use crate::cleanup::host::{
    ExternalCache, FrameScheduler, GarbageCollector, HostBindings, NoopFrameScheduler,
};
pub use crate::cleanup::status::{
    CategoryStatus, CleanupOutcome, CleanupPhase, CleanupReport, CleanupStatus,
    CoordinatorState, PhaseReport,
};

use crate::memory::probe::HeapSnapshot;

/// Global coordinator instance with default host bindings
static GLOBAL_COORDINATOR: LazyLock<Arc<CleanupCoordinator>> = LazyLock::new(|| {
    log::trace!("Initializing global cleanup coordinator");
    Arc::new(CleanupCoordinator::new())
});

/// Access the global coordinator
///
/// Every call returns the same shared instance.
///
/// # Examples
/// ```no_run
/// # use scenesweep::cleanup::api::{global_coordinator, perform_quick_cleanup};
/// # use scenesweep::resources::api::{AnimationFrameId, ResourceCategory};
/// # async fn example() {
/// global_coordinator().register(ResourceCategory::AnimationFrames, AnimationFrameId(7).into());
/// perform_quick_cleanup().await;
/// # }
/// ```
pub fn global_coordinator() -> Arc<CleanupCoordinator> {
    Arc::clone(&GLOBAL_COORDINATOR)
}

/// Run a full cleanup pass on the global coordinator
pub async fn perform_quick_cleanup() -> CleanupOutcome {
    GLOBAL_COORDINATOR.cleanup().await
}

/// Log heap usage through the global coordinator's probe
pub fn log_memory_usage(label: &str) -> Option<HeapSnapshot> {
    GLOBAL_COORDINATOR.log_memory_usage(label)
}

/// Status report of the global coordinator
pub fn check_cleanup_status() -> CleanupStatus {
    GLOBAL_COORDINATOR.cleanup_status()
}
