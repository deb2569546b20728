//! Cleanup Coordinator
//!
//! Owns the resource registry and runs the ordered teardown pass over it.
//!
//! The coordinator is `Idle` or `CleaningUp`. Entering a pass flips an
//! atomic flag with compare-and-swap, so a second `cleanup()` issued while
//! one is in flight (from this task or another thread) is rejected instead
//! of queued. The flag is cleared by a drop guard on every exit path.
//!
//! The registry mutex is never held across an await point or while host
//! callbacks run: each phase takes its categories out first.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use async_trait::async_trait;

use crate::cleanup::config::CleanupConfig;
use crate::cleanup::host::HostBindings;
use crate::cleanup::phases;
use crate::cleanup::status::{
    CleanupOutcome, CleanupPhase, CleanupReport, CleanupStatus, CoordinatorState, PhaseReport,
};
use crate::core::cleanup::Cleanup;
use crate::core::error_handling::panic_message;
use crate::core::sync::lock_recover;
use crate::memory::probe::HeapSnapshot;
use crate::memory::report;
use crate::resources::api::{
    EventHandler, EventListenerEntry, EventTarget, ResourceCategory, ResourceError,
    ResourceHandle, ResourceRegistry, ResourceResult, ResourceStats,
};

/// Clears the in-flight flag when the pass ends, however it ends
struct PassGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Resource registry plus the teardown pass over it
pub struct CleanupCoordinator {
    registry: Mutex<ResourceRegistry>,
    host: HostBindings,
    config: CleanupConfig,
    cleaning_up: AtomicBool,
}

impl std::fmt::Debug for CleanupCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupCoordinator")
            .field("registry", &*self.registry())
            .field("host", &self.host)
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

impl CleanupCoordinator {
    /// Coordinator with default host bindings and configuration
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(ResourceRegistry::new()),
            host: HostBindings::default(),
            config: CleanupConfig::default(),
            cleaning_up: AtomicBool::new(false),
        }
    }

    pub fn with_host(mut self, host: HostBindings) -> Self {
        self.host = host;
        self
    }

    pub fn with_config(mut self, config: CleanupConfig) -> Self {
        self.config = config;
        self
    }

    fn registry(&self) -> MutexGuard<'_, ResourceRegistry> {
        lock_recover(&self.registry)
    }

    /// Track a handle under `category`.
    ///
    /// Null handles and handles of another category are ignored without
    /// error.
    pub fn register(&self, category: ResourceCategory, handle: ResourceHandle) {
        let result = self.registry().register(category, handle);
        match result {
            Ok(count) => log::debug!("Registered {} resource, count now {}", category, count),
            Err(rejection) => log::debug!("Ignored {} registration: {:?}", category, rejection),
        }
    }

    /// String-keyed registration; unknown names and `None` are ignored
    pub fn register_named(&self, category: &str, handle: Option<ResourceHandle>) {
        let Ok(category) = ResourceCategory::from_str(category) else {
            log::debug!("Ignored registration for unknown category '{}'", category);
            return;
        };
        match handle {
            Some(handle) => self.register(category, handle),
            None => log::debug!("Ignored null {} registration", category),
        }
    }

    /// Stop tracking the first identity-equal occurrence of `handle`
    pub fn unregister(&self, category: ResourceCategory, handle: &ResourceHandle) {
        let remaining = self.registry().unregister(category, handle);
        if let Some(remaining) = remaining {
            log::debug!("Removed {} resource, {} remaining", category, remaining);
        }
    }

    /// Attach a listener to `target` and track it for removal on cleanup.
    ///
    /// Nothing is registered when the target cannot attach the listener.
    pub fn add_event_listener_tracked(
        &self,
        target: Arc<dyn EventTarget>,
        event: &str,
        handler: EventHandler,
    ) -> ResourceResult<()> {
        match target.add_event_listener(event, Arc::clone(&handler)) {
            None => Err(ResourceError::ListenerUnsupported {
                target: target.label().to_string(),
            }),
            Some(Err(source)) => Err(ResourceError::ListenerAttach {
                target: target.label().to_string(),
                event: event.to_string(),
                source,
            }),
            Some(Ok(())) => {
                self.register(
                    ResourceCategory::EventListeners,
                    EventListenerEntry::new(target, event, handler).into(),
                );
                Ok(())
            }
        }
    }

    /// Handle count per category
    pub fn resource_stats(&self) -> ResourceStats {
        self.registry().stats()
    }

    /// Per-category emptiness report; also logged
    pub fn cleanup_status(&self) -> CleanupStatus {
        let status = CleanupStatus::from_stats(&self.resource_stats());
        status.log();
        status
    }

    /// Log a labelled heap snapshot (or that telemetry is unsupported)
    pub fn log_memory_usage(&self, label: &str) -> Option<HeapSnapshot> {
        report::log_memory_usage(self.host.heap(), label)
    }

    pub fn state(&self) -> CoordinatorState {
        if self.is_cleaning_up() {
            CoordinatorState::CleaningUp
        } else {
            CoordinatorState::Idle
        }
    }

    pub fn is_cleaning_up(&self) -> bool {
        self.cleaning_up.load(Ordering::Acquire)
    }

    /// Run the full teardown pass.
    ///
    /// Never fails. Individual disposal failures are logged and counted in
    /// the report; use [`cleanup_status`](Self::cleanup_status) to verify
    /// the result.
    pub async fn cleanup(&self) -> CleanupOutcome {
        if self
            .cleaning_up
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("Cleanup already in progress; ignoring repeated request");
            return CleanupOutcome::AlreadyInProgress;
        }
        let _guard = PassGuard {
            flag: &self.cleaning_up,
        };

        log::info!("Starting resource cleanup");
        let started = Instant::now();
        let mut phase_reports = Vec::with_capacity(8);

        // Phases contain their own panics; this catches the rest of the pass
        let aborted = match AssertUnwindSafe(self.run_pass(&mut phase_reports))
            .catch_unwind()
            .await
        {
            Ok(()) => None,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("Cleanup pass failed: {}", message);
                Some(message)
            }
        };

        let status = self.cleanup_status();
        let report = CleanupReport::new(phase_reports, started.elapsed(), status, aborted);
        log::info!(
            "Resource cleanup finished in {:?} with {} failure(s)",
            report.elapsed,
            report.total_failures()
        );
        CleanupOutcome::Finished(report)
    }

    fn take(&self, category: ResourceCategory) -> Vec<ResourceHandle> {
        self.registry().take(category)
    }

    async fn run_pass(&self, reports: &mut Vec<PhaseReport>) {
        if self.config.log_memory {
            self.log_memory_usage("before cleanup");
        }

        let frames = self.take(ResourceCategory::AnimationFrames);
        reports.push(phases::guard_phase(CleanupPhase::AnimationFrames, || {
            phases::cancel_animation_frames(frames, self.host.frames())
        }));
        let scenes = self.take(ResourceCategory::Scenes);
        reports.push(phases::guard_phase(CleanupPhase::Scenes, || {
            phases::dispose_scenes(scenes)
        }));
        let viewers = self.take(ResourceCategory::Viewers);
        reports.push(phases::guard_phase(CleanupPhase::Viewers, || {
            phases::dispose_viewers(viewers)
        }));
        let containers = self.take(ResourceCategory::Containers);
        reports.push(phases::guard_phase(CleanupPhase::Containers, || {
            phases::empty_containers(containers)
        }));
        let listeners = self.take(ResourceCategory::EventListeners);
        reports.push(phases::guard_phase(CleanupPhase::EventListeners, || {
            phases::remove_event_listeners(listeners)
        }));
        let (textures, geometries, materials) = (
            self.take(ResourceCategory::Textures),
            self.take(ResourceCategory::Geometries),
            self.take(ResourceCategory::Materials),
        );
        reports.push(phases::guard_phase(CleanupPhase::LooseResources, || {
            phases::dispose_loose_resources(textures, geometries, materials)
        }));
        reports.push(phases::guard_phase(CleanupPhase::ExternalCaches, || {
            phases::clear_external_caches(self.host.caches())
        }));
        let collection = phases::collect_garbage(self.host.collector(), self.config.gc_delay());
        reports.push(
            AssertUnwindSafe(collection)
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    phases::interrupted(CleanupPhase::GarbageCollection, payload.as_ref())
                }),
        );

        let verify_delay = self.config.verify_delay();
        if !verify_delay.is_zero() {
            tokio::time::sleep(verify_delay).await;
        }
        if self.config.log_memory {
            self.log_memory_usage("after cleanup");
        }
    }
}

impl Default for CleanupCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cleanup for CleanupCoordinator {
    async fn cleanup(&self) -> CleanupOutcome {
        CleanupCoordinator::cleanup(self).await
    }

    fn cleanup_status(&self) -> CleanupStatus {
        CleanupCoordinator::cleanup_status(self)
    }
}
