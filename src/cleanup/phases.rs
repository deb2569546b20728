//! The individual teardown phases.
//!
//! Every host callback runs through [`invoke`] or [`query`], which turn an
//! error or a panic into a logged warning and a failure tally. One bad
//! handle never stops the rest of its phase, and [`guard_phase`] keeps a
//! phase that fails outright from stopping the phases after it.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use crate::cleanup::host::{ExternalCache, FrameScheduler, GarbageCollector};
use crate::cleanup::status::{CleanupPhase, PhaseReport};
use crate::core::error_handling::panic_message;
use crate::resources::api::{Capability, ResourceHandle, SceneNode};

/// How a single capability invocation went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The handle does not expose the capability
    Absent,
    Done,
    Failed,
}

/// Run one host callback, containing errors and panics
pub(crate) fn invoke<F>(operation: &str, label: &str, f: F) -> Step
where
    F: FnOnce() -> Capability,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(None) => Step::Absent,
        Ok(Some(Ok(()))) => Step::Done,
        Ok(Some(Err(e))) => {
            log::warn!("{} of '{}' failed: {}", operation, label, e);
            Step::Failed
        }
        Err(payload) => {
            log::warn!(
                "{} of '{}' panicked: {}",
                operation,
                label,
                panic_message(payload.as_ref())
            );
            Step::Failed
        }
    }
}

/// Read a value from a host handle; `None` when the read panicked
pub(crate) fn query<T, F>(operation: &str, label: &str, f: F) -> Option<T>
where
    F: FnOnce() -> T,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            log::warn!(
                "{} of '{}' panicked: {}",
                operation,
                label,
                panic_message(payload.as_ref())
            );
            None
        }
    }
}

/// Host-supplied name, or `fallback` when producing it panicked
fn label_or<F>(fallback: &str, f: F) -> String
where
    F: FnOnce() -> String,
{
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| fallback.to_string())
}

/// Run a synchronous phase, containing a panic that escapes it
pub(crate) fn guard_phase<F>(phase: CleanupPhase, f: F) -> PhaseReport
where
    F: FnOnce() -> PhaseReport,
{
    catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| interrupted(phase, payload.as_ref()))
}

/// Report for a phase that a panic cut short
pub(crate) fn interrupted(phase: CleanupPhase, payload: &(dyn Any + Send)) -> PhaseReport {
    log::error!("Phase {} interrupted: {}", phase, panic_message(payload));
    let mut report = PhaseReport::new(phase);
    report.failures = 1;
    report
}

impl PhaseReport {
    fn tally(&mut self, step: Step) -> Step {
        if step == Step::Failed {
            self.failures += 1;
        }
        step
    }
}

/// (a) Cancel pending animation frames
pub(crate) fn cancel_animation_frames(
    handles: Vec<ResourceHandle>,
    frames: &dyn FrameScheduler,
) -> PhaseReport {
    let mut report = PhaseReport::new(CleanupPhase::AnimationFrames);
    for handle in handles {
        let ResourceHandle::AnimationFrame(id) = handle else {
            continue;
        };
        if id.is_null() {
            continue;
        }
        report.processed += 1;
        report.tally(invoke("cancel", &id.to_string(), || {
            frames.cancel_animation_frame(id);
            Some(Ok(()))
        }));
    }
    log::info!("Animation frames cancelled ({})", report.processed);
    report
}

/// (b) Dispose scenes: hook first, then the hierarchy in post-order
pub(crate) fn dispose_scenes(handles: Vec<ResourceHandle>) -> PhaseReport {
    let mut report = PhaseReport::new(CleanupPhase::Scenes);
    for handle in handles {
        let ResourceHandle::Scene(scene) = handle else {
            continue;
        };
        report.processed += 1;
        let name = scene.name();

        if let Some(hook) = scene.dispose_hook() {
            report.tally(invoke("scene dispose", &name, || hook.dispose()));
        }

        let released = dispose_hierarchy(scene.detach_root(), &mut report);
        log::debug!("Scene '{}': released {} nodes", name, released);
    }
    log::info!("Scenes disposed ({})", report.processed);
    report
}

/// Dispose geometry and materials of every node, children before parents.
/// Each yielded node is dropped once handled, which detaches it from its
/// parent. Returns the number of nodes visited.
fn dispose_hierarchy(root: SceneNode, report: &mut PhaseReport) -> usize {
    let mut visited = 0;
    for node in root.into_post_order() {
        visited += 1;
        if let Some(geometry) = node.geometry() {
            report.tally(invoke("geometry dispose", node.name(), || geometry.dispose()));
        }
        if let Some(slot) = node.material() {
            for material in slot.members() {
                report.tally(invoke("material dispose", node.name(), || material.dispose()));
            }
        }
    }
    visited
}

/// (c) Stop viewers and release their renderers
pub(crate) fn dispose_viewers(handles: Vec<ResourceHandle>) -> PhaseReport {
    let mut report = PhaseReport::new(CleanupPhase::Viewers);
    for handle in handles {
        let ResourceHandle::Viewer(viewer) = handle else {
            continue;
        };
        report.processed += 1;
        let label = label_or("viewer", || viewer.label().to_string());

        report.tally(invoke("stop", &label, || viewer.stop()));

        match query("splat mesh lookup", &label, || viewer.has_splat_mesh()) {
            Some(true) => log::debug!("Releasing splat mesh of '{}'", label),
            Some(false) => {}
            None => {
                report.tally(Step::Failed);
            }
        }

        let renderer = match query("renderer lookup", &label, || viewer.renderer()) {
            Some(renderer) => renderer,
            None => {
                report.tally(Step::Failed);
                None
            }
        };
        if let Some(renderer) = renderer {
            report.tally(invoke("force context loss", &label, || {
                renderer.force_context_loss()
            }));
            report.tally(invoke("renderer dispose", &label, || renderer.dispose()));
            report.tally(invoke("detach DOM element", &label, || {
                renderer.detach_dom_element()
            }));
        }

        report.tally(invoke("viewer dispose", &label, || viewer.dispose()));
    }
    log::info!("Viewers disposed ({})", report.processed);
    report
}

/// (d) Empty DOM containers
pub(crate) fn empty_containers(handles: Vec<ResourceHandle>) -> PhaseReport {
    let mut report = PhaseReport::new(CleanupPhase::Containers);
    for handle in handles {
        let ResourceHandle::Container(container) = handle else {
            continue;
        };
        report.processed += 1;
        let label = label_or("container", || container.label().to_string());

        // Bounded by the initial count so a container that never shrinks
        // cannot spin forever.
        let Some(children) = query("child count", &label, || container.child_count()) else {
            report.tally(Step::Failed);
            continue;
        };
        for _ in 0..children {
            let step = report.tally(invoke("remove child", &label, || {
                container.remove_first_child()
            }));
            if step != Step::Done {
                break;
            }
        }
        let left = query("child count", &label, || container.child_count()).unwrap_or(0);
        if left > 0 {
            log::warn!("Container '{}' still has {} children", label, left);
        }
    }
    log::info!("Containers emptied ({})", report.processed);
    report
}

/// (e) Remove tracked event listeners
pub(crate) fn remove_event_listeners(handles: Vec<ResourceHandle>) -> PhaseReport {
    let mut report = PhaseReport::new(CleanupPhase::EventListeners);
    for handle in handles {
        let ResourceHandle::EventListener(entry) = handle else {
            continue;
        };
        report.processed += 1;
        let target = label_or("event-target", || entry.target.label().to_string());
        let label = format!("{}:{}", target, entry.event);
        report.tally(invoke("remove listener", &label, || {
            entry
                .target
                .remove_event_listener(&entry.event, &entry.handler)
        }));
    }
    log::info!("Event listeners removed ({})", report.processed);
    report
}

/// (f) Dispose textures, geometries and materials registered directly
pub(crate) fn dispose_loose_resources(
    textures: Vec<ResourceHandle>,
    geometries: Vec<ResourceHandle>,
    materials: Vec<ResourceHandle>,
) -> PhaseReport {
    let mut report = PhaseReport::new(CleanupPhase::LooseResources);
    for handle in textures.into_iter().chain(geometries).chain(materials) {
        let resource = match &handle {
            ResourceHandle::Texture(r) | ResourceHandle::Geometry(r) | ResourceHandle::Material(r) => r,
            _ => continue,
        };
        report.processed += 1;
        let operation = format!("{} dispose", handle.category());
        report.tally(invoke(&operation, resource.label(), || resource.dispose()));
    }
    log::info!("Textures, geometries and materials disposed ({})", report.processed);
    report
}

/// (g) Clear optional library caches
pub(crate) fn clear_external_caches(caches: &[std::sync::Arc<dyn ExternalCache>]) -> PhaseReport {
    let mut report = PhaseReport::new(CleanupPhase::ExternalCaches);
    for cache in caches {
        report.processed += 1;
        let name = label_or("cache", || cache.name().to_string());
        if report.tally(invoke("cache clear", &name, || Some(cache.clear()))) == Step::Done {
            log::info!("Cache '{}' cleared", name);
        }
    }
    report
}

/// (h) Request collection now and once more after `delay`
pub(crate) async fn collect_garbage(
    collector: Option<&dyn GarbageCollector>,
    delay: Duration,
) -> PhaseReport {
    let mut report = PhaseReport::new(CleanupPhase::GarbageCollection);

    request_collection(collector, "immediate", &mut report);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    request_collection(collector, "delayed", &mut report);

    report
}

fn request_collection(
    collector: Option<&dyn GarbageCollector>,
    which: &str,
    report: &mut PhaseReport,
) {
    let Some(collector) = collector else {
        return;
    };
    report.processed += 1;
    if report.tally(invoke("garbage collection", which, || {
        collector.collect();
        Some(Ok(()))
    })) == Step::Done
    {
        log::info!("{} garbage collection requested", which);
    }
}
