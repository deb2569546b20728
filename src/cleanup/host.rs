//! Host-global facilities injected into the coordinator.
//!
//! Frame scheduling, manual collection, heap telemetry and library caches
//! live outside the registry. They are passed in explicitly instead of
//! being probed as globals, so a coordinator can run against any host.

use std::fmt;
use std::sync::Arc;

use crate::memory::probe::{HeapProbe, ProcessHeapProbe};
use crate::resources::api::{AnimationFrameId, HandleResult};

/// Cancels pending animation-frame callbacks
pub trait FrameScheduler: Send + Sync {
    fn cancel_animation_frame(&self, id: AnimationFrameId);
}

/// Scheduler for hosts without a frame loop
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFrameScheduler;

impl FrameScheduler for NoopFrameScheduler {
    fn cancel_animation_frame(&self, id: AnimationFrameId) {
        log::trace!("No frame scheduler bound; dropping {}", id);
    }
}

/// Manual garbage-collection trigger
pub trait GarbageCollector: Send + Sync {
    fn collect(&self);
}

/// A library-level cache that can be emptied (texture loader cache,
/// point-cloud chunk cache)
pub trait ExternalCache: Send + Sync {
    fn name(&self) -> &str;

    fn clear(&self) -> HandleResult;
}

/// Everything the coordinator needs from its host besides the handles
#[derive(Clone)]
pub struct HostBindings {
    frames: Arc<dyn FrameScheduler>,
    collector: Option<Arc<dyn GarbageCollector>>,
    heap: Arc<dyn HeapProbe>,
    caches: Vec<Arc<dyn ExternalCache>>,
}

impl HostBindings {
    /// No-op frame scheduler, no collector, process heap probe, no caches
    pub fn new() -> Self {
        Self {
            frames: Arc::new(NoopFrameScheduler),
            collector: None,
            heap: Arc::new(ProcessHeapProbe),
            caches: Vec::new(),
        }
    }

    pub fn with_frame_scheduler(mut self, frames: Arc<dyn FrameScheduler>) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_collector(mut self, collector: Arc<dyn GarbageCollector>) -> Self {
        self.collector = Some(collector);
        self
    }

    pub fn with_heap_probe(mut self, heap: Arc<dyn HeapProbe>) -> Self {
        self.heap = heap;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn ExternalCache>) -> Self {
        self.caches.push(cache);
        self
    }

    pub fn frames(&self) -> &dyn FrameScheduler {
        self.frames.as_ref()
    }

    pub fn collector(&self) -> Option<&dyn GarbageCollector> {
        self.collector.as_deref()
    }

    pub fn heap(&self) -> &dyn HeapProbe {
        self.heap.as_ref()
    }

    pub fn caches(&self) -> &[Arc<dyn ExternalCache>] {
        &self.caches
    }
}

impl Default for HostBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HostBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostBindings")
            .field("collector", &self.collector.is_some())
            .field(
                "caches",
                &self.caches.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
