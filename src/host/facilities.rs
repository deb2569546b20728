//! Simulated host-global facilities: frame loop, collector, caches, heap

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::cleanup::host::{ExternalCache, FrameScheduler, GarbageCollector};
use crate::core::sync::lock_recover;
use crate::memory::probe::{HeapProbe, HeapSnapshot};
use crate::resources::api::{AnimationFrameId, HandleError, HandleResult};

/// Frame loop that hands out ids and remembers which are still pending
#[derive(Debug)]
pub struct SimFrameScheduler {
    next_id: AtomicU64,
    pending: Mutex<BTreeSet<u64>>,
}

impl SimFrameScheduler {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            pending: Mutex::new(BTreeSet::new()),
        }
    }

    /// Schedule a frame; ids start at one so none is ever null
    pub fn request_animation_frame(&self) -> AnimationFrameId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        lock_recover(&self.pending).insert(id);
        AnimationFrameId(id)
    }

    pub fn pending_count(&self) -> usize {
        lock_recover(&self.pending).len()
    }
}

impl Default for SimFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for SimFrameScheduler {
    fn cancel_animation_frame(&self, id: AnimationFrameId) {
        lock_recover(&self.pending).remove(&id.0);
    }
}

/// Counts collection requests
#[derive(Debug, Default)]
pub struct SimCollector {
    collections: AtomicUsize,
}

impl SimCollector {
    pub fn collections(&self) -> usize {
        self.collections.load(Ordering::SeqCst)
    }
}

impl GarbageCollector for SimCollector {
    fn collect(&self) {
        self.collections.fetch_add(1, Ordering::SeqCst);
    }
}

/// Named cache holding a number of entries
#[derive(Debug)]
pub struct SimCache {
    name: String,
    entries: AtomicUsize,
    broken: bool,
}

impl SimCache {
    pub fn new(name: impl Into<String>, entries: usize) -> Self {
        Self {
            name: name.into(),
            entries: AtomicUsize::new(entries),
            broken: false,
        }
    }

    /// Cache whose `clear` always fails
    pub fn broken(name: impl Into<String>) -> Self {
        Self {
            broken: true,
            ..Self::new(name, 0)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ExternalCache for SimCache {
    fn name(&self) -> &str {
        &self.name
    }

    fn clear(&self) -> HandleResult {
        if self.broken {
            return Err(HandleError::failed("cache clear", "backing store unavailable"));
        }
        self.entries.store(0, Ordering::SeqCst);
        Ok(())
    }
}

/// Probe reporting a fixed snapshot (or none)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedHeapProbe(pub Option<HeapSnapshot>);

impl HeapProbe for FixedHeapProbe {
    fn snapshot(&self) -> Option<HeapSnapshot> {
        self.0
    }
}
