//! In-memory reference host.
//!
//! Implements every capability trait with counters so a cleanup pass can
//! be exercised and inspected without a real renderer or DOM.

pub mod dom;
pub mod facilities;
pub mod tracked;
pub mod viewer;
pub mod workload;

pub use dom::{SimContainer, SimEventTarget};
pub use facilities::{FixedHeapProbe, SimCache, SimCollector, SimFrameScheduler};
pub use tracked::{FailureMode, TrackedResource};
pub use viewer::{SimRenderer, SimViewer};
pub use workload::{Workload, WorkloadOptions, WorkloadSummary, MAX_NODES};
