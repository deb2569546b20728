//! Heap telemetry and memory diagnostics

pub mod probe;
pub mod report;

pub use probe::{HeapProbe, HeapSnapshot, ProcessHeapProbe, UnsupportedHeapProbe};
pub use report::{describe_snapshot, log_memory_usage};
