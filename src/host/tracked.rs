//! Disposable resources that count what happened to them

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::resources::api::{Capability, Disposable, HandleError};

/// How a simulated handle reacts to disposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    #[default]
    Never,
    /// Report a `HandleError`
    Error,
    /// Panic inside the callback
    Panic,
}

impl FailureMode {
    /// Apply the mode to an invocation of `operation` on `label`
    pub(crate) fn outcome(self, operation: &str, label: &str) -> Capability {
        match self {
            FailureMode::Never => Some(Ok(())),
            FailureMode::Error => Some(Err(HandleError::failed(
                operation,
                format!("{} refused", label),
            ))),
            FailureMode::Panic => panic!("{} panicked during {}", label, operation),
        }
    }
}

/// Texture, geometry, material or scene hook stand-in
#[derive(Debug)]
pub struct TrackedResource {
    label: String,
    failure: FailureMode,
    disposals: AtomicUsize,
}

impl TrackedResource {
    pub fn new(label: impl Into<String>) -> Arc<Self> {
        Self::with_failure(label, FailureMode::Never)
    }

    pub fn with_failure(label: impl Into<String>, failure: FailureMode) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            failure,
            disposals: AtomicUsize::new(0),
        })
    }

    /// Number of times `dispose` was invoked, failed attempts included
    pub fn dispose_count(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }

    pub fn is_disposed(&self) -> bool {
        self.dispose_count() > 0
    }

    pub fn failure(&self) -> FailureMode {
        self.failure
    }
}

impl Disposable for TrackedResource {
    fn label(&self) -> &str {
        &self.label
    }

    fn dispose(&self) -> Capability {
        self.disposals.fetch_add(1, Ordering::SeqCst);
        self.failure.outcome("dispose", &self.label)
    }
}
