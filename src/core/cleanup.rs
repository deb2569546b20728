//! Generic Cleanup Interface
//!
//! Lets callers trigger a teardown pass without knowing which registry or
//! host bindings sit behind it. The coordinator implements it; hosts that
//! embed several coordinators can hold them as `Arc<dyn Cleanup>`.

use async_trait::async_trait;

use crate::cleanup::api::{CleanupOutcome, CleanupStatus};

/// Asynchronous cleanup operations
#[async_trait]
pub trait Cleanup: Send + Sync {
    /// Release every resource managed by this instance.
    ///
    /// Never fails; a pass that is already running yields
    /// [`CleanupOutcome::AlreadyInProgress`].
    async fn cleanup(&self) -> CleanupOutcome;

    /// Report which managed categories are empty
    fn cleanup_status(&self) -> CleanupStatus;
}
