//! Cleanup reports: per-category status and per-pass summaries

use serde::Serialize;
use std::time::Duration;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::version::report_schema_version;
use crate::resources::api::{ResourceCategory, ResourceStats};

/// Whether one category is empty, and how many handles remain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStatus {
    pub category: ResourceCategory,
    pub clean: bool,
    pub remaining: usize,
}

/// Per-category emptiness plus the overall verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupStatus {
    pub categories: Vec<CategoryStatus>,
    pub all_clean: bool,
}

impl CleanupStatus {
    pub fn from_stats(stats: &ResourceStats) -> Self {
        let categories: Vec<CategoryStatus> = ResourceCategory::all()
            .map(|category| {
                let remaining = stats.count(category);
                CategoryStatus {
                    category,
                    clean: remaining == 0,
                    remaining,
                }
            })
            .collect();
        let all_clean = categories.iter().all(|c| c.clean);
        Self {
            categories,
            all_clean,
        }
    }

    pub fn is_clean(&self, category: ResourceCategory) -> bool {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map_or(true, |c| c.clean)
    }

    /// Emit the report through the log facade
    pub fn log(&self) {
        log::info!("Resource cleanup status:");
        for status in &self.categories {
            log::info!(
                "   {}: {} ({})",
                status.category,
                if status.clean { "clean" } else { "NOT CLEAN" },
                status.remaining
            );
        }
        if self.all_clean {
            log::info!("   overall: fully cleaned");
        } else {
            log::warn!("   overall: resources remain registered");
        }
    }
}

/// The ordered steps of a cleanup pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CleanupPhase {
    AnimationFrames,
    Scenes,
    Viewers,
    Containers,
    EventListeners,
    LooseResources,
    ExternalCaches,
    GarbageCollection,
}

/// What one phase did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseReport {
    pub phase: CleanupPhase,
    /// Handles (or caches / collection requests) the phase went through
    pub processed: usize,
    /// Individual capability invocations that failed or panicked
    pub failures: usize,
}

impl PhaseReport {
    pub fn new(phase: CleanupPhase) -> Self {
        Self {
            phase,
            processed: 0,
            failures: 0,
        }
    }
}

/// Diagnostic summary of a finished pass. Not a success signal: check
/// `status` (or call `cleanup_status()` again) for that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupReport {
    pub schema_version: u32,
    pub phases: Vec<PhaseReport>,
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub status: CleanupStatus,
    /// Set when an unexpected failure cut the pass short
    pub aborted: Option<String>,
}

impl CleanupReport {
    pub(crate) fn new(
        phases: Vec<PhaseReport>,
        elapsed: Duration,
        status: CleanupStatus,
        aborted: Option<String>,
    ) -> Self {
        Self {
            schema_version: report_schema_version(),
            phases,
            elapsed,
            status,
            aborted,
        }
    }

    pub fn phase(&self, phase: CleanupPhase) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    pub fn total_failures(&self) -> usize {
        self.phases.iter().map(|p| p.failures).sum()
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Result of a `cleanup()` call
#[derive(Debug, Clone, PartialEq)]
pub enum CleanupOutcome {
    /// The pass ran to the end (individual failures are in the report)
    Finished(CleanupReport),
    /// Another pass was in flight; nothing was done
    AlreadyInProgress,
}

impl CleanupOutcome {
    pub fn report(&self) -> Option<&CleanupReport> {
        match self {
            CleanupOutcome::Finished(report) => Some(report),
            CleanupOutcome::AlreadyInProgress => None,
        }
    }
}

/// Coordinator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CoordinatorState {
    Idle,
    CleaningUp,
}
