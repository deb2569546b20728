//! Tables and JSON for cleanup results

use prettytable::{format, Cell, Row, Table};
use serde::Serialize;

use crate::cleanup::api::{CleanupReport, CleanupStatus};
use crate::core::styles::StyleRole;
use crate::host::WorkloadSummary;
use crate::resources::api::ResourceStats;

fn cell(text: impl ToString, role: StyleRole, color: bool) -> Cell {
    let cell = Cell::new(&text.to_string());
    match role.to_prettytable_spec() {
        Some(spec) if color => cell.style_spec(&spec),
        _ => cell,
    }
}

fn titled(titles: &[&str], color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(Row::new(
        titles
            .iter()
            .map(|t| cell(t, StyleRole::Header, color))
            .collect(),
    ));
    table
}

/// One row per category: name, clean flag, remaining count
pub fn status_table(status: &CleanupStatus, color: bool) -> Table {
    let mut table = titled(&["category", "status", "remaining"], color);
    for entry in &status.categories {
        let (text, role) = if entry.clean {
            ("clean", StyleRole::Clean)
        } else {
            ("NOT CLEAN", StyleRole::Dirty)
        };
        table.add_row(Row::new(vec![
            cell(entry.category, StyleRole::Category, color),
            cell(text, role, color),
            cell(entry.remaining, StyleRole::Value, color),
        ]));
    }
    table
}

/// Registered handle count per category
pub fn stats_table(stats: &ResourceStats, color: bool) -> Table {
    let mut table = titled(&["category", "registered"], color);
    for (category, count) in stats.iter() {
        table.add_row(Row::new(vec![
            cell(category, StyleRole::Category, color),
            cell(count, StyleRole::Value, color),
        ]));
    }
    table
}

/// One row per phase with its processed and failure counts
pub fn phase_table(report: &CleanupReport, color: bool) -> Table {
    let mut table = titled(&["phase", "processed", "failures"], color);
    for phase in &report.phases {
        let failure_role = if phase.failures == 0 {
            StyleRole::Dim
        } else {
            StyleRole::Error
        };
        table.add_row(Row::new(vec![
            cell(phase.phase, StyleRole::Literal, color),
            cell(phase.processed, StyleRole::Value, color),
            cell(phase.failures, failure_role, color),
        ]));
    }
    table
}

/// Host-side counters after a demo run
pub fn summary_table(summary: &WorkloadSummary, color: bool) -> Table {
    let mut table = titled(&["host", "count"], color);
    let rows = [
        ("disposables", summary.disposables),
        ("disposed", summary.disposed),
        ("failing", summary.failing),
        ("viewers running", summary.viewers_running),
        ("renderers attached", summary.renderers_attached),
        ("container children", summary.container_children),
        ("listeners attached", summary.listeners_attached),
        ("pending frames", summary.pending_frames),
        ("cache entries", summary.cache_entries),
        ("collections", summary.collections),
    ];
    for (name, value) in rows {
        table.add_row(Row::new(vec![
            cell(name, StyleRole::Literal, color),
            cell(value, StyleRole::Value, color),
        ]));
    }
    table
}

/// Print with terminal colours when enabled, plain text otherwise
pub fn print_table(table: &Table, color: bool) {
    if color {
        table.printstd();
    } else {
        print!("{}", table);
    }
}

/// Machine-readable result of a demo run
#[derive(Debug, Serialize)]
pub struct DemoOutput<'a> {
    pub report: &'a CleanupReport,
    pub host: &'a WorkloadSummary,
}

/// Machine-readable coordinator status
#[derive(Debug, Serialize)]
pub struct StatusOutput<'a> {
    pub status: &'a CleanupStatus,
    pub stats: &'a ResourceStats,
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::api::CleanupCoordinator;
    use crate::host::TrackedResource;
    use crate::resources::api::{ResourceCategory, ResourceHandle};

    #[test]
    fn test_status_table_lists_every_category() {
        let coordinator = CleanupCoordinator::new();
        coordinator.register(
            ResourceCategory::Textures,
            ResourceHandle::Texture(TrackedResource::new("sky")),
        );

        let rendered = status_table(&coordinator.cleanup_status(), false).to_string();

        assert_eq!(rendered.matches("clean").count(), 7);
        assert!(rendered.contains("NOT CLEAN"));
        assert!(rendered.contains("eventListeners"));
    }

    #[test]
    fn test_plain_tables_have_no_escape_codes() {
        let stats = CleanupCoordinator::new().resource_stats();
        let rendered = stats_table(&stats, false).to_string();
        assert!(!rendered.contains('\x1b'));
        assert!(rendered.contains("animationFrames"));
    }

    #[test]
    fn test_status_json_shape() {
        let coordinator = CleanupCoordinator::new();
        let status = coordinator.cleanup_status();
        let stats = coordinator.resource_stats();

        let json = to_json(&StatusOutput {
            status: &status,
            stats: &stats,
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"]["all_clean"], true);
        assert_eq!(value["stats"]["viewers"], 0);
        assert_eq!(value["status"]["categories"][0]["category"], "viewers");
    }
}
