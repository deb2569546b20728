//! Memory usage diagnostics

use crate::memory::probe::{HeapProbe, HeapSnapshot};

/// Log a labelled memory snapshot, or that monitoring is unsupported.
/// Never fails; returns the snapshot that was logged.
pub fn log_memory_usage(probe: &dyn HeapProbe, label: &str) -> Option<HeapSnapshot> {
    match probe.snapshot() {
        Some(snapshot) => {
            log::info!("Memory status ({}):", label);
            for line in describe_snapshot(&snapshot) {
                log::info!("   {}", line);
            }
            Some(snapshot)
        }
        None => {
            log::info!("Memory status ({}): monitoring not supported", label);
            None
        }
    }
}

/// Human-readable lines for a snapshot, two decimals throughout
pub fn describe_snapshot(snapshot: &HeapSnapshot) -> Vec<String> {
    vec![
        format!("used: {:.2} MB", snapshot.used_mb()),
        format!("total: {:.2} MB", snapshot.total_mb()),
        format!("limit: {:.2} MB", snapshot.limit_mb()),
        format!("usage: {:.2}%", snapshot.usage_percent()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::probe::UnsupportedHeapProbe;

    struct Fixed(HeapSnapshot);

    impl HeapProbe for Fixed {
        fn snapshot(&self) -> Option<HeapSnapshot> {
            Some(self.0)
        }
    }

    #[test]
    fn test_describe_snapshot_formats_two_decimals() {
        let lines = describe_snapshot(&HeapSnapshot {
            used_bytes: 1536 * 1024,
            total_bytes: 3 * 1024 * 1024,
            limit_bytes: 12 * 1024 * 1024,
        });
        assert_eq!(
            lines,
            vec![
                "used: 1.50 MB",
                "total: 3.00 MB",
                "limit: 12.00 MB",
                "usage: 12.50%"
            ]
        );
    }

    #[test]
    fn test_log_memory_usage_returns_snapshot() {
        let snapshot = HeapSnapshot {
            used_bytes: 1,
            total_bytes: 2,
            limit_bytes: 4,
        };
        assert_eq!(log_memory_usage(&Fixed(snapshot), "before"), Some(snapshot));
        assert_eq!(log_memory_usage(&UnsupportedHeapProbe, "before"), None);
    }
}
