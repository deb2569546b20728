//! Heap telemetry probes

use serde::Serialize;

const MIB: f64 = 1024.0 * 1024.0;

/// Heap usage at one point in time, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeapSnapshot {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub limit_bytes: u64,
}

impl HeapSnapshot {
    pub fn used_mb(&self) -> f64 {
        self.used_bytes as f64 / MIB
    }

    pub fn total_mb(&self) -> f64 {
        self.total_bytes as f64 / MIB
    }

    pub fn limit_mb(&self) -> f64 {
        self.limit_bytes as f64 / MIB
    }

    /// Used / limit as a percentage; zero when the limit is unknown
    pub fn usage_percent(&self) -> f64 {
        if self.limit_bytes == 0 {
            0.0
        } else {
            self.used_bytes as f64 / self.limit_bytes as f64 * 100.0
        }
    }
}

/// Source of heap telemetry. `None` means the platform exposes none.
pub trait HeapProbe: Send + Sync {
    fn snapshot(&self) -> Option<HeapSnapshot>;
}

/// Probe for platforms without telemetry
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedHeapProbe;

impl HeapProbe for UnsupportedHeapProbe {
    fn snapshot(&self) -> Option<HeapSnapshot> {
        None
    }
}

/// Reads the current process's memory footprint.
///
/// On Linux: resident set size as "used", virtual size as "total" and the
/// address-space rlimit (or physical memory when unlimited) as "limit".
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessHeapProbe;

impl HeapProbe for ProcessHeapProbe {
    #[cfg(target_os = "linux")]
    fn snapshot(&self) -> Option<HeapSnapshot> {
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        let (size_pages, resident_pages) = parse_statm(&statm)?;
        let page_size = page_size()?;

        Some(HeapSnapshot {
            used_bytes: resident_pages * page_size,
            total_bytes: size_pages * page_size,
            limit_bytes: address_space_limit().or_else(|| physical_memory(page_size))?,
        })
    }

    #[cfg(not(target_os = "linux"))]
    fn snapshot(&self) -> Option<HeapSnapshot> {
        None
    }
}

/// First two fields of /proc/self/statm: total and resident pages
fn parse_statm(contents: &str) -> Option<(u64, u64)> {
    let mut fields = contents.split_whitespace();
    let size = fields.next()?.parse().ok()?;
    let resident = fields.next()?.parse().ok()?;
    Some((size, resident))
}

#[cfg(target_os = "linux")]
fn page_size() -> Option<u64> {
    // SAFETY: sysconf has no preconditions
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    u64::try_from(size).ok().filter(|s| *s > 0)
}

#[cfg(target_os = "linux")]
fn physical_memory(page_size: u64) -> Option<u64> {
    // SAFETY: sysconf has no preconditions
    let pages = unsafe { libc::sysconf(libc::_SC_PHYS_PAGES) };
    u64::try_from(pages).ok().map(|p| p * page_size)
}

#[cfg(target_os = "linux")]
fn address_space_limit() -> Option<u64> {
    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: limit is a valid, writable rlimit
    let rc = unsafe { libc::getrlimit(libc::RLIMIT_AS, &mut limit) };
    if rc != 0 || limit.rlim_cur == libc::RLIM_INFINITY {
        return None;
    }
    Some(limit.rlim_cur as u64)
}
