//! Build metadata shared by the library and the CLI.
//! Includes the generated version.rs from the build script.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Schema version stamped on serialized cleanup reports.
/// Falls back to a stable default if the build script could not read it.
pub fn report_schema_version() -> u32 {
    REPORT_SCHEMA_VERSION.parse().unwrap_or(20250727)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_metadata_is_populated() {
        assert!(report_schema_version() > 0);
        assert!(!build_time().is_empty());
        assert!(!git_hash().is_empty());
    }
}
