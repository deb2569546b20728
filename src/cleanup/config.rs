//! Cleanup pass configuration
//!
//! Read from the `[cleanup]` table of the TOML config file:
//!
//! ```toml
//! [cleanup]
//! gc_delay_ms = 100      # wait before the second collection request
//! verify_delay_ms = 200  # wait before the post-cleanup status check
//! log_memory = true      # log heap snapshots before and after the pass
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cleanup::error::{ConfigError, ConfigResult};

/// Upper bound for either delay; longer waits only stall shutdown
pub const MAX_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanupConfig {
    pub gc_delay_ms: u64,
    pub verify_delay_ms: u64,
    pub log_memory: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            gc_delay_ms: 100,
            verify_delay_ms: 200,
            log_memory: true,
        }
    }
}

impl CleanupConfig {
    /// No suspension points at all; used by tests and hosts with
    /// deterministic collection
    pub fn immediate() -> Self {
        Self {
            gc_delay_ms: 0,
            verify_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn gc_delay(&self) -> Duration {
        Duration::from_millis(self.gc_delay_ms)
    }

    pub fn verify_delay(&self) -> Duration {
        Duration::from_millis(self.verify_delay_ms)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (key, value) in [
            ("gc_delay_ms", self.gc_delay_ms),
            ("verify_delay_ms", self.verify_delay_ms),
        ] {
            if value > MAX_DELAY_MS {
                return Err(ConfigError::Invalid {
                    message: format!("{} must be at most {} (got {})", key, MAX_DELAY_MS, value),
                });
            }
        }
        Ok(())
    }

    /// Extract and validate the `[cleanup]` table; defaults when absent
    pub fn from_table(config: &toml::Table) -> ConfigResult<Self> {
        let parsed = match config.get("cleanup") {
            None => Self::default(),
            Some(value) => value
                .clone()
                .try_into::<CleanupConfig>()
                .map_err(|e| ConfigError::Invalid {
                    message: format!("invalid [cleanup] section: {}", e.message()),
                })?,
        };
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let table = contents
            .parse::<toml::Table>()
            .map_err(|source| ConfigError::Parse { source })?;
        Self::from_table(&table)
    }
}
