//! TOML configuration file loading
//!
//! Top-level keys configure logging; the `[cleanup]` table configures the
//! coordinator:
//!
//! ```toml
//! log-level = "debug"
//! log-format = "ext"
//! log-file = "none"
//! color = false
//!
//! [cleanup]
//! gc_delay_ms = 100
//! verify_delay_ms = 200
//! log_memory = true
//! ```

use std::path::{Path, PathBuf};

use crate::app::cli::Args;
use crate::cleanup::api::{CleanupConfig, ConfigError, ConfigResult};

/// Effective settings after merging file and command line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<PathBuf>,
    pub color: Option<bool>,
    pub cleanup: CleanupConfig,
}

/// `<config dir>/Scenesweep/scenesweep.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Scenesweep").join("scenesweep.toml"))
}

/// Read the configuration table.
///
/// An explicit path must exist; the default path is optional.
pub async fn load_config_table(explicit: Option<&Path>) -> ConfigResult<Option<toml::Table>> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                log::debug!("No configuration file found; using defaults");
                return Ok(None);
            }
        },
    };

    log::debug!("Loading configuration from {}", path.display());
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
    let table = toml::from_str::<toml::Table>(&contents)
        .map_err(|source| ConfigError::Parse { source })?;
    Ok(Some(table))
}

impl Settings {
    /// Apply top-level keys and the `[cleanup]` table
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> ConfigResult<()> {
        if let Some(log_level) = config.get("log-level").and_then(|v| v.as_str()) {
            self.log_level = Some(log_level.to_string());
        }
        if let Some(log_format) = config.get("log-format").and_then(|v| v.as_str()) {
            self.log_format = Some(log_format.to_string());
        }
        if let Some(log_file) = config.get("log-file").and_then(|v| v.as_str()) {
            // "none" and "-" disable file logging
            self.log_file = if log_file.eq_ignore_ascii_case("none") || log_file == "-" {
                None
            } else {
                Some(PathBuf::from(log_file))
            };
        }
        if let Some(color) = config.get("color").and_then(|v| v.as_bool()) {
            self.color = Some(color);
        }
        self.cleanup = CleanupConfig::from_table(config)?;
        Ok(())
    }

    /// Command-line values win over file values
    pub fn apply_args(&mut self, args: &Args) -> ConfigResult<()> {
        if args.log_level.is_some() {
            self.log_level = args.log_level.clone();
        }
        if args.log_format.is_some() {
            self.log_format = args.log_format.clone();
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = Some(log_file.clone());
        }
        if let Some(color) = args.color_choice() {
            self.color = Some(color);
        }
        if let Some(ms) = args.gc_delay_ms {
            self.cleanup.gc_delay_ms = ms;
        }
        if let Some(ms) = args.verify_delay_ms {
            self.cleanup.verify_delay_ms = ms;
        }
        self.cleanup.validate()
    }

    /// Load the file named by `args` (or the default one) and merge `args`
    pub async fn load(args: &Args) -> ConfigResult<Self> {
        let mut settings = Settings::default();
        if let Some(table) = load_config_table(args.config_file.as_deref()).await? {
            settings.apply_toml_values(&table)?;
        }
        settings.apply_args(args)?;
        Ok(settings)
    }
}
