//! Cleanup configuration errors

use std::path::PathBuf;

use crate::core::error_handling::ContextualError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    Invalid { message: String },
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ConfigError::Read { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { message } => Some(message),
            ConfigError::NotFound { .. } => Some("The specified configuration file does not exist"),
            ConfigError::Parse { .. } => Some("The configuration file is not valid TOML"),
            ConfigError::Read { .. } => None,
        }
    }
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
