//! Resource Error Types

/// Failure reported by a host handle while one of its capabilities ran
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandleError {
    #[error("{operation} failed: {message}")]
    Failed { operation: String, message: String },

    #[error("handle already released")]
    Released,
}

impl HandleError {
    pub fn failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        HandleError::Failed {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Registry-level failures surfaced to the caller
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("target '{target}' cannot attach listeners")]
    ListenerUnsupported { target: String },

    #[error("attaching '{event}' listener to '{target}' failed: {source}")]
    ListenerAttach {
        target: String,
        event: String,
        #[source]
        source: HandleError,
    },
}

/// Result of invoking a host capability that exists
pub type HandleResult = Result<(), HandleError>;

/// Result type for registry operations
pub type ResourceResult<T> = Result<T, ResourceError>;
