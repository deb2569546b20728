//! Generic error handling utilities
//!
//! Provides unified error reporting for the CLI and configuration layer
//! while keeping module-specific error types.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on
    /// directly (bad config value, missing config file).
    ///
    /// IO failures and internal faults are system errors.
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors show their own message; system errors show the
/// operation context. Details are always emitted at debug level.
///
/// # Examples
/// ```rust,no_run
/// # use scenesweep::core::error_handling::log_error_with_context;
/// # use scenesweep::cleanup::api::ConfigError;
/// let err = ConfigError::Invalid { message: "gc_delay_ms must be a number".to_string() };
/// log_error_with_context(&err, "Configuration loading");
/// // Logs: "FATAL: gc_delay_ms must be a number"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Render a panic payload caught with `catch_unwind` as text
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
