//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Console output on stderr
//! - JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use hattori::logging::init_logging;
//! use hattori::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the completion of a target
///
/// # Example
///
/// ```no_run
/// use hattori::log_target_complete;
/// use std::time::Duration;
///
/// log_target_complete!("users", 42, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_target_complete {
    ($name:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            anonymizer = %$name,
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Anonymization of target completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use hattori::log_error_with_context;
/// use hattori::domain::HattoriError;
///
/// let error = HattoriError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a processed page
///
/// # Example
///
/// ```no_run
/// use hattori::log_batch_processing;
///
/// log_batch_processing!(3, 10);
/// ```
#[macro_export]
macro_rules! log_batch_processing {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = ($current as f64 / $total as f64 * 100.0),
            "Processed page"
        );
    };
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    #[test]
    fn test_macros_expand() {
        let error = crate::domain::HattoriError::Validation("bad".to_string());
        crate::log_error_with_context!(&error, "context");
        crate::log_batch_processing!(1usize, 4usize);
        crate::log_target_complete!("users", 10usize, Duration::from_millis(5));
    }
}
