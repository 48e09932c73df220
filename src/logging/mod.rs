//! Logging and observability
//!
//! Structured logging through `tracing`, with:
//! - Console output
//! - JSON-formatted log files with rotation
//! - Level selection from configuration or `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use wikigen::logging::init_logging;
//! use wikigen::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(job = "Items Data", "Job started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a failed record inside a job without aborting it
///
/// # Example
///
/// ```no_run
/// use wikigen::log_record_failure;
/// use wikigen::domain::WikigenError;
///
/// let error = WikigenError::Export("disk full".to_string());
/// log_record_failure!("Items Data", "minecraft:stick", &error);
/// ```
#[macro_export]
macro_rules! log_record_failure {
    ($job:expr, $record:expr, $error:expr) => {
        tracing::warn!(
            job = %$job,
            record = %$record,
            error = %$error,
            "Record skipped"
        );
    };
}

/// Log batch progress of an affine job
///
/// # Example
///
/// ```no_run
/// use wikigen::log_batch_progress;
///
/// log_batch_progress!("Block Images", 100, 1000);
/// ```
#[macro_export]
macro_rules! log_batch_progress {
    ($job:expr, $current:expr, $total:expr) => {
        tracing::info!(
            job = %$job,
            completed = $current,
            total = $total,
            progress_pct = format!("{:.1}", $current as f64 / $total as f64 * 100.0),
            "Processing batch"
        );
    };
}
