//! Domain error types
//!
//! This module defines the error hierarchy for Wikigen.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Wikigen error type
///
/// This is the primary error type used throughout the application.
/// Setup failures (configuration, output cleanup, job start) travel through it
/// and abort the run; per-record and per-unit failures are logged instead.
#[derive(Debug, Error)]
pub enum WikigenError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Catalog (registry dataset) errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A job could not be started
    #[error("Job '{job}' failed to start: {message}")]
    JobStart { job: String, message: String },

    /// The output tree of a job could not be prepared
    #[error("Failed to prepare output directory {path}: {message}")]
    OutputCleanup { path: String, message: String },

    /// Rendering errors
    #[error("Render error: {0}")]
    Render(String),

    /// Image encoding/decoding errors
    #[error("Image error: {0}")]
    Image(String),

    /// Document export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// The run was stopped by a signal before every job finished
    #[error("Export interrupted after {ticks} ticks")]
    Interrupted { ticks: u64 },

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl WikigenError {
    /// Whether this error must abort the whole run rather than a single record
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WikigenError::Configuration(_)
                | WikigenError::Catalog(_)
                | WikigenError::JobStart { .. }
                | WikigenError::OutputCleanup { .. }
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for WikigenError {
    fn from(err: std::io::Error) -> Self {
        WikigenError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for WikigenError {
    fn from(err: serde_json::Error) -> Self {
        WikigenError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for WikigenError {
    fn from(err: toml::de::Error) -> Self {
        WikigenError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from image codec errors
impl From<image::ImageError> for WikigenError {
    fn from(err: image::ImageError) -> Self {
        WikigenError::Image(err.to_string())
    }
}
