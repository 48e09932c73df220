//! Configuration management for Wikigen.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Wikigen uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `WIKIGEN_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ExportConfig`] - Output root, catalog and assets locations
//! - [`ImagesConfig`] - Image sizes, supersampling and batch size
//! - [`HostConfig`] - Warm-up ticks and frame interval
//! - [`JobsConfig`] - Per-job enable flags
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [export]
//! output_dir = "wiki_output"
//! catalog = "${WIKIGEN_DATA}/catalog.json"
//!
//! [images]
//! batch_size = 10
//!
//! [jobs]
//! block_images = false
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ExportConfig, HostConfig, ImagesConfig, JobsConfig, LoggingConfig,
    WikigenConfig, JOB_KEYS,
};
