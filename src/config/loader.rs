//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::WikigenConfig;
use crate::domain::{Result, WikigenError};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into WikigenConfig
/// 4. Applies environment variable overrides (WIKIGEN_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use wikigen::config::loader::load_config;
///
/// let config = load_config("wikigen.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<WikigenConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(WikigenError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        WikigenError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from a TOML string
///
/// Performs the same substitution, overrides and validation as [`load_config`].
///
/// # Errors
///
/// Returns an error if parsing or validation fails
pub fn parse_config(contents: &str) -> Result<WikigenConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: WikigenConfig = toml::from_str(&contents)
        .map_err(|e| WikigenError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        WikigenError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied unchanged.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| WikigenError::Configuration(format!("Invalid substitution pattern: {}", e)))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(WikigenError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the WIKIGEN_* prefix
///
/// Variables follow the pattern WIKIGEN_<SECTION>_<KEY>, for example
/// WIKIGEN_EXPORT_OUTPUT_DIR or WIKIGEN_IMAGES_BATCH_SIZE. Values that fail to
/// parse are ignored.
fn apply_env_overrides(config: &mut WikigenConfig) {
    fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
        std::env::var(name).ok().and_then(|val| val.parse().ok())
    }

    // Application overrides
    if let Ok(val) = std::env::var("WIKIGEN_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("WIKIGEN_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("WIKIGEN_EXPORT_CATALOG") {
        config.export.catalog = val;
    }
    if let Ok(val) = std::env::var("WIKIGEN_EXPORT_ASSETS_DIR") {
        config.export.assets_dir = val;
    }
    if let Some(val) = parsed("WIKIGEN_EXPORT_WRITE_SUMMARY") {
        config.export.write_summary = val;
    }
    if let Some(val) = parsed("WIKIGEN_EXPORT_PRETTY") {
        config.export.pretty = val;
    }

    // Image overrides
    if let Some(val) = parsed("WIKIGEN_IMAGES_ITEM_SIZE") {
        config.images.item_size = val;
    }
    if let Some(val) = parsed("WIKIGEN_IMAGES_BLOCK_SIZE") {
        config.images.block_size = val;
    }
    if let Some(val) = parsed("WIKIGEN_IMAGES_BATCH_SIZE") {
        config.images.batch_size = val;
    }
    if let Some(val) = parsed("WIKIGEN_IMAGES_PROGRESS_LOG_INTERVAL") {
        config.images.progress_log_interval = val;
    }

    // Host overrides
    if let Some(val) = parsed("WIKIGEN_HOST_WARMUP_TICKS") {
        config.host.warmup_ticks = val;
    }
    if let Some(val) = parsed("WIKIGEN_HOST_FRAME_INTERVAL_MS") {
        config.host.frame_interval_ms = val;
    }

    // Logging overrides
    if let Some(val) = parsed("WIKIGEN_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val;
    }
    if let Ok(val) = std::env::var("WIKIGEN_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("WIKIGEN_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
