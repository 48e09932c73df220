//! Configuration schema types
//!
//! This module defines the structure of `wikigen.toml`. Every section is
//! optional and falls back to the defaults below.

use crate::core::imaging::EmptyImagePolicy;
use serde::{Deserialize, Serialize};

/// Names accepted by `[jobs]` flags and `--only`, in registration order
pub const JOB_KEYS: [&str; 13] = [
    "items",
    "blocks",
    "block_states",
    "item_tags",
    "language",
    "configuration",
    "research",
    "research_trees",
    "research_effects",
    "citizen_names",
    "recipes",
    "item_images",
    "block_images",
];

/// Main Wikigen configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WikigenConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export locations and output format
    #[serde(default)]
    pub export: ExportConfig,

    /// Image rendering and post-processing
    #[serde(default)]
    pub images: ImagesConfig,

    /// Host loop timing
    #[serde(default)]
    pub host: HostConfig,

    /// Job selection
    #[serde(default)]
    pub jobs: JobsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WikigenConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.images.validate()?;
        self.host.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Export locations and document format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output root; removed and recreated on every run
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Catalog JSON file with the registries to export
    #[serde(default = "default_catalog")]
    pub catalog: String,

    /// Directory holding `<namespace>/textures/...png`
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,

    /// Write `summary.json` into the output root after the run
    #[serde(default = "default_true")]
    pub write_summary: bool,

    /// Pretty-print JSON documents
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            catalog: default_catalog(),
            assets_dir: default_assets_dir(),
            write_summary: true,
            pretty: true,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        if self.catalog.trim().is_empty() {
            return Err("export.catalog cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Image rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Side of a final item icon in pixels
    #[serde(default = "default_image_size")]
    pub item_size: u32,

    /// Item render size as a multiple of `item_size`
    #[serde(default = "default_item_supersample")]
    pub item_supersample: u32,

    /// Side of a final block state image in pixels
    #[serde(default = "default_image_size")]
    pub block_size: u32,

    /// Block render size as a multiple of `block_size`
    #[serde(default = "default_block_supersample")]
    pub block_supersample: u32,

    /// Work units drained per tick by each image job
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Completed units between progress log lines
    #[serde(default = "default_progress_log_interval")]
    pub progress_log_interval: usize,

    /// What to emit for a render without visible pixels
    #[serde(default)]
    pub empty_image: EmptyImagePolicy,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            item_size: default_image_size(),
            item_supersample: default_item_supersample(),
            block_size: default_image_size(),
            block_supersample: default_block_supersample(),
            batch_size: default_batch_size(),
            progress_log_interval: default_progress_log_interval(),
            empty_image: EmptyImagePolicy::default(),
        }
    }
}

impl ImagesConfig {
    fn validate(&self) -> Result<(), String> {
        if self.item_size == 0 || self.block_size == 0 {
            return Err("images.item_size and images.block_size must be greater than 0".to_string());
        }
        if self.item_supersample == 0 || self.block_supersample == 0 {
            return Err("images supersample factors must be greater than 0".to_string());
        }
        if self.item_size.saturating_mul(self.item_supersample) > 8192
            || self.block_size.saturating_mul(self.block_supersample) > 8192
        {
            return Err("images render size (size x supersample) cannot exceed 8192".to_string());
        }
        if self.batch_size == 0 || self.batch_size > 10_000 {
            return Err(format!(
                "images.batch_size must be between 1 and 10000, got {}",
                self.batch_size
            ));
        }
        if self.progress_log_interval == 0 {
            return Err("images.progress_log_interval must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Host loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Ticks to skip before the orchestrator starts the jobs
    #[serde(default = "default_warmup_ticks")]
    pub warmup_ticks: u64,

    /// Delay between ticks in milliseconds
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            warmup_ticks: default_warmup_ticks(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl HostConfig {
    fn validate(&self) -> Result<(), String> {
        if self.frame_interval_ms > 10_000 {
            return Err(format!(
                "host.frame_interval_ms cannot exceed 10000, got {}",
                self.frame_interval_ms
            ));
        }
        Ok(())
    }
}

/// Per-job enable flags
///
/// Disabled jobs are still registered as inactive so they show up in dry runs
/// and summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    #[serde(default = "default_true")]
    pub items: bool,
    #[serde(default = "default_true")]
    pub blocks: bool,
    #[serde(default = "default_true")]
    pub block_states: bool,
    #[serde(default = "default_true")]
    pub item_tags: bool,
    #[serde(default = "default_true")]
    pub language: bool,
    #[serde(default = "default_true")]
    pub configuration: bool,
    #[serde(default = "default_true")]
    pub research: bool,
    #[serde(default = "default_true")]
    pub research_trees: bool,
    #[serde(default = "default_true")]
    pub research_effects: bool,
    #[serde(default = "default_true")]
    pub citizen_names: bool,
    #[serde(default = "default_true")]
    pub recipes: bool,
    #[serde(default = "default_true")]
    pub item_images: bool,
    #[serde(default = "default_true")]
    pub block_images: bool,

    /// Mods whose configuration is never exported
    #[serde(default = "default_excluded_mods")]
    pub configuration_excluded_mods: Vec<String>,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            items: true,
            blocks: true,
            block_states: true,
            item_tags: true,
            language: true,
            configuration: true,
            research: true,
            research_trees: true,
            research_effects: true,
            citizen_names: true,
            recipes: true,
            item_images: true,
            block_images: true,
            configuration_excluded_mods: default_excluded_mods(),
        }
    }
}

impl JobsConfig {
    fn flag_mut(&mut self, key: &str) -> Option<&mut bool> {
        let flag = match key {
            "items" => &mut self.items,
            "blocks" => &mut self.blocks,
            "block_states" => &mut self.block_states,
            "item_tags" => &mut self.item_tags,
            "language" => &mut self.language,
            "configuration" => &mut self.configuration,
            "research" => &mut self.research,
            "research_trees" => &mut self.research_trees,
            "research_effects" => &mut self.research_effects,
            "citizen_names" => &mut self.citizen_names,
            "recipes" => &mut self.recipes,
            "item_images" => &mut self.item_images,
            "block_images" => &mut self.block_images,
            _ => return None,
        };
        Some(flag)
    }

    /// Enable flag of every job, in registration order
    pub fn flags(&self) -> [(&'static str, bool); 13] {
        [
            ("items", self.items),
            ("blocks", self.blocks),
            ("block_states", self.block_states),
            ("item_tags", self.item_tags),
            ("language", self.language),
            ("configuration", self.configuration),
            ("research", self.research),
            ("research_trees", self.research_trees),
            ("research_effects", self.research_effects),
            ("citizen_names", self.citizen_names),
            ("recipes", self.recipes),
            ("item_images", self.item_images),
            ("block_images", self.block_images),
        ]
    }

    /// Whether the job with `key` is enabled; unknown keys are disabled
    pub fn is_enabled(&self, key: &str) -> bool {
        self.flags()
            .iter()
            .any(|(name, enabled)| *name == key && *enabled)
    }

    /// Enable exactly the jobs named in `keys`
    ///
    /// # Errors
    ///
    /// Returns an error naming the first key that is not a known job
    pub fn restrict_to(&mut self, keys: &[String]) -> Result<(), String> {
        if let Some(unknown) = keys.iter().find(|key| !JOB_KEYS.contains(&key.as_str())) {
            return Err(format!(
                "Unknown job '{}'. Must be one of: {}",
                unknown,
                JOB_KEYS.join(", ")
            ));
        }
        for key in JOB_KEYS {
            if let Some(flag) = self.flag_mut(key) {
                *flag = keys.iter().any(|k| k == key);
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_dir() -> String {
    "wiki_output".to_string()
}

fn default_catalog() -> String {
    "catalog.json".to_string()
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_image_size() -> u32 {
    300
}

fn default_item_supersample() -> u32 {
    4
}

fn default_block_supersample() -> u32 {
    2
}

fn default_batch_size() -> usize {
    10
}

fn default_progress_log_interval() -> usize {
    100
}

fn default_warmup_ticks() -> u64 {
    20
}

fn default_frame_interval_ms() -> u64 {
    50
}

fn default_excluded_mods() -> Vec<String> {
    vec!["neoforge".to_string(), "jei".to_string()]
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: WikigenConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.images.item_size, 300);
        assert_eq!(config.images.item_supersample, 4);
        assert_eq!(config.images.block_supersample, 2);
        assert_eq!(config.images.batch_size, 10);
        assert_eq!(config.host.warmup_ticks, 20);
        assert_eq!(config.jobs.configuration_excluded_mods, vec!["neoforge", "jei"]);
        assert!(config.jobs.is_enabled("block_images"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = WikigenConfig::default();
        config.application.log_level = "loud".to_string();
        assert!(config.validate().unwrap_err().contains("log_level"));
    }

    #[test]
    fn test_invalid_batch_size() {
        let mut config = WikigenConfig::default();
        config.images.batch_size = 0;
        assert!(config.validate().unwrap_err().contains("batch_size"));
    }

    #[test]
    fn test_empty_image_policy_parses() {
        let config: WikigenConfig = toml::from_str("[images]\nempty_image = \"transparent\"").unwrap();
        assert_eq!(config.images.empty_image, EmptyImagePolicy::Transparent);
    }

    #[test]
    fn test_restrict_to() {
        let mut jobs = JobsConfig::default();
        jobs.restrict_to(&["items".to_string(), "block_images".to_string()])
            .unwrap();
        assert!(jobs.is_enabled("items"));
        assert!(jobs.is_enabled("block_images"));
        assert!(!jobs.is_enabled("language"));
        assert!(!jobs.is_enabled("research_trees"));
        assert!(!jobs.is_enabled("recipes"));
        assert!(JobsConfig::default().is_enabled("recipes"));
    }

    #[test]
    fn test_restrict_to_unknown_job() {
        let mut jobs = JobsConfig::default();
        let err = jobs.restrict_to(&["maps".to_string()]).unwrap_err();
        assert!(err.contains("Unknown job 'maps'"));
        assert!(jobs.is_enabled("items"));
    }
}
