//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Wikigen configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let enabled: Vec<&str> = config
            .jobs
            .flags()
            .iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(name, _)| *name)
            .collect();

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Output Directory: {}", config.export.output_dir);
        println!("  Catalog: {}", config.export.catalog);
        println!("  Assets: {}", config.export.assets_dir);
        println!(
            "  Item Images: {}px ({}x supersampled)",
            config.images.item_size, config.images.item_supersample
        );
        println!(
            "  Block Images: {}px ({}x supersampled)",
            config.images.block_size, config.images.block_supersample
        );
        println!("  Batch Size: {}", config.images.batch_size);
        println!("  Warm-up Ticks: {}", config.host.warmup_ticks);
        println!("  Enabled Jobs: {}", enabled.join(", "));
        println!();
        Ok(0)
    }
}
