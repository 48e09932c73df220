//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "wikigen.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Wikigen configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point [export] catalog and assets_dir at your data");
                println!("  2. Validate configuration: wikigen validate-config");
                println!("  3. Run export: wikigen export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate the sample configuration
    fn generate_config() -> String {
        r#"# Wikigen Configuration File
# Registry export for wiki generation

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

# ============================================================================
# Export Settings
# ============================================================================
[export]
# Output root; every job's subdirectory is removed before it starts
output_dir = "wiki_output"

# Catalog JSON with items, blocks, tags, translations, configs and research
# Environment variables can be referenced as ${VAR_NAME}
catalog = "catalog.json"

# Directory holding <namespace>/textures/<path>.png
assets_dir = "assets"

# Write summary.json into the output root
write_summary = true

# Pretty-print JSON documents
pretty = true

# ============================================================================
# Image Settings
# ============================================================================
[images]
# Final icon size in pixels
item_size = 300
block_size = 300

# Render size as a multiple of the final size
item_supersample = 4
block_supersample = 2

# Work units drained per tick
batch_size = 10

# Completed units between progress log lines
progress_log_interval = 100

# Renders without visible pixels: passthrough | transparent
empty_image = "passthrough"

# ============================================================================
# Host Loop
# ============================================================================
[host]
# Ticks before the jobs start
warmup_ticks = 20

# Delay between ticks in milliseconds
frame_interval_ms = 50

# ============================================================================
# Jobs
# ============================================================================
[jobs]
items = true
blocks = true
block_states = true
item_tags = true
language = true
configuration = true
research = true
research_trees = true
research_effects = true
citizen_names = true
recipes = true
item_images = true
block_images = true

# Mods whose configuration is never exported
configuration_excluded_mods = ["neoforge", "jei"]

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local file logging
local_enabled = true

# Local log directory
local_path = "logs"

# Log rotation: daily, hourly, never
local_rotation = "daily"
"#
        .to_string()
    }
}
