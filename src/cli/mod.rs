//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Wikigen using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Wikigen - registry export for wiki generation
#[derive(Parser, Debug)]
#[command(name = "wikigen")]
#[command(version, about, long_about = None)]
#[command(author = "Wikigen Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "wikigen.toml", env = "WIKIGEN_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "WIKIGEN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every enabled registry and render images
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["wikigen", "export"]);
        assert_eq!(cli.config, "wikigen.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["wikigen", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["wikigen", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_export_only() {
        let cli = Cli::parse_from(["wikigen", "export", "--only", "items,block_images", "--dry-run"]);
        let Commands::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.only, vec!["items", "block_images"]);
        assert!(args.dry_run);
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["wikigen", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["wikigen", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
