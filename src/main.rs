// Wikigen - Registry export for wiki generation
// Copyright (c) 2025 Wikigen Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use tokio::sync::watch;
use wikigen::cli::{Cli, Commands};
use wikigen::config::{load_config, LoggingConfig};
use wikigen::logging::init_logging;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // File logging follows the configuration when it loads; console only otherwise
    let logging_config = load_config(&cli.config)
        .map(|config| config.logging)
        .unwrap_or_else(|_| LoggingConfig {
            local_enabled: false,
            ..LoggingConfig::default()
        });
    let log_level = cli.log_level.as_deref().unwrap_or("info");
    let guard = match init_logging(log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Wikigen - Registry export for wiki generation"
    );

    // Immediate jobs run on the worker threads; the main thread ticks the scheduler
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("wikigen-worker")
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            process::exit(5);
        }
    };

    let (interrupt_tx, interrupt_rx) = watch::channel(false);
    runtime.spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received SIGINT (Ctrl+C), stopping export...");
                println!("\n⚠️  Shutdown signal received, stopping export...");
                let _ = interrupt_tx.send(true);
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C"),
        }
    });

    let result = match &cli.command {
        Commands::Export(args) => args.execute(&cli.config, runtime.handle(), interrupt_rx),
        Commands::ValidateConfig(args) => runtime.block_on(args.execute(&cli.config)),
        Commands::Init(args) => runtime.block_on(args.execute()),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // process::exit skips destructors; flush file logs first
    drop(guard);
    process::exit(exit_code);
}
