// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! anitrack - seasonal anime tracker.
//!
//! This is the binary entry point.

mod providers;
mod scheduler;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// anitrack - seasonal anime tracker.
#[derive(Parser, Debug)]
#[command(name = "anitrack", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway and the refresh scheduler (default).
    Serve,
    /// Refresh every catalog source once and exit.
    Scan,
    /// List the built-in providers and which ones are configured.
    Plugins,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => anitrack_config::load_and_validate_path(path),
        None => anitrack_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            anitrack_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Scan => serve::run_scan(config).await,
        Commands::Plugins => {
            serve::run_plugins(&config);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("anitrack: {e}");
        std::process::exit(1);
    }
}
