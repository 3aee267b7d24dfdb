// src/main.rs

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::debug;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    // Logs go to stderr so stdout only carries plans and descriptors
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Resolve {
            manifest,
            catalog,
            prefer,
            format,
            output,
        } => commands::cmd_resolve(
            &manifest,
            catalog.as_deref(),
            prefer.into(),
            format,
            output.as_deref(),
        ),
        Commands::Validate { manifest } => commands::cmd_validate(&manifest),
        Commands::Normalize { manifest, format } => commands::cmd_normalize(&manifest, format),
        Commands::Batch {
            manifests,
            catalog,
            prefer,
        } => commands::cmd_batch(&manifests, &catalog, prefer.into()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("larder {}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Single-line diagnostic: error kind followed by field or dependency
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
