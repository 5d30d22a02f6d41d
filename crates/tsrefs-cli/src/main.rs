//! tsrefs CLI
//!
//! Synchronizes TypeScript project references across the packages of a
//! JavaScript monorepo.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cwd = std::env::current_dir()?;
    commands::run_sync(&cwd, &cli.sync)
}

/// Debug output with `--verbose`, otherwise `RUST_LOG` (default: warnings).
fn init_tracing(verbose: bool) -> Result<()> {
    let builder = FmtSubscriber::builder().with_writer(std::io::stderr);
    let result = if verbose {
        let subscriber = builder.with_max_level(Level::DEBUG).with_target(true).finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = builder.with_env_filter(filter).with_target(false).finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    result.map_err(|e| CliError::user(format!("failed to set tracing subscriber: {e}")))?;

    tracing::debug!("Verbose mode enabled");
    Ok(())
}
