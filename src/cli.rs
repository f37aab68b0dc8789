//! CLI argument parsing and command dispatch

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;

use bulk_clone::output::OutputConfig;

use crate::commands;

/// Bulk Clone - Clone or update every repository of an org or user
#[derive(Parser, Debug)]
#[command(name = "bulk-clone")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone or update every repository of an org or user
    Clone(commands::clone::CloneArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level)?;
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Clone(args) => commands::clone::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Initializes `env_logger` at `level` for this crate. `RUST_LOG`, when
/// set, takes precedence.
fn init_logging(level: &str) -> Result<()> {
    let level = LevelFilter::from_str(level)
        .ok()
        .with_context(|| format!("Invalid log level {:?}", level))?;

    let mut builder = Builder::new();
    builder
        .filter(Some("bulk_clone"), level)
        .format_timestamp(None)
        .format_target(false);

    if let Ok(filter) = env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    }

    // A logger installed earlier in the same process is kept.
    let _ = builder.try_init();
    Ok(())
}
