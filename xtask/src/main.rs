//! Relief workspace dev tasks.
//!
//! # Commands
//!
//! - `cargo xtask check` - Run all quality checks
//! - `cargo xtask ci` - Full CI suite (same checks, hard failure)
//! - `cargo xtask fmt` - Format the whole workspace in place

mod check;
mod fmt;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Relief dev tasks
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Dev tasks for the relief workspace", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all quality checks across the workspace
    Check {
        /// Run in CI mode (stricter, fails on any issue)
        #[arg(long)]
        ci: bool,
    },

    /// Run full CI suite (same as the hosted pipeline)
    Ci,

    /// Format the whole workspace in place
    Fmt,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { ci } => check::run(ci),
        Commands::Ci => check::run_ci(),
        Commands::Fmt => fmt::run(),
    }
}
