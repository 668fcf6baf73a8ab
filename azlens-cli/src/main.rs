// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! azlens CLI - Azure resource and cost inspection from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Refresh resource and directory listings, show counts
//! azlens refresh
//!
//! # Refresh and list resources
//! azlens resources
//!
//! # Cost report for the trailing 30 days
//! azlens costs
//!
//! # Cost report for an explicit range, with charts
//! azlens costs --from 2024-01-01 --to 2024-01-31 --chart
//!
//! # JSON output
//! azlens costs --format json --pretty
//!
//! # Manage configuration
//! azlens config show
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, costs, refresh, resources};

// ============================================================================
// CLI Definition
// ============================================================================

/// azlens CLI - Azure resource and cost inspection.
#[derive(Parser)]
#[command(name = "azlens")]
#[command(about = "Azure resource and cost inspection CLI")]
#[command(long_about = r#"
azlens lists Azure resources and directory objects and aggregates
Cost Management data, using your existing az CLI login.

Examples:
  azlens refresh                  # Refresh listings, show counts
  azlens resources                # Refresh and list resources
  azlens costs                    # Costs for the trailing 30 days
  azlens costs --days 7 --chart   # Last week, with bar charts
  azlens costs --format json      # JSON output
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Refresh resource and directory listings.
    #[command(visible_alias = "r")]
    Refresh(refresh::RefreshArgs),

    /// Refresh and list resources.
    #[command(visible_alias = "ls")]
    Resources(resources::ResourcesArgs),

    /// Show aggregated subscription costs.
    #[command(visible_alias = "c")]
    Costs(costs::CostsArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("azlens=debug,info")
    } else {
        EnvFilter::new("azlens=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Refresh(args) => refresh::run(args, &cli).await,
        Commands::Resources(args) => resources::run(args, &cli).await,
        Commands::Costs(args) => costs::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }

    Ok(())
}
