//! Refresh command - refresh listings and show counts.

use anyhow::Result;
use azlens_query::AzureClient;
use clap::Args;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

use super::load_config;

/// Arguments for the refresh command.
#[derive(Args)]
pub struct RefreshArgs {
    /// Skip directory objects (apps, users, groups, role assignments).
    #[arg(long)]
    pub no_directory: bool,
}

/// Runs the refresh command.
pub async fn run(args: &RefreshArgs, cli: &Cli) -> Result<()> {
    let mut config = load_config()?;
    if args.no_directory {
        config.general.include_directory_objects = false;
    }

    let client = AzureClient::from_config(&config);

    info!(
        directory_objects = config.general.include_directory_objects,
        "Refreshing"
    );
    let report = client.refresh().await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_refresh(&report));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&report)?);
        }
    }

    Ok(())
}
