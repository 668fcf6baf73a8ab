//! Resources command - refresh and list resources.

use anyhow::Result;
use azlens_core::{ObjectCategory, Resource};
use azlens_store::ListingScope;
use clap::Args;
use tracing::warn;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

use super::build_client;

/// Arguments for the resources command.
#[derive(Args)]
pub struct ResourcesArgs {
    /// Include directory objects in the listing.
    #[arg(long, short)]
    pub directory: bool,
}

/// Runs the resources command.
pub async fn run(args: &ResourcesArgs, cli: &Cli) -> Result<()> {
    let (_, client) = build_client()?;

    let report = client.refresh().await?;
    for warning in &report.warnings {
        warn!("{warning}");
    }
    if let Some(error) = &report.error {
        anyhow::bail!("refresh failed: {error}");
    }

    let mut listing: Vec<Resource> = client
        .cache()
        .listing(ListingScope::Resources)
        .await
        .unwrap_or_default();

    if args.directory {
        for category in ObjectCategory::ALL {
            if let Some(objects) = client
                .cache()
                .listing(ListingScope::Directory(category))
                .await
            {
                listing.extend(objects);
            }
        }
    }

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_resources(&listing));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&listing)?);
        }
    }

    Ok(())
}
