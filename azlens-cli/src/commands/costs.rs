//! Costs command - aggregated subscription or resource costs.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use azlens_core::{DateRange, Resource, UNKNOWN};
use azlens_query::normalize;
use clap::Args;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

use super::build_client;

/// Arguments for the costs command.
#[derive(Args)]
pub struct CostsArgs {
    /// Range start (YYYY-MM-DD); requires --to.
    #[arg(long)]
    pub from: Option<String>,

    /// Range end (YYYY-MM-DD); requires --from.
    #[arg(long)]
    pub to: Option<String>,

    /// Trailing number of days (ignored when --from/--to are given).
    #[arg(long, default_value = "30")]
    pub days: u64,

    /// Show bar charts for the daily and per-service breakdowns.
    #[arg(long)]
    pub chart: bool,

    /// Approximate costs for one resource (ARM id) via its resource group.
    #[arg(long)]
    pub resource_id: Option<String>,
}

impl CostsArgs {
    fn range(&self) -> Result<DateRange> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => {
                DateRange::new(from.clone(), to.clone()).context("invalid date range")
            }
            (None, None) => Ok(DateRange::trailing_days(self.days)),
            _ => bail!("--from and --to must be given together"),
        }
    }
}

/// Runs the costs command.
pub async fn run(args: &CostsArgs, cli: &Cli) -> Result<()> {
    let (_, client) = build_client()?;
    let range = args.range()?;

    match &args.resource_id {
        Some(id) => {
            let resource = resource_from_id(id)?;
            let detail = client.resource_costs(&resource, &range).await?;

            match cli.format {
                OutputFormat::Text => {
                    let formatter = TextFormatter::new(!cli.no_color);
                    println!("{}", formatter.format_resource_costs(&detail));
                }
                OutputFormat::Json => {
                    let formatter = JsonFormatter::new(cli.pretty);
                    println!("{}", formatter.format(&detail)?);
                }
            }
        }
        None => {
            let summary = client.subscription_costs(&range).await?;

            match cli.format {
                OutputFormat::Text => {
                    let formatter = TextFormatter::new(!cli.no_color);
                    println!("{}", formatter.format_costs(&summary, args.chart));
                }
                OutputFormat::Json => {
                    let formatter = JsonFormatter::new(cli.pretty);
                    println!("{}", formatter.format(&summary)?);
                }
            }
        }
    }

    Ok(())
}

/// Builds the minimal resource view the cost lookup needs from an ARM id.
fn resource_from_id(id: &str) -> Result<Resource> {
    let resource_group = normalize::resource_group_from_id(id)
        .context("resource id has no /resourceGroups/ segment")?;
    let name = id.rsplit('/').next().unwrap_or(UNKNOWN).to_string();

    Ok(Resource {
        id: id.to_string(),
        name,
        resource_type: UNKNOWN.to_string(),
        location: UNKNOWN.to_string(),
        resource_group,
        tags: HashMap::new(),
        properties: serde_json::Map::new(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(from: Option<&str>, to: Option<&str>, days: u64) -> CostsArgs {
        CostsArgs {
            from: from.map(ToString::to_string),
            to: to.map(ToString::to_string),
            days,
            chart: false,
            resource_id: None,
        }
    }

    #[test]
    fn test_explicit_range() {
        let range = args(Some("2024-01-01"), Some("2024-01-31"), 30)
            .range()
            .unwrap();
        assert_eq!(range.start, "2024-01-01");
        assert_eq!(range.end, "2024-01-31");
    }

    #[test]
    fn test_half_open_range_rejected() {
        assert!(args(Some("2024-01-01"), None, 30).range().is_err());
        assert!(args(None, Some("2024-01-31"), 30).range().is_err());
    }

    #[test]
    fn test_default_is_trailing_days() {
        assert!(args(None, None, 7).range().is_ok());
    }

    #[test]
    fn test_resource_from_id() {
        let resource = resource_from_id(
            "/subscriptions/x/resourceGroups/myRG/providers/Microsoft.Compute/virtualMachines/vm1",
        )
        .unwrap();
        assert_eq!(resource.resource_group, "myRG");
        assert_eq!(resource.name, "vm1");
    }

    #[test]
    fn test_resource_from_id_without_group() {
        assert!(resource_from_id("/subscriptions/x/providers/p").is_err());
    }
}
