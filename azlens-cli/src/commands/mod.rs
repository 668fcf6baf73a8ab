//! CLI command implementations.

pub mod config;
pub mod costs;
pub mod refresh;
pub mod resources;

use anyhow::{Context, Result, bail};
use azlens_fetch::AzCliRunner;
use azlens_query::AzureClient;
use azlens_store::Config;

/// Loads configuration, verifying az is installed.
pub fn load_config() -> Result<Config> {
    if !AzCliRunner::new().command_exists("az") {
        bail!("the Azure CLI ('az') is not installed or not on PATH");
    }

    Config::load().context("failed to load configuration")
}

/// Loads configuration and builds the engine.
pub fn build_client() -> Result<(Config, AzureClient)> {
    let config = load_config()?;
    let client = AzureClient::from_config(&config);
    Ok((config, client))
}
