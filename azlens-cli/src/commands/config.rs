//! Config command - inspect and initialize configuration.

use anyhow::Result;
use azlens_store::Config;
use clap::{Args, Subcommand};

use crate::output::JsonFormatter;
use crate::Cli;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,
    /// Print the configuration file path.
    Path,
    /// Write the default configuration file.
    Init,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let config = Config::load()?;
            let formatter = JsonFormatter::new(true);
            println!("{}", formatter.format(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::default_path().display());
        }
        ConfigAction::Init => {
            let path = Config::default_path();
            Config::default().save_to(&path)?;
            if !cli.quiet {
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}
