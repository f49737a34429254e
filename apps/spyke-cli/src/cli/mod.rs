use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use spyke_store::SpykeConfig;
use tracing::debug;

mod cart;
mod draft;

#[derive(Debug, Parser)]
#[command(name = "spyke", about = "Spyke marketplace client", version, long_about = None)]
pub(crate) struct Cli {
    /// Config file to use instead of the platform spyke.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and edit the local cart.
    Cart(cart::CartCommand),
    /// Validate or save product drafts.
    Draft(draft::DraftCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> anyhow::Result<()> {
        let config = SpykeConfig::load(self.config).context("failed to load configuration")?;
        debug!(
            storage_dir = ?config.storage_dir(),
            api = %config.api.base_url,
            "Configuration loaded"
        );

        match self.command {
            Commands::Cart(command) => cart::run(command, &config),
            Commands::Draft(command) => draft::run(command, &config).await,
        }
    }
}
