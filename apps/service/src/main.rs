use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use logger::init_tracing;
use sitewatch::config::DEFAULT_CONFIG_PATH;
use sitewatch::{Config, ShutdownSignal, Supervisor};
use tracing::info;

/// Periodic website reachability monitor with Telegram alerts
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Configuration file (`.json` or `.toml`)
    #[arg(short, long, env = "SITEWATCH_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Validate the configuration, print it and exit without probing
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    let supervisor = Supervisor::from_config(&config).context("invalid configuration")?;

    if cli.check {
        print!("{config}");
        println!("Configuration OK, {} website(s) to monitor", supervisor.stats().len());
        return Ok(());
    }

    let shutdown = ShutdownSignal::install()?;
    info!(websites = supervisor.stats().len(), "Starting sitewatch");
    supervisor.run_until(shutdown.wait()).await;
    info!("Stopped");

    Ok(())
}
