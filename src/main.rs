use clap::Parser;
use cleaners::{MoviesCleaner, SeriesCleaner};
use cli::Cli;
use config::Config;
use log::warn;

mod cleaners;
mod cli;
mod config;
mod error;
mod http;
mod logging;
mod policy;
mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::setup_logging(args.log_level.clone())?;

    let config = match &args.config {
        Some(path) => Config::load(path).await?,
        None => Config::from_cli(&args)?,
    };

    let movies_cleaner = MoviesCleaner::from_config(&config)?;
    let series_cleaner = SeriesCleaner::from_config(&config)?;

    if config.dry_run {
        warn!("dry run is enabled, logs will appear destructive but NO actions will be taken");
    }

    logging::section("PROCESSING MOVIES");
    movies_cleaner.purge().await?;

    logging::section("PROCESSING TV SERIES");
    series_cleaner.purge().await?;

    Ok(())
}
