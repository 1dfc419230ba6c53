mod catalog;
mod classifier;
mod config;
mod dedup;
mod error;
mod harvest;
mod tmdb;
mod web_server;

use crate::classifier::Classifier;
use crate::config::AppConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mcu_posters", about = "MCU poster dataset harvester and phase classifier demo")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the labeled poster dataset from TMDB
    Scrape,
    /// Serve the classifier demo UI
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::new()?;

    // Initialize env_logger based on config.log_level
    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    match cli.command {
        Command::Scrape => {
            info!("Starting poster harvest");
            harvest::run(&config).await?;
            info!("Poster harvest finished");
        }
        Command::Serve => {
            let classifier = Arc::new(Classifier::load(&config)?);
            if let Err(e) = web_server::start_web_server(Arc::new(config), classifier).await {
                log::error!("Web server error: {}", e);
            }
        }
    }

    Ok(())
}
