//! Crypto forecasting CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::commands::HistoryLoader;
use cli::{Cli, Commands};
use forecast_config::load_config;
use forecast_monitor::setup_logging;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config_path();
    let config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration from environment".to_string(),
    })?;

    // Setup logging
    let log_level = cli
        .log_level
        .map(|level| level.as_str())
        .unwrap_or(config.logging.level.as_str());
    let json_logs = cli.json_logs || config.logging.format == "json";
    let _log_guard = setup_logging(log_level, json_logs, config.logging.file.as_deref())?;
    debug!(config = ?config_path, "Configuration loaded");

    let loader = HistoryLoader::new(&config);

    // Execute command
    match cli.command {
        Commands::Indicators(args) => cli::commands::indicators::run(args, &config, &loader).await,
        Commands::Forecast(args) => cli::commands::forecast::run(args, &config, &loader).await,
        Commands::Signals(args) => cli::commands::signals::run(args, &config, &loader).await,
        Commands::ValidateConfig => {
            cli::commands::validate::run(&config, config_path.as_deref()).await
        }
    }
}
