//! Validate configuration command.

use anyhow::Result;
use forecast_config::AppConfig;
use std::path::Path;

pub async fn run(config: &AppConfig, config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {}", path.display()),
        None => println!("Validating built-in defaults (no configuration file)"),
    }

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    let params = config.forecast.parameters();
    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Symbol: {} ({})", config.data.symbol, config.data.timeframe);
    println!(
        "RSI/MACD windows: {} / {}-{}-{}",
        config.indicators.rsi,
        config.indicators.macd_fast,
        config.indicators.macd_slow,
        config.indicators.macd_signal
    );
    println!(
        "Signal thresholds: {} / {}",
        config.signals.oversold, config.signals.overbought
    );
    println!(
        "Forecast: {} paths x {} steps of {:.6}",
        params.simulation_count, params.horizon_steps, params.step_size
    );
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}
