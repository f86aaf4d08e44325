//! Signals command implementation.

use anyhow::Result;
use forecast_config::AppConfig;
use forecast_indicators::compute_indicators;
use forecast_monitor::signal_report;
use forecast_signals::{evaluate_signals_with, overlay, replay, BacktestStats, SignalFlags, SignalMarker};
use serde::Serialize;
use tracing::info;

use super::{print_json, HistoryLoader};
use crate::cli::{OutputFormat, SignalsArgs};

#[derive(Serialize)]
struct SignalOutput<'a> {
    symbol: &'a str,
    flags: &'a SignalFlags,
    markers: &'a [SignalMarker],
    stats: &'a BacktestStats,
}

pub async fn run(args: SignalsArgs, config: &AppConfig, loader: &HistoryLoader) -> Result<()> {
    let series = loader.load(&args.data, config).await?;

    let mut thresholds = config.signals;
    if let Some(oversold) = args.oversold {
        thresholds.oversold = oversold;
    }
    if let Some(overbought) = args.overbought {
        thresholds.overbought = overbought;
    }

    let indicators = compute_indicators(&series, &config.indicators)?;
    let flags = evaluate_signals_with(&indicators, &thresholds)?;
    let markers = overlay(&series, &flags)?;
    let stats = replay(&series, &flags)?;

    info!(
        buys = flags.buy_indices().len(),
        sells = flags.sell_indices().len(),
        trades = stats.total_trades,
        "Signal evaluation complete"
    );

    match args.output {
        OutputFormat::Json => print_json(&SignalOutput {
            symbol: &series.symbol,
            flags: &flags,
            markers: &markers,
            stats: &stats,
        })?,
        OutputFormat::Text => println!("{}", signal_report(&series.symbol, &markers, &stats)),
    }

    Ok(())
}
