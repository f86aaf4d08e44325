//! Indicators command implementation.

use anyhow::Result;
use forecast_config::AppConfig;
use forecast_indicators::{compute_indicators, IndicatorSet};
use forecast_monitor::indicator_report;
use serde::Serialize;

use super::{print_json, HistoryLoader};
use crate::cli::{IndicatorsArgs, OutputFormat};

#[derive(Serialize)]
struct IndicatorOutput<'a> {
    symbol: &'a str,
    timestamps: Vec<i64>,
    closes: Vec<f64>,
    indicators: &'a IndicatorSet,
}

pub async fn run(args: IndicatorsArgs, config: &AppConfig, loader: &HistoryLoader) -> Result<()> {
    let series = loader.load(&args.data, config).await?;
    let indicators = compute_indicators(&series, &config.indicators)?;

    match args.output {
        OutputFormat::Json => print_json(&IndicatorOutput {
            symbol: &series.symbol,
            timestamps: series.timestamps(),
            closes: series.closes(),
            indicators: &indicators,
        })?,
        OutputFormat::Text => println!("{}", indicator_report(&series, &indicators, args.tail)),
    }

    Ok(())
}
