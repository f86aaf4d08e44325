//! CLI command implementations.

pub mod forecast;
pub mod indicators;
pub mod signals;
pub mod validate;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use forecast_config::AppConfig;
use forecast_core::traits::DataSource;
use forecast_core::types::PriceSeries;
use forecast_data::{CachedDataSource, CsvDataSource};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::cli::DataArgs;

type CachedCsv = CachedDataSource<CsvDataSource>;

/// Price history for the life of the process: one cached CSV source per
/// file, each reusing fetched series for `data.cache_ttl_secs`.
pub struct HistoryLoader {
    ttl: Duration,
    sources: Mutex<HashMap<PathBuf, Arc<CachedCsv>>>,
}

impl HistoryLoader {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            ttl: Duration::from_secs(config.data.cache_ttl_secs),
            sources: Mutex::new(HashMap::new()),
        }
    }

    async fn source(&self, path: &Path) -> Result<Arc<CachedCsv>> {
        let mut sources = self.sources.lock().await;
        if let Some(source) = sources.get(path) {
            return Ok(Arc::clone(source));
        }
        if !path.exists() {
            anyhow::bail!("Data path '{}' does not exist", path.display());
        }
        let source = Arc::new(CachedDataSource::new(CsvDataSource::new(path)?, self.ttl));
        sources.insert(path.to_path_buf(), Arc::clone(&source));
        Ok(source)
    }

    /// Load price history, filling unset arguments from the `[data]` section.
    pub async fn load(&self, args: &DataArgs, config: &AppConfig) -> Result<PriceSeries> {
        let path = args
            .data
            .clone()
            .or_else(|| config.data.csv_path.clone())
            .context("Please provide a data file with --data or data.csv_path in the config")?;

        let symbol = args.symbol.as_deref().unwrap_or(&config.data.symbol);
        let lookback = args.lookback.unwrap_or(config.data.lookback);
        let timeframe = args.timeframe.unwrap_or(config.data.timeframe);

        let source = self.source(&path).await?;
        let series = source
            .fetch_price_history(symbol, lookback, timeframe)
            .await
            .with_context(|| format!("Failed to load {} from {}", symbol, path.display()))?;

        info!(
            symbol,
            bars = series.len(),
            timeframe = %timeframe,
            "Loaded price history"
        );
        Ok(series)
    }
}

/// Pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
