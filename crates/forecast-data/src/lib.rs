//! Price history sources.

mod cache;
mod csv_source;

pub use cache::CachedDataSource;
pub use csv_source::{parse_timestamp, CsvDataSource};

use std::path::Path;

use forecast_core::error::DataError;
use forecast_core::traits::DataSource;
use forecast_core::types::{PriceSeries, Timeframe};

/// Load the most recent `lookback` bars of `symbol` from a CSV file.
pub async fn load_csv(
    path: impl AsRef<Path>,
    symbol: &str,
    lookback: usize,
    interval: Timeframe,
) -> Result<PriceSeries, DataError> {
    let source = CsvDataSource::new(path)?;
    source.fetch_price_history(symbol, lookback, interval).await
}
