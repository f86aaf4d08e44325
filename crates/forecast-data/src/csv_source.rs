//! CSV data source.

use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, Trim};
use forecast_core::error::DataError;
use forecast_core::traits::DataSource;
use forecast_core::types::{Bar, PriceSeries, Timeframe};
use serde::Deserialize;
use tracing::{debug, warn};

/// CSV record format. Only the date and close columns are required.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Date",
        alias = "Datetime",
        alias = "datetime",
        alias = "timestamp",
        alias = "Timestamp",
        alias = "time"
    )]
    date: String,
    #[serde(alias = "Symbol", alias = "ticker", alias = "Ticker", default)]
    symbol: Option<String>,
    #[serde(alias = "Open", default)]
    open: Option<f64>,
    #[serde(alias = "High", default)]
    high: Option<f64>,
    #[serde(alias = "Low", default)]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "price", alias = "Price")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: Option<f64>,
}

impl CsvRecord {
    fn into_bar(self) -> Result<Bar, DataError> {
        let timestamp = parse_timestamp(&self.date)?;
        let close = self.close;
        Ok(Bar::new(
            timestamp,
            self.open.unwrap_or(close),
            self.high.unwrap_or(close),
            self.low.unwrap_or(close),
            close,
            self.volume.unwrap_or(0.0),
        ))
    }
}

/// Historical bars from a single CSV file.
///
/// The file may hold one instrument, or several with a symbol column; in
/// the latter case rows are filtered by the requested symbol.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn fetch_price_history(
        &self,
        symbol: &str,
        lookback: usize,
        interval: Timeframe,
    ) -> Result<PriceSeries, DataError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            DataError::ParseError(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        let bars = parse_bars(bytes.as_slice(), symbol)?;
        let total = bars.len();
        let series = PriceSeries::new(symbol, interval, bars)?.tail(lookback);

        debug!(
            path = %self.path.display(),
            symbol,
            rows = total,
            kept = series.len(),
            "loaded price history"
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Read bars for `symbol`, sorted by timestamp with duplicates removed.
fn parse_bars<R: Read>(input: R, symbol: &str) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let mut bars = Vec::new();
    let mut other_symbols = 0usize;

    for (row, result) in reader.deserialize::<CsvRecord>().enumerate() {
        let record = result.map_err(|e| DataError::ParseError(format!("row {}: {}", row + 1, e)))?;

        if let Some(row_symbol) = record.symbol.as_deref() {
            if !row_symbol.is_empty() && !row_symbol.eq_ignore_ascii_case(symbol) {
                other_symbols += 1;
                continue;
            }
        }

        bars.push(record.into_bar()?);
    }

    if bars.is_empty() && other_symbols > 0 {
        return Err(DataError::SymbolNotFound(symbol.to_string()));
    }

    // Stable, so among equal timestamps the later row stays last
    bars.sort_by_key(|b| b.timestamp);

    let (bars, duplicates) = dedupe_last_wins(bars);
    if duplicates > 0 {
        warn!(symbol, duplicates, "dropped rows with duplicate timestamps");
    }

    Ok(bars)
}

fn dedupe_last_wins(bars: Vec<Bar>) -> (Vec<Bar>, usize) {
    let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
    let mut duplicates = 0;

    for bar in bars {
        match out.last_mut() {
            Some(prev) if prev.timestamp == bar.timestamp => {
                *prev = bar;
                duplicates += 1;
            }
            _ => out.push(bar),
        }
    }

    (out, duplicates)
}

/// Parse a date, date-time or Unix timestamp into Unix milliseconds (UTC).
pub fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.timestamp_millis());
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
    ];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    if let Ok(ts) = date_str.parse::<i64>() {
        // Milliseconds past 10 digits, seconds otherwise
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}
