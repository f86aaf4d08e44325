//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Timeframe;
use crate::error::DataError;

/// Compact OHLCV bar.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Create a bar where every price field is the close.
    ///
    /// Useful when only a close series is available.
    pub fn from_close(timestamp: i64, close: f64) -> Self {
        Self::new(timestamp, close, close, close, close, 0.0)
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Ordered, validated price history for one symbol.
///
/// Invariants: at least one bar, strictly increasing timestamps and
/// positive finite closes. Immutable once built; indicators index it by
/// position, so gaps in wall-clock time are tolerated. Deserialization goes
/// through [`PriceSeries::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceSeries")]
pub struct PriceSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Sampling interval of the bars
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

/// Unchecked wire form of a [`PriceSeries`].
#[derive(Deserialize)]
struct RawPriceSeries {
    symbol: String,
    timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl TryFrom<RawPriceSeries> for PriceSeries {
    type Error = DataError;

    fn try_from(raw: RawPriceSeries) -> Result<Self, Self::Error> {
        Self::new(raw.symbol, raw.timeframe, raw.bars)
    }
}

impl PriceSeries {
    /// Build a series, rejecting input that breaks the invariants.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<Self, DataError> {
        if bars.is_empty() {
            return Err(DataError::EmptySeries);
        }

        for (index, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() || bar.close <= 0.0 {
                return Err(DataError::InvalidClose {
                    index,
                    value: bar.close,
                });
            }
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(DataError::NonIncreasingTimestamp { index });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        })
    }

    /// Build a series from bare closes, stamping them one interval apart.
    pub fn from_closes(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        closes: &[f64],
    ) -> Result<Self, DataError> {
        let step = timeframe.as_millis() as i64;
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar::from_close(i as i64 * step, close))
            .collect();
        Self::new(symbol, timeframe, bars)
    }

    /// Get the number of bars. Never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; kept for API symmetry with collections.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Get the most recent bar.
    pub fn last(&self) -> &Bar {
        // Non-empty by construction.
        &self.bars[self.bars.len() - 1]
    }

    /// Most recent close, the starting price for a forecast.
    pub fn last_close(&self) -> f64 {
        self.last().close
    }

    /// Keep only the most recent `n` bars.
    pub fn tail(&self, n: usize) -> Self {
        let start = self.bars.len().saturating_sub(n.max(1));
        Self {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            bars: self.bars[start..].to_vec(),
        }
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Extract timestamps as a vector.
    pub fn timestamps(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}
