//! Chart markers for signal flags.

use forecast_core::error::IndicatorError;
use forecast_core::types::PriceSeries;
use serde::{Deserialize, Serialize};

use crate::evaluator::SignalFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSide {
    Buy,
    Sell,
}

impl std::fmt::Display for SignalSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalSide::Buy => f.pad("BUY"),
            SignalSide::Sell => f.pad("SELL"),
        }
    }
}

/// A flagged bar, placed at its close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalMarker {
    pub index: usize,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub price: f64,
    pub side: SignalSide,
}

/// Pair each flagged index with its bar, in series order.
pub fn overlay(series: &PriceSeries, flags: &SignalFlags) -> Result<Vec<SignalMarker>, IndicatorError> {
    if flags.buy.len() != series.len() || flags.sell.len() != series.len() {
        return Err(IndicatorError::LengthMismatch {
            expected: series.len(),
            actual: flags.buy.len().max(flags.sell.len()),
        });
    }

    let markers = series
        .iter()
        .enumerate()
        .filter_map(|(index, bar)| {
            let side = if flags.buy[index] {
                SignalSide::Buy
            } else if flags.sell[index] {
                SignalSide::Sell
            } else {
                return None;
            };
            Some(SignalMarker {
                index,
                timestamp: bar.timestamp,
                price: bar.close,
                side,
            })
        })
        .collect();

    Ok(markers)
}
