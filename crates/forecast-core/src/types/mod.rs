//! Core data types for the forecasting system.

mod ohlcv;
mod timeframe;

pub use ohlcv::{Bar, PriceSeries};
pub use timeframe::Timeframe;
