//! Technical indicator engine.
//!
//! This crate provides the batch indicators used to annotate a price series:
//! - Moving averages (SMA, EMA, streaming EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volatility indicators (Standard Deviation, Bollinger Bands)
//! - Trend indicators (Ichimoku lines)
//!
//! [`compute_indicators`] runs a configured set of them over a
//! [`PriceSeries`](forecast_core::PriceSeries) and aligns every output to the
//! series, so index `i` of every line refers to bar `i`.

pub mod engine;
pub mod momentum;
pub mod moving_average;
pub mod trend;
pub mod volatility;
pub mod windows;

pub use engine::{compute_indicators, names, IndicatorSet};
pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, Sma, StreamingEma};
pub use trend::{Ichimoku, IchimokuLines};
pub use volatility::{BollingerBands, BollingerOutput, StdDev};
pub use windows::{BollingerWindow, IchimokuWindows, IndicatorWindows};
