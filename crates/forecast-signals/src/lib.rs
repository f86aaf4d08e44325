//! Signal evaluation and flag replay.
//!
//! Combines RSI and the MACD histogram from an [`IndicatorSet`] into
//! per-index buy/sell flags, then overlays or replays those flags against
//! the price history they were computed from.
//!
//! [`IndicatorSet`]: forecast_indicators::IndicatorSet

mod evaluator;
mod overlay;
mod statistics;

pub use evaluator::{evaluate_signals, evaluate_signals_with, SignalFlags, SignalThresholds};
pub use overlay::{overlay, SignalMarker, SignalSide};
pub use statistics::{replay, BacktestStats, TradeRecord};
