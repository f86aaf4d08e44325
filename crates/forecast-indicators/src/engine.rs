//! Indicator engine: runs a configured set of indicators over a price series.

use std::collections::{BTreeMap, BTreeSet};

use forecast_core::error::IndicatorError;
use forecast_core::traits::{pad_leading, Indicator, MultiOutputIndicator};
use forecast_core::types::PriceSeries;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::momentum::{Macd, Rsi};
use crate::moving_average::Ema;
use crate::trend::Ichimoku;
use crate::volatility::BollingerBands;
use crate::windows::IndicatorWindows;

/// Indicator line names used as keys in an [`IndicatorSet`].
pub mod names {
    pub const RSI: &str = "RSI";
    pub const MACD: &str = "MACD";
    pub const MACD_SIGNAL: &str = "MACD_signal";
    pub const MACD_HIST: &str = "MACD_hist";
    pub const BB_UPPER: &str = "BB_upper";
    pub const BB_MIDDLE: &str = "BB_middle";
    pub const BB_LOWER: &str = "BB_lower";
    pub const ICHIMOKU_TENKAN: &str = "ICHIMOKU_tenkan";
    pub const ICHIMOKU_KIJUN: &str = "ICHIMOKU_kijun";
    pub const ICHIMOKU_SENKOU_A: &str = "ICHIMOKU_senkou_a";
    pub const ICHIMOKU_SENKOU_B: &str = "ICHIMOKU_senkou_b";

    /// Key for an EMA line, e.g. `EMA50`.
    pub fn ema(period: usize) -> String {
        format!("EMA{}", period)
    }
}

/// Named indicator lines, each aligned one-to-one with a price series.
///
/// `None` marks an index where the indicator's warm-up window is not yet
/// satisfied. Deserialized sets are length-checked like [`IndicatorSet::insert`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawIndicatorSet")]
pub struct IndicatorSet {
    len: usize,
    lines: BTreeMap<String, Vec<Option<f64>>>,
}

#[derive(Deserialize)]
struct RawIndicatorSet {
    len: usize,
    lines: BTreeMap<String, Vec<Option<f64>>>,
}

impl TryFrom<RawIndicatorSet> for IndicatorSet {
    type Error = IndicatorError;

    fn try_from(raw: RawIndicatorSet) -> Result<Self, Self::Error> {
        let mut set = IndicatorSet::new(raw.len);
        for (name, values) in raw.lines {
            set.insert(name, values)?;
        }
        Ok(set)
    }
}

impl IndicatorSet {
    /// Create an empty set for a series of `len` points.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            lines: BTreeMap::new(),
        }
    }

    /// Add or replace a line. Its length must match the series.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), IndicatorError> {
        if values.len() != self.len {
            return Err(IndicatorError::LengthMismatch {
                expected: self.len,
                actual: values.len(),
            });
        }
        self.lines.insert(name.into(), values);
        Ok(())
    }

    /// Number of points every line is aligned to.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get a line by name.
    pub fn get(&self, name: &str) -> Option<&[Option<f64>]> {
        self.lines.get(name).map(Vec::as_slice)
    }

    /// Get a line by name, or an error naming what is missing.
    pub fn require(&self, name: &str) -> Result<&[Option<f64>], IndicatorError> {
        self.get(name)
            .ok_or_else(|| IndicatorError::MissingIndicator(name.to_string()))
    }

    /// Value of a line at an index, `None` if absent or undefined.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.get(name)?.get(index).copied().flatten()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lines.contains_key(name)
    }

    /// Line names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lines.keys().map(String::as_str)
    }

    /// Iterate over `(name, line)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.lines.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Index of the first defined value of a line.
    pub fn first_defined(&self, name: &str) -> Option<usize> {
        self.get(name)?.iter().position(Option::is_some)
    }
}

fn split<T: Copy>(outputs: &[Option<T>], f: impl Fn(T) -> f64) -> Vec<Option<f64>> {
    outputs.iter().map(|o| o.map(&f)).collect()
}

/// Compute every configured indicator over `series`.
///
/// A series shorter than an indicator's window yields an all-`None` line
/// for that indicator rather than an error; only invalid windows fail.
pub fn compute_indicators(
    series: &PriceSeries,
    windows: &IndicatorWindows,
) -> Result<IndicatorSet, IndicatorError> {
    windows.validate()?;

    let closes = series.closes();
    let len = closes.len();
    let mut set = IndicatorSet::new(len);

    set.insert(names::RSI, Rsi::new(windows.rsi).calculate_aligned(&closes))?;

    let macd = Macd::with_periods(windows.macd_fast, windows.macd_slow, windows.macd_signal);
    set.insert(names::MACD, pad_leading(macd.macd_line(&closes), len))?;
    let macd_outputs = macd.calculate_aligned(&closes);
    set.insert(names::MACD_SIGNAL, split(&macd_outputs, |o| o.signal))?;
    set.insert(names::MACD_HIST, split(&macd_outputs, |o| o.histogram))?;

    let ema_periods: BTreeSet<usize> = windows.ema.iter().copied().collect();
    for period in ema_periods {
        set.insert(names::ema(period), Ema::new(period).calculate_aligned(&closes))?;
    }

    if let Some(bb) = &windows.bollinger {
        let bands = BollingerBands::with_params(bb.period, bb.std_dev).calculate_aligned(&closes);
        set.insert(names::BB_UPPER, split(&bands, |b| b.upper))?;
        set.insert(names::BB_MIDDLE, split(&bands, |b| b.middle))?;
        set.insert(names::BB_LOWER, split(&bands, |b| b.lower))?;
    }

    if let Some(ich) = &windows.ichimoku {
        let lines = Ichimoku::with_periods(ich.conversion, ich.base, ich.span_b)
            .calculate_hl(&series.highs(), &series.lows());
        set.insert(names::ICHIMOKU_TENKAN, lines.tenkan)?;
        set.insert(names::ICHIMOKU_KIJUN, lines.kijun)?;
        set.insert(names::ICHIMOKU_SENKOU_A, lines.senkou_a)?;
        set.insert(names::ICHIMOKU_SENKOU_B, lines.senkou_b)?;
    }

    debug!(
        symbol = %series.symbol,
        points = len,
        lines = set.lines.len(),
        "computed indicators"
    );

    Ok(set)
}
