//! RSI/MACD threshold signals.

use forecast_core::error::IndicatorError;
use forecast_indicators::{names, IndicatorSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// RSI levels that gate the signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    /// Buy only while RSI is strictly below this
    pub oversold: f64,
    /// Sell only while RSI is strictly above this
    pub overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl SignalThresholds {
    pub fn new(oversold: f64, overbought: f64) -> Self {
        Self {
            oversold,
            overbought,
        }
    }

    /// Require `0 <= oversold <= overbought <= 100`.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.oversold) || !in_range(self.overbought) {
            return Err(IndicatorError::InvalidParameter(format!(
                "RSI thresholds must lie in [0, 100], got {} and {}",
                self.oversold, self.overbought
            )));
        }
        if self.oversold > self.overbought {
            return Err(IndicatorError::InvalidParameter(format!(
                "oversold ({}) must not exceed overbought ({})",
                self.oversold, self.overbought
            )));
        }
        Ok(())
    }
}

/// Buy and sell flags aligned with the evaluated series.
///
/// Both flags are never true at the same index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalFlags {
    pub buy: Vec<bool>,
    pub sell: Vec<bool>,
}

impl SignalFlags {
    pub fn len(&self) -> usize {
        self.buy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buy.is_empty()
    }

    pub fn buy_indices(&self) -> Vec<usize> {
        indices(&self.buy)
    }

    pub fn sell_indices(&self) -> Vec<usize> {
        indices(&self.sell)
    }
}

fn indices(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(i, &flag)| flag.then_some(i))
        .collect()
}

/// Evaluate with the default 30/70 thresholds.
pub fn evaluate_signals(indicators: &IndicatorSet) -> Result<SignalFlags, IndicatorError> {
    evaluate_signals_with(indicators, &SignalThresholds::default())
}

/// Flag each index where RSI and the MACD histogram agree.
///
/// - buy: RSI < oversold and histogram > 0
/// - sell: RSI > overbought and histogram < 0
///
/// Indices where either input is undefined get both flags false.
pub fn evaluate_signals_with(
    indicators: &IndicatorSet,
    thresholds: &SignalThresholds,
) -> Result<SignalFlags, IndicatorError> {
    thresholds.validate()?;
    let rsi = indicators.require(names::RSI)?;
    let hist = indicators.require(names::MACD_HIST)?;

    let (buy, sell): (Vec<bool>, Vec<bool>) = rsi
        .iter()
        .zip(hist)
        .map(|pair| match pair {
            (Some(r), Some(h)) => (
                *r < thresholds.oversold && *h > 0.0,
                *r > thresholds.overbought && *h < 0.0,
            ),
            _ => (false, false),
        })
        .unzip();

    let flags = SignalFlags { buy, sell };
    debug!(
        points = flags.len(),
        buys = flags.buy.iter().filter(|b| **b).count(),
        sells = flags.sell.iter().filter(|s| **s).count(),
        "evaluated signals"
    );
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_with(rsi: Vec<Option<f64>>, hist: Vec<Option<f64>>) -> IndicatorSet {
        let mut set = IndicatorSet::new(rsi.len());
        set.insert(names::RSI, rsi).unwrap();
        set.insert(names::MACD_HIST, hist).unwrap();
        set
    }

    #[test]
    fn test_buy_and_sell_conditions() {
        let set = set_with(
            vec![Some(25.0), Some(75.0), Some(50.0), Some(25.0), Some(75.0)],
            vec![Some(0.5), Some(-0.5), Some(0.5), Some(-0.1), Some(0.1)],
        );
        let flags = evaluate_signals(&set).unwrap();

        assert_eq!(flags.buy, vec![true, false, false, false, false]);
        assert_eq!(flags.sell, vec![false, true, false, false, false]);
        assert_eq!(flags.buy_indices(), vec![0]);
        assert_eq!(flags.sell_indices(), vec![1]);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let set = set_with(
            vec![Some(30.0), Some(70.0), Some(50.0), Some(20.0)],
            vec![Some(1.0), Some(-1.0), Some(0.0), Some(0.0)],
        );
        let flags = evaluate_signals(&set).unwrap();

        assert!(flags.buy.iter().all(|b| !b));
        assert!(flags.sell.iter().all(|s| !s));
    }

    #[test]
    fn test_undefined_inputs_yield_false() {
        let set = set_with(
            vec![None, Some(10.0), Some(90.0)],
            vec![Some(1.0), None, None],
        );
        let flags = evaluate_signals(&set).unwrap();

        assert_eq!(flags.buy, vec![false, false, false]);
        assert_eq!(flags.sell, vec![false, false, false]);
        assert_eq!(flags.len(), 3);
    }

    #[test]
    fn test_never_both_flags() {
        let rsi: Vec<Option<f64>> = (0..101).map(|i| Some(i as f64)).collect();
        let hist: Vec<Option<f64>> = (0..101).map(|i| Some((i as f64 * 0.7).sin())).collect();
        let flags = evaluate_signals(&set_with(rsi, hist)).unwrap();

        for (b, s) in flags.buy.iter().zip(&flags.sell) {
            assert!(!(*b && *s));
        }
    }

    #[test]
    fn test_missing_lines() {
        let mut set = IndicatorSet::new(2);
        set.insert(names::RSI, vec![Some(10.0), Some(20.0)]).unwrap();

        assert_eq!(
            evaluate_signals(&set).unwrap_err(),
            IndicatorError::MissingIndicator(names::MACD_HIST.to_string())
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let set = set_with(vec![Some(35.0)], vec![Some(0.2)]);

        assert!(!evaluate_signals(&set).unwrap().buy[0]);
        let flags = evaluate_signals_with(&set, &SignalThresholds::new(40.0, 60.0)).unwrap();
        assert!(flags.buy[0]);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(SignalThresholds::default().validate().is_ok());
        assert!(SignalThresholds::new(80.0, 20.0).validate().is_err());
        assert!(SignalThresholds::new(-1.0, 70.0).validate().is_err());
        assert!(SignalThresholds::new(30.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_empty_set() {
        let flags = evaluate_signals(&set_with(vec![], vec![])).unwrap();
        assert!(flags.is_empty());
    }
}
