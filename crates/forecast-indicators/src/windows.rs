//! Window parameters for the indicator engine.

use forecast_core::error::IndicatorError;
use serde::{Deserialize, Serialize};

/// Bollinger band parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerWindow {
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerWindow {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

/// Ichimoku periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IchimokuWindows {
    pub conversion: usize,
    pub base: usize,
    pub span_b: usize,
}

impl Default for IchimokuWindows {
    fn default() -> Self {
        Self {
            conversion: 9,
            base: 26,
            span_b: 52,
        }
    }
}

/// Which indicators to compute and with what windows.
///
/// RSI and MACD are always computed; EMA, Bollinger and Ichimoku are
/// optional overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorWindows {
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub ema: Vec<usize>,
    pub bollinger: Option<BollingerWindow>,
    pub ichimoku: Option<IchimokuWindows>,
}

impl Default for IndicatorWindows {
    fn default() -> Self {
        Self {
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ema: vec![20, 50],
            bollinger: Some(BollingerWindow::default()),
            ichimoku: None,
        }
    }
}

impl IndicatorWindows {
    /// Only the RSI and MACD lines the signal evaluator needs.
    pub fn signals_only() -> Self {
        Self {
            ema: Vec::new(),
            bollinger: None,
            ..Self::default()
        }
    }

    /// Check every window before any indicator is constructed.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let invalid = |msg: String| Err(IndicatorError::InvalidParameter(msg));

        if self.rsi == 0 {
            return invalid("RSI window must be greater than 0".into());
        }
        if self.macd_fast == 0 || self.macd_slow == 0 || self.macd_signal == 0 {
            return invalid("MACD periods must be greater than 0".into());
        }
        if self.macd_fast >= self.macd_slow {
            return invalid(format!(
                "MACD fast period ({}) must be less than slow period ({})",
                self.macd_fast, self.macd_slow
            ));
        }
        if self.ema.contains(&0) {
            return invalid("EMA periods must be greater than 0".into());
        }
        if let Some(bb) = &self.bollinger {
            if bb.period < 2 {
                return invalid("Bollinger period must be greater than 1".into());
            }
            if bb.std_dev.is_nan() || bb.std_dev <= 0.0 {
                return invalid("Bollinger std dev multiplier must be positive".into());
            }
        }
        if let Some(ich) = &self.ichimoku {
            if ich.conversion == 0 || ich.base == 0 || ich.span_b == 0 {
                return invalid("Ichimoku periods must be greater than 0".into());
            }
        }
        Ok(())
    }
}
