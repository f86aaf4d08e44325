//! Momentum indicators.

use forecast_core::traits::{Indicator, MultiOutputIndicator};
use serde::{Deserialize, Serialize};

use crate::moving_average::Ema;

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
///
/// Averages use Wilder's recursive smoothing (factor `1 / period`), seeded
/// with the simple average of the first `period` changes. The first value
/// lines up with input index `period`.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Calculate using Wilder's smoothing method.
    fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
        if values.len() < period {
            return vec![];
        }

        let mut result = Vec::with_capacity(values.len() - period + 1);
        let period_f64 = period as f64;

        let mut avg: f64 = values[..period].iter().sum::<f64>() / period_f64;
        result.push(avg);

        // avg = (prev_avg * (period-1) + value) / period
        for &value in &values[period..] {
            avg = (avg * (period_f64 - 1.0) + value) / period_f64;
            result.push(avg);
        }

        result
    }

    fn from_averages(gain: f64, loss: f64) -> f64 {
        if loss == 0.0 {
            100.0
        } else if gain == 0.0 {
            0.0
        } else {
            100.0 - (100.0 / (1.0 + gain / loss))
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.period {
            return vec![];
        }

        let (gains, losses): (Vec<f64>, Vec<f64>) = data
            .windows(2)
            .map(|pair| {
                let change = pair[1] - pair[0];
                if change > 0.0 {
                    (change, 0.0)
                } else {
                    (0.0, -change)
                }
            })
            .unzip();

        let avg_gains = Self::wilder_smooth(&gains, self.period);
        let avg_losses = Self::wilder_smooth(&losses, self.period);

        avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|(&gain, &loss)| Self::from_averages(gain, loss))
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }

    /// MACD line alone. The first value lines up with input index `slow - 1`.
    pub fn macd_line(&self, data: &[f64]) -> Vec<f64> {
        let fast_ema = Ema::new(self.fast_period).calculate(data);
        let slow_ema = Ema::new(self.slow_period).calculate(data);

        if slow_ema.is_empty() {
            return vec![];
        }

        // Fast EMA starts earlier; drop its extra head
        let offset = self.slow_period - self.fast_period;
        fast_ema[offset..]
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect()
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    /// Full outputs, first one at input index `slow + signal - 2`.
    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        let macd_line = self.macd_line(data);
        if macd_line.len() < self.signal_period {
            return vec![];
        }

        let signal_line = Ema::new(self.signal_period).calculate(&macd_line);

        let offset = self.signal_period - 1;
        macd_line[offset..]
            .iter()
            .zip(signal_line.iter())
            .map(|(&macd, &signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}
