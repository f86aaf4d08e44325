//! Moving average indicators.

use forecast_core::traits::{Indicator, StreamingIndicator};

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len() - self.period + 1);
        let period_f64 = self.period as f64;

        let mut sum: f64 = data[..self.period].iter().sum();
        result.push(sum / period_f64);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result.push(sum / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Smoothing factor `2 / (n + 1)`, seeded with the simple average of the
/// first `n` points. The first output lines up with input index `n - 1`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        let multiplier = 2.0 / (period as f64 + 1.0);
        Self { period, multiplier }
    }

    /// Smoothing factor applied to each new value.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len() - self.period + 1);

        let initial_sma: f64 = data[..self.period].iter().sum::<f64>() / self.period as f64;
        result.push(initial_sma);

        let mut ema = initial_sma;
        let one_minus_mult = 1.0 - self.multiplier;

        for &price in &data[self.period..] {
            ema = price * self.multiplier + ema * one_minus_mult;
            result.push(ema);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Streaming EMA that maintains state for incremental updates.
///
/// Produces the same values as [`Ema`] fed the same prefix.
#[derive(Debug, Clone)]
pub struct StreamingEma {
    period: usize,
    multiplier: f64,
    current: Option<f64>,
    count: usize,
    sum: f64,
}

impl StreamingEma {
    /// Create a new streaming EMA.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        let multiplier = 2.0 / (period as f64 + 1.0);
        Self {
            period,
            multiplier,
            current: None,
            count: 0,
            sum: 0.0,
        }
    }
}

impl StreamingIndicator for StreamingEma {
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        self.count += 1;

        match self.current {
            Some(ema) => {
                self.current = Some(value * self.multiplier + ema * (1.0 - self.multiplier));
            }
            None => {
                // Accumulating for the seed SMA
                self.sum += value;
                if self.count == self.period {
                    self.current = Some(self.sum / self.period as f64);
                }
            }
        }

        self.current
    }

    fn current(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.current = None;
        self.count = 0;
        self.sum = 0.0;
    }

    fn is_ready(&self) -> bool {
        self.count >= self.period
    }
}
