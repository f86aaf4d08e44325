//! Volatility indicators.

use forecast_core::traits::{Indicator, MultiOutputIndicator};
use serde::{Deserialize, Serialize};

/// Population mean and standard deviation of a window.
fn mean_std(window: &[f64]) -> (f64, f64) {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Rolling standard deviation.
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period }
    }
}

impl Indicator for StdDev {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        data.windows(self.period)
            .map(|window| mean_std(window).1)
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
    /// %B ((price - lower) / (upper - lower))
    pub percent_b: f64,
}

/// Bollinger Bands.
///
/// Consists of a middle band (SMA) with upper and lower bands
/// at a specified number of standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerOutput> {
        if data.len() < self.period {
            return vec![];
        }

        data.windows(self.period)
            .enumerate()
            .map(|(i, window)| {
                let (mean, std_dev) = mean_std(window);
                let upper = mean + self.std_dev_multiplier * std_dev;
                let lower = mean - self.std_dev_multiplier * std_dev;

                let price = data[self.period - 1 + i];
                let percent_b = if upper != lower {
                    (price - lower) / (upper - lower)
                } else {
                    0.5
                };

                BollingerOutput {
                    upper,
                    middle: mean,
                    lower,
                    percent_b,
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_dev() {
        let std_dev = StdDev::new(3);
        let data = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        let result = std_dev.calculate(&data);

        assert_eq!(result.len(), 3);
        // First window: [2, 4, 6], mean = 4, variance = (4+0+4)/3 = 8/3
        assert!((result[0] - (8.0_f64 / 3.0).sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_bollinger_bands() {
        let bb = BollingerBands::new();
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0)
            .collect();

        let result = bb.calculate(&data);
        assert_eq!(result.len(), 11);

        for output in &result {
            assert!(output.upper > output.middle);
            assert!(output.middle > output.lower);
        }
    }

    #[test]
    fn test_bollinger_percent_b() {
        let bb = BollingerBands::with_params(5, 2.0);
        let data = vec![100.0, 100.0, 100.0, 100.0, 100.0]; // Constant price

        let result = bb.calculate(&data);
        assert_eq!(result.len(), 1);

        // With constant price, bands collapse, percent_b = 0.5
        assert!((result[0].percent_b - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_bollinger_aligned() {
        let bb = BollingerBands::with_params(4, 2.0);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

        let aligned = bb.calculate_aligned(&data);
        assert_eq!(aligned.len(), 6);
        assert!(aligned[..3].iter().all(Option::is_none));
        assert!((aligned[3].unwrap().middle - 2.5).abs() < 1e-10);
    }
}
