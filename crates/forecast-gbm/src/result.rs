//! Simulated paths and their summary statistics.

use forecast_core::error::ParameterError;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

use crate::params::ForecastParameters;

/// Confidence level of the summary interval. Matches the one-sigma band of
/// the closed-form estimate so both modes can be compared directly.
pub const DEFAULT_CONFIDENCE: f64 = 0.68;

/// One simulated trajectory: prices at steps `1..=horizon_steps`.
///
/// The starting price is not included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastPath {
    prices: Vec<f64>,
}

impl ForecastPath {
    pub fn new(prices: Vec<f64>) -> Self {
        Self { prices }
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Last simulated price, if any step was taken.
    pub fn terminal(&self) -> Option<f64> {
        self.prices.last().copied()
    }
}

/// Two-sided interval from empirical quantiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub level: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Distribution of terminal prices across runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalSummary {
    /// Mean terminal price
    pub expected: f64,
    /// Population standard deviation of terminal prices
    pub std_dev: f64,
    /// Median terminal price
    pub median: f64,
    /// Central interval at [`DEFAULT_CONFIDENCE`]
    pub interval: ConfidenceInterval,
}

/// Output of a Monte-Carlo forecast. Serialize-only; results are built by
/// the simulator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub initial_price: f64,
    pub parameters: ForecastParameters,
    pub paths: Vec<ForecastPath>,
    pub summary: TerminalSummary,
}

fn check_level(q: f64) -> Result<(), ParameterError> {
    if q.is_finite() && (0.0..=1.0).contains(&q) {
        Ok(())
    } else {
        Err(ParameterError::InvalidConfidence(q))
    }
}

fn quantile(values: &[f64], q: f64) -> f64 {
    Data::new(values.to_vec()).quantile(q)
}

impl ForecastResult {
    /// Assemble a result and compute its terminal summary.
    ///
    /// `paths` must be non-empty; the simulator guarantees at least one run.
    pub(crate) fn from_paths(
        initial_price: f64,
        parameters: ForecastParameters,
        paths: Vec<ForecastPath>,
    ) -> Self {
        let terminals: Vec<f64> = paths
            .iter()
            .map(|p| p.terminal().unwrap_or(initial_price))
            .collect();

        let half_tail = (1.0 - DEFAULT_CONFIDENCE) / 2.0;
        let summary = TerminalSummary {
            expected: terminals.iter().mean(),
            std_dev: terminals.iter().population_std_dev(),
            median: quantile(&terminals, 0.5),
            interval: ConfidenceInterval {
                level: DEFAULT_CONFIDENCE,
                lower: quantile(&terminals, half_tail),
                upper: quantile(&terminals, 1.0 - half_tail),
            },
        };

        Self {
            initial_price,
            parameters,
            paths,
            summary,
        }
    }

    /// Number of simulated runs.
    pub fn runs(&self) -> usize {
        self.paths.len()
    }

    pub fn expected_terminal(&self) -> f64 {
        self.summary.expected
    }

    pub fn terminal_std_dev(&self) -> f64 {
        self.summary.std_dev
    }

    pub fn median_terminal(&self) -> f64 {
        self.summary.median
    }

    /// Terminal price of each run; the starting price for zero-step forecasts.
    pub fn terminal_prices(&self) -> Vec<f64> {
        self.paths
            .iter()
            .map(|p| p.terminal().unwrap_or(self.initial_price))
            .collect()
    }

    /// Steps present in every run.
    fn common_steps(&self) -> usize {
        self.paths
            .iter()
            .map(|p| p.prices().len())
            .min()
            .unwrap_or(0)
            .min(self.parameters.horizon_steps)
    }

    /// Average price across runs at each step.
    pub fn mean_path(&self) -> Vec<f64> {
        let runs = self.paths.len() as f64;
        (0..self.common_steps())
            .map(|k| self.paths.iter().map(|p| p.prices()[k]).sum::<f64>() / runs)
            .collect()
    }

    /// Cross-run quantile at each step, for fan-chart bands.
    pub fn quantile_path(&self, q: f64) -> Result<Vec<f64>, ParameterError> {
        check_level(q)?;
        Ok((0..self.common_steps())
            .map(|k| {
                let column: Vec<f64> = self.paths.iter().map(|p| p.prices()[k]).collect();
                quantile(&column, q)
            })
            .collect())
    }

    /// Central interval of terminal prices at `level`.
    pub fn confidence_interval(&self, level: f64) -> Result<ConfidenceInterval, ParameterError> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ParameterError::InvalidConfidence(level));
        }
        let terminals = self.terminal_prices();
        let half_tail = (1.0 - level) / 2.0;
        Ok(ConfidenceInterval {
            level,
            lower: quantile(&terminals, half_tail),
            upper: quantile(&terminals, 1.0 - half_tail),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(steps: usize, runs: usize) -> ForecastParameters {
        ForecastParameters::new(0.0, 0.1, steps, 1.0).with_simulations(runs)
    }

    #[test]
    fn test_summary_of_known_terminals() {
        let paths = vec![
            ForecastPath::new(vec![99.0, 90.0]),
            ForecastPath::new(vec![101.0, 100.0]),
            ForecastPath::new(vec![105.0, 110.0]),
        ];
        let result = ForecastResult::from_paths(100.0, params(2, 3), paths);

        assert_relative_eq!(result.summary.expected, 100.0, epsilon = 1e-12);
        assert_relative_eq!(result.summary.std_dev, (200.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(result.summary.median, 100.0, epsilon = 1e-12);
        assert!(result.summary.interval.lower <= result.summary.median);
        assert!(result.summary.interval.upper >= result.summary.median);
        assert_eq!(result.terminal_prices(), vec![90.0, 100.0, 110.0]);
        assert_eq!(result.expected_terminal(), result.summary.expected);
        assert_eq!(result.median_terminal(), result.summary.median);
    }

    #[test]
    fn test_mean_path() {
        let paths = vec![
            ForecastPath::new(vec![1.0, 2.0]),
            ForecastPath::new(vec![3.0, 6.0]),
        ];
        let result = ForecastResult::from_paths(2.0, params(2, 2), paths);

        assert_eq!(result.mean_path(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_quantile_path_bounds() {
        let paths = vec![
            ForecastPath::new(vec![1.0]),
            ForecastPath::new(vec![2.0]),
            ForecastPath::new(vec![3.0]),
        ];
        let result = ForecastResult::from_paths(2.0, params(1, 3), paths);

        assert_eq!(result.quantile_path(0.0).unwrap(), vec![1.0]);
        assert_eq!(result.quantile_path(1.0).unwrap(), vec![3.0]);
        assert!(result.quantile_path(1.5).is_err());
    }

    #[test]
    fn test_zero_step_paths_use_initial_price() {
        let paths = vec![ForecastPath::new(vec![]), ForecastPath::new(vec![])];
        let result = ForecastResult::from_paths(50.0, params(0, 2), paths);

        assert_eq!(result.summary.expected, 50.0);
        assert_eq!(result.summary.std_dev, 0.0);
        assert!(result.mean_path().is_empty());
    }

    #[test]
    fn test_confidence_interval_rejects_bad_level() {
        let result = ForecastResult::from_paths(1.0, params(1, 1), vec![ForecastPath::new(vec![1.0])]);
        assert!(result.confidence_interval(0.0).is_err());
        assert!(result.confidence_interval(1.0).is_err());
        assert!(result.confidence_interval(0.9).is_ok());
    }

    #[test]
    fn test_ragged_paths_do_not_overrun() {
        let paths = vec![ForecastPath::new(vec![1.0, 2.0])];
        let mut result = ForecastResult::from_paths(100.0, params(2, 1), paths);
        result.paths.push(ForecastPath::new(vec![3.0]));

        assert_eq!(result.mean_path(), vec![2.0]);
        assert_eq!(result.quantile_path(0.5).unwrap().len(), 1);
    }

    #[test]
    fn test_serializes_for_json_output() {
        let paths = vec![ForecastPath::new(vec![101.0]), ForecastPath::new(vec![99.0])];
        let result = ForecastResult::from_paths(100.0, params(1, 2), paths);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["initial_price"], 100.0);
        assert_eq!(value["paths"].as_array().unwrap().len(), 2);
        assert_eq!(value["summary"]["expected"], 100.0);
        assert_eq!(value["summary"]["interval"]["level"], DEFAULT_CONFIDENCE);
    }
}
