//! Naive drift and volatility from historical closes.

use forecast_core::error::{ForecastError, IndicatorError, ParameterError};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::params::{validate_price, ForecastParameters};

/// Minimum closes: two log returns are needed for a sample deviation.
const MIN_CLOSES: usize = 3;

/// Drift and volatility per unit time, as estimated from log returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftVolatility {
    pub mu: f64,
    pub sigma: f64,
    /// Number of log returns used
    pub samples: usize,
}

/// Estimate `mu` and `sigma` from closes sampled every `step_size` units.
///
/// With log returns `r`, `sigma = sd(r) / sqrt(dt)` and
/// `mu = (mean(r) + sd(r)^2 / 2) / dt`.
pub fn estimate_parameters(closes: &[f64], step_size: f64) -> Result<DriftVolatility, ForecastError> {
    if closes.len() < MIN_CLOSES {
        return Err(IndicatorError::InsufficientData {
            required: MIN_CLOSES,
            available: closes.len(),
        }
        .into());
    }
    if !step_size.is_finite() || step_size <= 0.0 {
        return Err(ParameterError::NonPositiveStepSize(step_size).into());
    }
    for &close in closes {
        validate_price(close)?;
    }

    let returns: Vec<f64> = closes.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let mean = returns.iter().mean();
    let step_sd = returns.iter().std_dev();

    let estimate = DriftVolatility {
        mu: (mean + 0.5 * step_sd * step_sd) / step_size,
        sigma: step_sd / step_size.sqrt(),
        samples: returns.len(),
    };
    debug!(
        mu = estimate.mu,
        sigma = estimate.sigma,
        samples = estimate.samples,
        "estimated drift and volatility"
    );
    Ok(estimate)
}

impl ForecastParameters {
    /// Replace `mu` and `sigma` with an estimate.
    pub fn with_drift_volatility(mut self, estimate: DriftVolatility) -> Self {
        self.mu = estimate.mu;
        self.sigma = estimate.sigma;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shocks::{RngShocks, ShockSource};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_constant_growth_has_zero_volatility() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 * (0.02 * i as f64).exp()).collect();
        let estimate = estimate_parameters(&closes, 1.0).unwrap();

        assert_eq!(estimate.samples, 9);
        assert_abs_diff_eq!(estimate.sigma, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(estimate.mu, 0.02, epsilon = 1e-9);
    }

    #[test]
    fn test_step_size_rescales() {
        let closes = [100.0, 102.0, 101.0, 104.0, 103.5];
        let daily = estimate_parameters(&closes, 1.0).unwrap();
        let hourly = estimate_parameters(&closes, 1.0 / 24.0).unwrap();

        assert_abs_diff_eq!(hourly.sigma, daily.sigma * 24.0_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(hourly.mu, daily.mu * 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_recovers_simulated_parameters() {
        let params = ForecastParameters::new(0.05, 0.2, 1, 1.0 / 250.0);
        let mut shocks = RngShocks::seeded(17);
        let mut price = 100.0;
        let mut closes = vec![price];
        for _ in 0..20_000 {
            price = params.step(price, shocks.standard_normal());
            closes.push(price);
        }

        let estimate = estimate_parameters(&closes, params.step_size).unwrap();
        assert_abs_diff_eq!(estimate.sigma, 0.2, epsilon = 0.01);
    }

    #[test]
    fn test_rejects_short_or_invalid_input() {
        assert!(matches!(
            estimate_parameters(&[1.0, 2.0], 1.0),
            Err(ForecastError::Indicator(IndicatorError::InsufficientData { .. }))
        ));
        assert!(matches!(
            estimate_parameters(&[1.0, 2.0, 3.0], 0.0),
            Err(ForecastError::Parameter(ParameterError::NonPositiveStepSize(_)))
        ));
        assert!(matches!(
            estimate_parameters(&[1.0, -2.0, 3.0], 1.0),
            Err(ForecastError::Parameter(ParameterError::NonPositivePrice(_)))
        ));
    }

    #[test]
    fn test_with_drift_volatility() {
        let estimate = DriftVolatility {
            mu: 0.3,
            sigma: 0.4,
            samples: 10,
        };
        let params = ForecastParameters::default().with_drift_volatility(estimate);
        assert_eq!(params.mu, 0.3);
        assert_eq!(params.sigma, 0.4);
        assert_eq!(params.horizon_steps, 24);
    }
}
