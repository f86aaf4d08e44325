//! Closed-form terminal distribution.
//!
//! Under GBM the price at horizon `T` is log-normal:
//!
//! ```text
//! S_T = S_0 * exp((mu - sigma^2/2) * T + sigma * sqrt(T) * k * Z),   k = phi * lambda
//! ```
//!
//! `Z = 0` gives the median. The one-sigma band uses the log-normal standard
//! deviation with the same shock scaling as the simulator,
//! `forecast * sqrt(exp(k^2 sigma^2 T) - 1)`.

use forecast_core::error::ParameterError;
use serde::{Deserialize, Serialize};

use crate::params::{validate_price, ForecastParameters};

/// Terminal-price estimate at one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonEstimate {
    /// Horizon in the same time unit as mu and sigma
    pub horizon: f64,
    /// Standard-normal draw used (0 for the median)
    pub z: f64,
    pub forecast: f64,
    pub std_dev: f64,
    /// `forecast - std_dev`
    pub lower: f64,
    /// `forecast + std_dev`
    pub upper: f64,
}

fn check_horizon(horizon: f64) -> Result<(), ParameterError> {
    if !horizon.is_finite() {
        return Err(ParameterError::NonFinite {
            name: "horizon",
            value: horizon,
        });
    }
    if horizon < 0.0 {
        return Err(ParameterError::NegativeHorizon(horizon));
    }
    Ok(())
}

/// Terminal estimate at `horizon` for a single draw `z`.
///
/// The band is `forecast * sqrt(exp(k^2 sigma^2 T) - 1)` with
/// `k = drift_scale * rate_scale`. With unit scales this is the plain
/// log-normal `forecast * sqrt(exp(sigma^2 T) - 1)`; with other scales it
/// departs from that formula and tracks the spread of simulated paths.
///
/// `simulation_count`, `horizon_steps` and `step_size` of `params` play no
/// part here beyond validation.
pub fn estimate_horizon(
    current_price: f64,
    params: &ForecastParameters,
    horizon: f64,
    z: f64,
) -> Result<HorizonEstimate, ParameterError> {
    validate_price(current_price)?;
    params.validate()?;
    check_horizon(horizon)?;
    if !z.is_finite() {
        return Err(ParameterError::NonFinite { name: "z", value: z });
    }

    let k = params.shock_multiplier();
    let sigma = params.sigma;

    let log_return = (params.mu - 0.5 * sigma * sigma) * horizon + sigma * horizon.sqrt() * k * z;
    let forecast = current_price * log_return.exp();
    let std_dev = forecast * (k * k * sigma * sigma * horizon).exp_m1().sqrt();

    Ok(HorizonEstimate {
        horizon,
        z,
        forecast,
        std_dev,
        lower: forecast - std_dev,
        upper: forecast + std_dev,
    })
}

/// Mean of the terminal distribution at `horizon`.
///
/// Equals `S0 * exp(mu * T)` when both shock scales are 1.
pub fn expected_price(
    current_price: f64,
    params: &ForecastParameters,
    horizon: f64,
) -> Result<f64, ParameterError> {
    validate_price(current_price)?;
    params.validate()?;
    check_horizon(horizon)?;

    let k = params.shock_multiplier();
    let variance = params.sigma * params.sigma * horizon;
    let log_mean = params.mu * horizon - 0.5 * variance + 0.5 * k * k * variance;
    Ok(current_price * log_mean.exp())
}

/// Median trajectory (every draw zero), one price per step.
pub fn median_path(
    current_price: f64,
    params: &ForecastParameters,
) -> Result<Vec<f64>, ParameterError> {
    validate_price(current_price)?;
    params.validate()?;

    let drift = params.log_drift();
    Ok((1..=params.horizon_steps)
        .map(|k| current_price * (drift * k as f64).exp())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_reference_scenario() {
        let params = ForecastParameters::new(0.01, 0.06, 1, 1.0);
        let estimate = estimate_horizon(1000.0, &params, 1.0, 0.0).unwrap();

        assert_relative_eq!(estimate.forecast, 1000.0 * 0.0082_f64.exp(), max_relative = 1e-12);
        assert_abs_diff_eq!(estimate.forecast, 1008.23, epsilon = 0.01);
        assert_abs_diff_eq!(estimate.std_dev, 60.55, epsilon = 0.05);
        assert_relative_eq!(
            estimate.upper - estimate.lower,
            2.0 * estimate.std_dev,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_zero_sigma_is_exact_exponential() {
        let params = ForecastParameters::new(0.04, 0.0, 1, 1.0).with_scales(1.1, 0.5);
        let estimate = estimate_horizon(500.0, &params, 3.0, 0.0).unwrap();

        assert_eq!(estimate.forecast, 500.0 * (0.04_f64 * 3.0).exp());
        assert_eq!(estimate.std_dev, 0.0);
        assert_eq!(estimate.lower, estimate.upper);
    }

    #[test]
    fn test_zero_sigma_ignores_draw() {
        let params = ForecastParameters::new(-0.02, 0.0, 1, 1.0);
        let a = estimate_horizon(100.0, &params, 2.0, 0.0).unwrap();
        let b = estimate_horizon(100.0, &params, 2.0, 1.7).unwrap();

        assert_eq!(a.forecast, b.forecast);
        assert!(a.forecast < 100.0);
    }

    #[test]
    fn test_zero_horizon_returns_current_price() {
        let params = ForecastParameters::default();
        let estimate = estimate_horizon(42.0, &params, 0.0, 1.0).unwrap();

        assert_eq!(estimate.forecast, 42.0);
        assert_eq!(estimate.std_dev, 0.0);
        assert!(median_path(42.0, &params.with_horizon(0, 1.0)).unwrap().is_empty());
    }

    #[test]
    fn test_scales_widen_the_band() {
        let base = ForecastParameters::new(0.01, 0.06, 1, 1.0);
        let wide = base.with_scales(1.0, 2.0);

        let narrow_est = estimate_horizon(1000.0, &base, 1.0, 0.0).unwrap();
        let wide_est = estimate_horizon(1000.0, &wide, 1.0, 0.0).unwrap();

        assert_eq!(narrow_est.forecast, wide_est.forecast);
        assert!(wide_est.std_dev > 1.9 * narrow_est.std_dev);
    }

    #[test]
    fn test_expected_price() {
        let params = ForecastParameters::new(0.01, 0.06, 1, 1.0);
        let expected = expected_price(1000.0, &params, 1.0).unwrap();
        assert_relative_eq!(expected, 1000.0 * 0.01_f64.exp(), max_relative = 1e-12);
    }

    #[test]
    fn test_rejects_bad_horizon() {
        let params = ForecastParameters::default();
        assert_eq!(
            estimate_horizon(1.0, &params, -1.0, 0.0).unwrap_err(),
            ParameterError::NegativeHorizon(-1.0)
        );
        assert!(estimate_horizon(1.0, &params, f64::NAN, 0.0).is_err());
        assert!(estimate_horizon(1.0, &params, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_median_path_terminal_matches_estimate() {
        let params = ForecastParameters::new(0.02, 0.1, 8, 0.25);
        let path = median_path(300.0, &params).unwrap();
        let estimate = estimate_horizon(300.0, &params, params.horizon(), 0.0).unwrap();

        assert_eq!(path.len(), 8);
        assert_relative_eq!(*path.last().unwrap(), estimate.forecast, max_relative = 1e-12);
    }

    #[test]
    fn test_band_uses_scaled_variance() {
        let base = ForecastParameters::new(0.01, 0.06, 1, 1.0);
        let unit = estimate_horizon(1000.0, &base, 2.0, 0.0).unwrap();
        assert_relative_eq!(
            unit.std_dev,
            unit.forecast * (0.06_f64 * 0.06 * 2.0).exp_m1().sqrt(),
            max_relative = 1e-12
        );

        let scaled = estimate_horizon(1000.0, &base.with_scales(1.5, 2.0), 2.0, 0.0).unwrap();
        assert_relative_eq!(
            scaled.std_dev,
            scaled.forecast * (9.0 * 0.06_f64 * 0.06 * 2.0).exp_m1().sqrt(),
            max_relative = 1e-12
        );
    }
}
