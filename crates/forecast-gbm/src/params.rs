//! Forecast parameters.

use forecast_core::error::ParameterError;
use serde::{Deserialize, Serialize};

/// Inputs to one forecast invocation.
///
/// `mu` and `sigma` are quoted per unit of time; `step_size` is the length
/// of one simulated step in that unit (1/24 for hourly steps of a daily
/// rate).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastParameters {
    /// Expected drift per unit time
    pub mu: f64,
    /// Volatility per unit time, >= 0
    pub sigma: f64,
    /// Multiplier on the stochastic shock ("phi")
    pub drift_scale: f64,
    /// Second multiplier on the stochastic shock ("lambda")
    pub rate_scale: f64,
    /// Number of steps per simulated path
    pub horizon_steps: usize,
    /// Time increment per step
    pub step_size: f64,
    /// Number of independent paths, >= 1
    pub simulation_count: usize,
}

impl Default for ForecastParameters {
    fn default() -> Self {
        Self {
            mu: 0.01,
            sigma: 0.06,
            drift_scale: 1.0,
            rate_scale: 1.0,
            horizon_steps: 24,
            step_size: 1.0 / 24.0,
            simulation_count: 1,
        }
    }
}

impl ForecastParameters {
    /// Create parameters with unit scales and a single run.
    pub fn new(mu: f64, sigma: f64, horizon_steps: usize, step_size: f64) -> Self {
        Self {
            mu,
            sigma,
            horizon_steps,
            step_size,
            ..Self::default()
        }
    }

    pub fn with_scales(mut self, drift_scale: f64, rate_scale: f64) -> Self {
        self.drift_scale = drift_scale;
        self.rate_scale = rate_scale;
        self
    }

    pub fn with_simulations(mut self, simulation_count: usize) -> Self {
        self.simulation_count = simulation_count;
        self
    }

    pub fn with_horizon(mut self, horizon_steps: usize, step_size: f64) -> Self {
        self.horizon_steps = horizon_steps;
        self.step_size = step_size;
        self
    }

    /// Reject anything that would make the recursion meaningless.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let finite = |name: &'static str, value: f64| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(ParameterError::NonFinite { name, value })
            }
        };

        finite("mu", self.mu)?;
        finite("sigma", self.sigma)?;
        finite("drift_scale", self.drift_scale)?;
        finite("rate_scale", self.rate_scale)?;
        finite("step_size", self.step_size)?;

        if self.sigma < 0.0 {
            return Err(ParameterError::NegativeSigma(self.sigma));
        }
        if self.step_size <= 0.0 {
            return Err(ParameterError::NonPositiveStepSize(self.step_size));
        }
        if self.simulation_count == 0 {
            return Err(ParameterError::ZeroSimulations);
        }
        Ok(())
    }

    /// Combined multiplier applied to the stochastic shock.
    #[inline]
    pub fn shock_multiplier(&self) -> f64 {
        self.drift_scale * self.rate_scale
    }

    /// Deterministic log-return per step: `(mu - sigma^2/2) * dt`.
    #[inline]
    pub fn log_drift(&self) -> f64 {
        (self.mu - 0.5 * self.sigma * self.sigma) * self.step_size
    }

    /// Scale applied to a standard-normal draw: `sigma * sqrt(dt) * phi * lambda`.
    #[inline]
    pub fn shock_scale(&self) -> f64 {
        self.sigma * self.step_size.sqrt() * self.shock_multiplier()
    }

    /// Total simulated time `horizon_steps * step_size`.
    #[inline]
    pub fn horizon(&self) -> f64 {
        self.horizon_steps as f64 * self.step_size
    }

    /// Advance one step given a standard-normal draw.
    #[inline]
    pub fn step(&self, price: f64, z: f64) -> f64 {
        price * (self.log_drift() + self.shock_scale() * z).exp()
    }
}

/// Starting prices must be positive and finite.
pub fn validate_price(current_price: f64) -> Result<(), ParameterError> {
    if !current_price.is_finite() {
        return Err(ParameterError::NonFinite {
            name: "current price",
            value: current_price,
        });
    }
    if current_price <= 0.0 {
        return Err(ParameterError::NonPositivePrice(current_price));
    }
    Ok(())
}
