//! Geometric Brownian Motion forecast engine.
//!
//! Projects future prices from a starting price and a [`ForecastParameters`]
//! value object. Two modes share one parameterization:
//!
//! - path simulation ([`simulate_forecast`], [`simulate_forecast_parallel`]),
//!   step-by-step Monte-Carlo trajectories for fan charts;
//! - closed form ([`estimate_horizon`]), the terminal log-normal distribution
//!   at a chosen horizon with its analytic one-sigma band.
//!
//! Per step the log return is normal with mean `(mu - sigma^2/2) * dt` and
//! standard deviation `sigma * sqrt(dt)`. The drift and rate scales multiply
//! the stochastic term only, never the drift term.
//!
//! Randomness is always injected through [`ShockSource`], so every forecast
//! can be reproduced from a seed.

pub mod closed_form;
pub mod estimate;
pub mod params;
pub mod result;
pub mod shocks;
pub mod simulate;

pub use closed_form::{estimate_horizon, expected_price, median_path, HorizonEstimate};
pub use estimate::{estimate_parameters, DriftVolatility};
pub use params::ForecastParameters;
pub use result::{ConfidenceInterval, ForecastPath, ForecastResult, TerminalSummary};
pub use shocks::{RngShocks, ScriptedShocks, ShockSource, ZeroShocks};
pub use simulate::{simulate_forecast, simulate_forecast_parallel};
