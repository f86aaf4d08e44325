//! Monte-Carlo path simulation.

use forecast_core::error::ParameterError;
use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::params::{validate_price, ForecastParameters};
use crate::result::{ForecastPath, ForecastResult};
use crate::shocks::{RngShocks, ShockSource};

/// One trajectory of `horizon_steps` prices. Inputs are already validated.
fn run_path<S: ShockSource + ?Sized>(
    initial_price: f64,
    params: &ForecastParameters,
    shocks: &mut S,
) -> ForecastPath {
    let mut price = initial_price;
    let prices = (0..params.horizon_steps)
        .map(|_| {
            price = params.step(price, shocks.standard_normal());
            price
        })
        .collect();
    ForecastPath::new(prices)
}

/// Simulate `simulation_count` GBM paths from `current_price`.
///
/// Draws are taken run by run, step by step, so a scripted source maps
/// its `k`-th value to run `k / horizon_steps`, step `k % horizon_steps`.
/// Parameters are checked before any draw is consumed.
pub fn simulate_forecast<S: ShockSource + ?Sized>(
    current_price: f64,
    params: &ForecastParameters,
    shocks: &mut S,
) -> Result<ForecastResult, ParameterError> {
    validate_price(current_price)?;
    params.validate()?;

    debug!(
        runs = params.simulation_count,
        steps = params.horizon_steps,
        "simulating forecast paths"
    );

    let paths = (0..params.simulation_count)
        .map(|_| run_path(current_price, params, shocks))
        .collect();

    Ok(ForecastResult::from_paths(current_price, *params, paths))
}

/// Parallel variant of [`simulate_forecast`] on the rayon pool.
///
/// One seed per run is drawn from `master` up front, then each run gets its
/// own generator. Output order follows run order, so a seeded master gives
/// identical results regardless of thread scheduling.
pub fn simulate_forecast_parallel<R: Rng + ?Sized>(
    current_price: f64,
    params: &ForecastParameters,
    master: &mut R,
) -> Result<ForecastResult, ParameterError> {
    validate_price(current_price)?;
    params.validate()?;

    let seeds: Vec<u64> = (0..params.simulation_count).map(|_| master.gen()).collect();

    debug!(
        runs = params.simulation_count,
        steps = params.horizon_steps,
        threads = rayon::current_num_threads(),
        "simulating forecast paths in parallel"
    );

    let paths = seeds
        .par_iter()
        .map(|&seed| run_path(current_price, params, &mut RngShocks::seeded(seed)))
        .collect();

    Ok(ForecastResult::from_paths(current_price, *params, paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closed_form::{expected_price, median_path};
    use crate::shocks::{ScriptedShocks, ZeroShocks};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_path_length_and_count() {
        let params = ForecastParameters::new(0.01, 0.06, 24, 1.0 / 24.0).with_simulations(5);
        let result = simulate_forecast(1000.0, &params, &mut RngShocks::seeded(1)).unwrap();

        assert_eq!(result.runs(), 5);
        for path in &result.paths {
            assert_eq!(path.len(), 24);
            assert!(path.prices().iter().all(|p| *p > 0.0));
        }
    }

    #[test]
    fn test_zero_horizon_gives_empty_paths() {
        let params = ForecastParameters::new(0.01, 0.06, 0, 1.0).with_simulations(3);
        let result = simulate_forecast(1000.0, &params, &mut RngShocks::seeded(1)).unwrap();

        assert!(result.paths.iter().all(ForecastPath::is_empty));
        assert_eq!(result.summary.expected, 1000.0);
        assert_eq!(result.summary.std_dev, 0.0);
    }

    #[test]
    fn test_recursion_with_scripted_shocks() {
        let params = ForecastParameters::new(0.05, 0.2, 3, 0.5).with_scales(0.9, 1.5);
        let draws = vec![0.3, -1.2, 0.7];
        let result =
            simulate_forecast(100.0, &params, &mut ScriptedShocks::new(draws.clone())).unwrap();

        let drift = (0.05 - 0.5 * 0.2 * 0.2) * 0.5;
        let scale = 0.2 * 0.5_f64.sqrt() * 0.9 * 1.5;
        let mut price = 100.0;
        for (k, z) in draws.iter().enumerate() {
            price *= (drift + scale * z).exp();
            assert_relative_eq!(result.paths[0].prices()[k], price, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_draws_are_run_major() {
        let params = ForecastParameters::new(0.0, 0.1, 2, 1.0).with_simulations(2);
        let mut shocks = ScriptedShocks::new(vec![1.0, 1.0, -1.0, -1.0]);
        let result = simulate_forecast(10.0, &params, &mut shocks).unwrap();

        assert_eq!(shocks.consumed(), 4);
        assert!(result.paths[0].terminal().unwrap() > 10.0);
        assert!(result.paths[1].terminal().unwrap() < 10.0);
    }

    #[test]
    fn test_invalid_parameters_fail_before_drawing() {
        let mut shocks = ScriptedShocks::new(vec![1.0]);

        let params = ForecastParameters::new(0.01, -0.5, 10, 1.0);
        assert!(simulate_forecast(100.0, &params, &mut shocks).is_err());

        let params = ForecastParameters::default();
        assert!(simulate_forecast(f64::NAN, &params, &mut shocks).is_err());
        assert_eq!(
            simulate_forecast(-1.0, &params, &mut shocks).unwrap_err(),
            ParameterError::NonPositivePrice(-1.0)
        );

        assert_eq!(shocks.consumed(), 0);
    }

    #[test]
    fn test_zero_sigma_paths_match_closed_form_curve() {
        let params = ForecastParameters::new(0.03, 0.0, 12, 1.0 / 12.0)
            .with_scales(1.07, 1.8)
            .with_simulations(4);
        let result = simulate_forecast(250.0, &params, &mut RngShocks::seeded(9)).unwrap();
        let curve = median_path(250.0, &params).unwrap();

        for path in &result.paths {
            assert_eq!(path, &result.paths[0]);
            for (simulated, expected) in path.prices().iter().zip(curve.iter()) {
                assert_relative_eq!(*simulated, *expected, max_relative = 1e-12);
            }
        }
        assert_eq!(result.summary.std_dev, 0.0);
    }

    #[test]
    fn test_zero_shocks_give_median_path() {
        let params = ForecastParameters::new(0.02, 0.3, 10, 0.1);
        let result = simulate_forecast(80.0, &params, &mut ZeroShocks).unwrap();
        let curve = median_path(80.0, &params).unwrap();

        for (simulated, expected) in result.paths[0].prices().iter().zip(curve.iter()) {
            assert_relative_eq!(*simulated, *expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_monte_carlo_mean_converges_to_expected_price() {
        let params = ForecastParameters::new(0.01, 0.06, 24, 1.0 / 24.0).with_simulations(20_000);
        let result = simulate_forecast(1000.0, &params, &mut RngShocks::seeded(2024)).unwrap();
        let expected = expected_price(1000.0, &params, params.horizon()).unwrap();

        // Standard error of the mean is about 60 / sqrt(20000) ≈ 0.42
        assert!((result.summary.expected - expected).abs() < 2.5);
        assert!((result.summary.std_dev - 60.5).abs() < 2.0);
    }

    #[test]
    fn test_parallel_is_deterministic() {
        let params = ForecastParameters::default().with_simulations(64);

        let a = simulate_forecast_parallel(3000.0, &params, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = simulate_forecast_parallel(3000.0, &params, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);

        let c = simulate_forecast_parallel(3000.0, &params, &mut StdRng::seed_from_u64(6)).unwrap();
        assert_ne!(a.paths, c.paths);
    }

    #[test]
    fn test_parallel_mean_converges() {
        let params = ForecastParameters::new(0.01, 0.06, 10, 0.1).with_simulations(20_000);
        let result =
            simulate_forecast_parallel(1000.0, &params, &mut StdRng::seed_from_u64(11)).unwrap();
        let expected = expected_price(1000.0, &params, params.horizon()).unwrap();

        assert!((result.summary.expected - expected).abs() < 2.5);
    }
}
