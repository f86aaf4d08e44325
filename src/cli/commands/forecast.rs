//! Forecast command implementation.

use anyhow::{Context, Result};
use forecast_config::AppConfig;
use forecast_core::types::PriceSeries;
use forecast_gbm::{
    estimate_horizon, estimate_parameters, simulate_forecast, simulate_forecast_parallel,
    ForecastParameters, RngShocks,
};
use forecast_monitor::{forecast_report, horizon_report};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use super::{print_json, HistoryLoader};
use crate::cli::{ForecastArgs, OutputFormat};

pub async fn run(args: ForecastArgs, config: &AppConfig, loader: &HistoryLoader) -> Result<()> {
    let wants_data = args.data.data.is_some() || (args.price.is_none() && config.data.csv_path.is_some());
    let series = if wants_data {
        Some(loader.load(&args.data, config).await?)
    } else {
        None
    };

    let current_price = match (args.price, &series) {
        (Some(price), _) => price,
        (None, Some(series)) => series.last_close(),
        (None, None) => anyhow::bail!("Please provide a starting price with --price or history with --data"),
    };

    let params = resolve_parameters(&args, config, series.as_ref())?;
    info!(
        current_price,
        mu = params.mu,
        sigma = params.sigma,
        steps = params.horizon_steps,
        simulations = params.simulation_count,
        "Running forecast"
    );

    if let Some(horizon) = args.horizon {
        let estimate = estimate_horizon(current_price, &params, horizon, args.z)?;
        match args.output {
            OutputFormat::Json => print_json(&estimate)?,
            OutputFormat::Text => println!("{}", horizon_report(current_price, &estimate)),
        }
        return Ok(());
    }

    let mut rng = match args.seed.or(config.forecast.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let result = if args.parallel || config.forecast.parallel {
        simulate_forecast_parallel(current_price, &params, &mut rng)?
    } else {
        simulate_forecast(current_price, &params, &mut RngShocks::new(rng))?
    };

    match args.output {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => println!("{}", forecast_report(&result)),
    }

    Ok(())
}

/// Flags override config; `mu`/`sigma` then fall back to an estimate from
/// the loaded history, then to the engine defaults.
fn resolve_parameters(
    args: &ForecastArgs,
    config: &AppConfig,
    series: Option<&PriceSeries>,
) -> Result<ForecastParameters> {
    let settings = &config.forecast;
    let mut params = settings.parameters();

    let needs_estimate = (args.mu.is_none() && settings.mu.is_none())
        || (args.sigma.is_none() && settings.sigma.is_none());
    if let (true, Some(series)) = (needs_estimate, series) {
        match estimate_parameters(&series.closes(), series.timeframe.step_size_days()) {
            Ok(estimate) => {
                info!(
                    mu = estimate.mu,
                    sigma = estimate.sigma,
                    samples = estimate.samples,
                    "Estimated drift and volatility from history"
                );
                if settings.mu.is_none() {
                    params.mu = estimate.mu;
                }
                if settings.sigma.is_none() {
                    params.sigma = estimate.sigma;
                }
            }
            Err(e) => warn!(error = %e, "Could not estimate parameters, using defaults"),
        }
    }

    if let Some(mu) = args.mu {
        params.mu = mu;
    }
    if let Some(sigma) = args.sigma {
        params.sigma = sigma;
    }
    params = params.with_scales(
        args.drift_scale.unwrap_or(params.drift_scale),
        args.rate_scale.unwrap_or(params.rate_scale),
    );
    params = params.with_horizon(
        args.steps.unwrap_or(params.horizon_steps),
        args.step_size.unwrap_or(params.step_size),
    );
    if let Some(simulations) = args.simulations {
        params = params.with_simulations(simulations);
    }

    params.validate().context("Invalid forecast parameters")?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use forecast_core::types::Timeframe;

    fn forecast_args(extra: &[&str]) -> ForecastArgs {
        let argv = ["forecast", "forecast"].iter().chain(extra.iter()).copied();
        match Cli::parse_from(argv).command {
            Commands::Forecast(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = AppConfig::default();
        config.forecast.mu = Some(0.5);
        let args = forecast_args(&["--mu", "0.02", "--sigma", "0.1", "--steps", "12"]);

        let params = resolve_parameters(&args, &config, None).unwrap();
        assert_eq!(params.mu, 0.02);
        assert_eq!(params.sigma, 0.1);
        assert_eq!(params.horizon_steps, 12);
        assert_eq!(params.simulation_count, 50);
    }

    #[test]
    fn test_estimates_from_history_when_unset() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 * (1.0 + 0.01 * (i % 3) as f64)).collect();
        let series = PriceSeries::from_closes("BTC-USD", Timeframe::Daily, &closes).unwrap();
        let mut config = AppConfig::default();
        config.forecast.mu = Some(0.0);

        let params = resolve_parameters(&forecast_args(&[]), &config, Some(&series)).unwrap();
        assert_eq!(params.mu, 0.0);
        assert!(params.sigma > 0.0);
        assert_ne!(params.sigma, ForecastParameters::default().sigma);
    }

    #[test]
    fn test_defaults_without_history() {
        let params = resolve_parameters(&forecast_args(&[]), &AppConfig::default(), None).unwrap();
        assert_eq!(params.mu, ForecastParameters::default().mu);
        assert_eq!(params.sigma, ForecastParameters::default().sigma);
    }

    #[test]
    fn test_rejects_invalid_flags() {
        let args = forecast_args(&["--sigma", "-1"]);
        assert!(resolve_parameters(&args, &AppConfig::default(), None).is_err());
    }
}
