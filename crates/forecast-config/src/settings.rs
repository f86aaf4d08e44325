//! Configuration structures.

use std::path::PathBuf;

use forecast_core::error::ForecastError;
use forecast_core::types::Timeframe;
use forecast_gbm::ForecastParameters;
use forecast_indicators::IndicatorWindows;
use forecast_signals::SignalThresholds;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub indicators: IndicatorWindows,
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub signals: SignalThresholds,
}

impl AppConfig {
    /// Check every section whose values can be out of range.
    pub fn validate(&self) -> Result<(), ForecastError> {
        self.indicators.validate()?;
        self.forecast.parameters().validate()?;
        self.signals.validate()?;
        if self.data.lookback == 0 {
            return Err(ForecastError::Config("data.lookback must be at least 1".into()));
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ForecastError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                other
            ))),
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ForecastError> {
        toml::to_string_pretty(self).map_err(|e| ForecastError::Serialization(e.to_string()))
    }
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "crypto-forecast".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Price history settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// CSV file with price history
    pub csv_path: Option<PathBuf>,
    pub symbol: String,
    /// Most recent bars to load
    pub lookback: usize,
    pub timeframe: Timeframe,
    pub cache_ttl_secs: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            csv_path: None,
            symbol: "BTC-USD".to_string(),
            lookback: 720,
            timeframe: Timeframe::Hour1,
            cache_ttl_secs: 300,
        }
    }
}

/// GBM forecast settings.
///
/// `mu` and `sigma` are optional; when unset they are estimated from the
/// loaded history, or fall back to the engine defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    pub mu: Option<f64>,
    pub sigma: Option<f64>,
    pub drift_scale: f64,
    pub rate_scale: f64,
    pub horizon_steps: usize,
    pub step_size: f64,
    pub simulation_count: usize,
    /// Master seed; entropy when unset
    pub seed: Option<u64>,
    /// Simulate runs on the rayon pool
    pub parallel: bool,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        let defaults = ForecastParameters::default();
        Self {
            mu: None,
            sigma: None,
            drift_scale: defaults.drift_scale,
            rate_scale: defaults.rate_scale,
            horizon_steps: defaults.horizon_steps,
            step_size: defaults.step_size,
            simulation_count: 50,
            seed: None,
            parallel: false,
        }
    }
}

impl ForecastSettings {
    /// Engine parameters, with engine defaults for an unset `mu` or `sigma`.
    pub fn parameters(&self) -> ForecastParameters {
        let defaults = ForecastParameters::default();
        ForecastParameters::new(
            self.mu.unwrap_or(defaults.mu),
            self.sigma.unwrap_or(defaults.sigma),
            self.horizon_steps,
            self.step_size,
        )
        .with_scales(self.drift_scale, self.rate_scale)
        .with_simulations(self.simulation_count)
    }
}
