//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, DataSettings, ForecastSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment variable prefix, e.g. `FORECAST__FORECAST__SIGMA=0.08`.
pub const ENV_PREFIX: &str = "FORECAST";

/// Load configuration from an optional TOML file overlaid by environment.
///
/// Without a file every section starts from its defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
