//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use forecast_core::types::Timeframe;
use std::path::PathBuf;

/// Used when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG: &str = "config/default.toml";

#[derive(Parser)]
#[command(name = "forecast")]
#[command(author, version, about = "Crypto price indicators, signal backtests and GBM forecasts")]
pub struct Cli {
    /// Configuration file path [default: config/default.toml if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level [default: logging.level from config]
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Explicit config path, else the default file when it exists.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG);
            default.exists().then_some(default)
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute technical indicators over price history
    Indicators(IndicatorsArgs),
    /// Run a GBM price forecast
    Forecast(ForecastArgs),
    /// Evaluate RSI/MACD signals and replay them against history
    Signals(SignalsArgs),
    /// Validate configuration
    ValidateConfig,
}

/// Where to read price history from. Unset values come from `[data]`.
#[derive(clap::Args, Clone, Default)]
pub struct DataArgs {
    /// Data file (CSV)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Symbol to load
    #[arg(short = 'S', long)]
    pub symbol: Option<String>,

    /// Number of most recent bars to keep
    #[arg(long)]
    pub lookback: Option<usize>,

    /// Bar interval (1m, 5m, 15m, 1h, 4h, 1d, 1w)
    #[arg(short, long)]
    pub timeframe: Option<Timeframe>,
}

#[derive(clap::Args)]
pub struct IndicatorsArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Rows to print in text output
    #[arg(long, default_value = "10")]
    pub tail: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Starting price; the last close of --data when omitted
    #[arg(long)]
    pub price: Option<f64>,

    /// Drift per unit time
    #[arg(long, allow_hyphen_values = true)]
    pub mu: Option<f64>,

    /// Volatility per unit time
    #[arg(long, allow_hyphen_values = true)]
    pub sigma: Option<f64>,

    /// Shock multiplier phi
    #[arg(long)]
    pub drift_scale: Option<f64>,

    /// Shock multiplier lambda
    #[arg(long)]
    pub rate_scale: Option<f64>,

    /// Steps per path
    #[arg(long)]
    pub steps: Option<usize>,

    /// Time per step
    #[arg(long)]
    pub step_size: Option<f64>,

    /// Number of simulated paths
    #[arg(long)]
    pub simulations: Option<usize>,

    /// Master random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Simulate paths in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Closed-form estimate at this horizon instead of simulating
    #[arg(long)]
    pub horizon: Option<f64>,

    /// Standard-normal draw for the closed-form estimate
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub z: f64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct SignalsArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// RSI level below which buys are allowed
    #[arg(long)]
    pub oversold: Option<f64>,

    /// RSI level above which sells are allowed
    #[arg(long)]
    pub overbought: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}
