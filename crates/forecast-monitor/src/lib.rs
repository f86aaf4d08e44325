//! Logging setup and plain-text reports.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::{forecast_report, horizon_report, indicator_report, signal_report};
