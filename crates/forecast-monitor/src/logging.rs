//! Logging setup.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use forecast_core::error::ForecastError;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. With a `file`, events are also
/// written there as JSON through a non-blocking writer; keep the returned
/// guard alive until exit so buffered lines are flushed.
pub fn setup_logging(
    level: &str,
    json: bool,
    file: Option<&Path>,
) -> Result<Option<WorkerGuard>, ForecastError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    if json {
        layers.push(fmt::layer().json().boxed());
    } else {
        layers.push(fmt::layer().pretty().boxed());
    }

    let guard = match file {
        Some(path) => {
            let (dir, name) = split_log_path(path)?;
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(fmt::layer().json().with_ansi(false).with_writer(writer).boxed());
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| ForecastError::Internal(format!("failed to install logger: {}", e)))?;

    debug!(level, json, file = ?file, "logging initialized");
    Ok(guard)
}

fn split_log_path(path: &Path) -> Result<(PathBuf, OsString), ForecastError> {
    let name = path
        .file_name()
        .ok_or_else(|| ForecastError::Config(format!("log file has no name: {}", path.display())))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, name.to_os_string()))
}
