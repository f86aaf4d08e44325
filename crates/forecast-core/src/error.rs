//! Error types for the forecasting system.

use thiserror::Error;

/// Top-level forecasting system error.
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Invalid forecast parameter: {0}")]
    Parameter(#[from] ParameterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Price-history errors.
///
/// `EmptySeries` is the only hard insufficient-data failure; short series
/// are otherwise reported in-band by the indicator engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Price series is empty")]
    EmptySeries,

    #[error("Timestamps must be strictly increasing (violated at index {index})")]
    NonIncreasingTimestamp { index: usize },

    #[error("Close price at index {index} must be positive and finite, got {value}")]
    InvalidClose { index: usize, value: f64 },

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Indicator not present in set: {0}")]
    MissingIndicator(String),

    #[error("Length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Forecast parameter errors, raised before any simulation work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("sigma must be >= 0, got {0}")]
    NegativeSigma(f64),

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("current price must be > 0, got {0}")]
    NonPositivePrice(f64),

    #[error("simulation count must be at least 1")]
    ZeroSimulations,

    #[error("step size must be > 0, got {0}")]
    NonPositiveStepSize(f64),

    #[error("horizon must be >= 0, got {0}")]
    NegativeHorizon(f64),

    #[error("confidence level must be in (0, 1), got {0}")]
    InvalidConfidence(f64),
}

/// Result type alias for forecasting operations.
pub type CoreResult<T> = Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let err: ForecastError = ParameterError::ZeroSimulations.into();
        assert!(matches!(err, ForecastError::Parameter(_)));
        assert!(err.to_string().contains("simulation count"));

        let err: ForecastError = DataError::EmptySeries.into();
        assert_eq!(err.to_string(), "Data error: Price series is empty");
    }
}
