//! Indicator trait definitions.

use crate::error::IndicatorError;

/// Left-pad a warm-up-trimmed output so it lines up with its input.
///
/// Indicators emit one value per input point once their window is
/// satisfied; the missing prefix becomes `None`.
pub fn pad_leading<T>(values: Vec<T>, len: usize) -> Vec<Option<T>> {
    let missing = len.saturating_sub(values.len());
    let mut aligned = Vec::with_capacity(len.max(values.len()));
    aligned.extend(std::iter::repeat_with(|| None).take(missing));
    aligned.extend(values.into_iter().map(Some));
    aligned
}

/// Trait for technical indicators.
///
/// Indicators map a price series to a derived series such as RSI or an
/// exponential average.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically prices)
    ///
    /// # Returns
    /// One value per input point after the warm-up window, or an empty
    /// vector if the data never fills the window.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Calculate and align to the input: undefined warm-up entries are `None`.
    fn calculate_aligned(&self, data: &[f64]) -> Vec<Option<Self::Output>> {
        pad_leading(self.calculate(data), data.len())
    }

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.period() {
            return Err(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }
}

/// Streaming indicator that maintains internal state.
///
/// Unlike batch indicators, streaming indicators can be updated
/// incrementally with new data points.
pub trait StreamingIndicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Update the indicator with a new value.
    ///
    /// Returns the current indicator value, or None if not yet ready.
    fn update(&mut self, value: f64) -> Option<Self::Output>;

    /// Get the current value without adding new data.
    fn current(&self) -> Option<Self::Output>;

    /// Reset the indicator state.
    fn reset(&mut self);

    /// Check if the indicator has enough data to produce values.
    fn is_ready(&self) -> bool;
}

/// Multi-output indicator (e.g., Bollinger Bands, MACD).
///
/// Some indicators produce multiple related values.
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Outputs>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Calculate and align to the input: undefined warm-up entries are `None`.
    fn calculate_aligned(&self, data: &[f64]) -> Vec<Option<Self::Outputs>> {
        pad_leading(self.calculate(data), data.len())
    }
}
