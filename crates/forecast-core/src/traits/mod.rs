//! Core traits for the forecasting system.

mod data_source;
mod indicator;

pub use data_source::DataSource;
pub use indicator::{pad_leading, Indicator, MultiOutputIndicator, StreamingIndicator};
