//! Core types and traits for the forecasting system.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceSeries, Timeframe)
//! - The error taxonomy shared by every component
//! - Core traits for indicators and price-history sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{CoreResult, ForecastError};
pub use types::*;
pub use traits::*;
