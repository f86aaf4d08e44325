//! Price-history source trait.

use crate::error::DataError;
use crate::types::{PriceSeries, Timeframe};
use async_trait::async_trait;

/// Trait for historical price sources.
///
/// Network, file and exchange access live behind this seam; the
/// computational crates only ever see the resulting `PriceSeries`.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch price history.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `lookback` - Maximum number of most recent bars to return
    /// * `interval` - The bar sampling interval
    ///
    /// # Returns
    /// A validated series ordered from oldest to newest. Missing bars are
    /// allowed; an empty result is an error.
    async fn fetch_price_history(
        &self,
        symbol: &str,
        lookback: usize,
        interval: Timeframe,
    ) -> Result<PriceSeries, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
