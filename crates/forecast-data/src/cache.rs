//! Time-bounded memoization of price history.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use forecast_core::error::DataError;
use forecast_core::traits::DataSource;
use forecast_core::types::{PriceSeries, Timeframe};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    symbol: String,
    lookback: usize,
    interval: Timeframe,
}

struct CacheEntry {
    series: PriceSeries,
    fetched_at: Instant,
}

/// Wraps a [`DataSource`], reusing each fetched series for `ttl`.
pub struct CachedDataSource<S> {
    inner: S,
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl<S: DataSource> CachedDataSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached series for a symbol.
    pub async fn invalidate(&self, symbol: &str) {
        self.entries.write().await.retain(|k, _| k.symbol != symbol);
    }

    /// Drop everything.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of entries, fresh or stale.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl<S: DataSource> DataSource for CachedDataSource<S> {
    async fn fetch_price_history(
        &self,
        symbol: &str,
        lookback: usize,
        interval: Timeframe,
    ) -> Result<PriceSeries, DataError> {
        let key = CacheKey {
            symbol: symbol.to_string(),
            lookback,
            interval,
        };

        if let Some(entry) = self.entries.read().await.get(&key) {
            if entry.fetched_at.elapsed() < self.ttl {
                debug!(symbol, lookback, %interval, "price history cache hit");
                return Ok(entry.series.clone());
            }
        }

        debug!(symbol, lookback, %interval, source = self.inner.name(), "price history cache miss");
        let series = self
            .inner
            .fetch_price_history(symbol, lookback, interval)
            .await?;

        self.entries.write().await.insert(
            key,
            CacheEntry {
                series: series.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
