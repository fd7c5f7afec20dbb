use crate::core::currency::{RateProvider, RateSnapshot};
use crate::store::RateCache;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Serves rate snapshots from a cache while they are fresh.
///
/// Only successful fetches are cached, so a failure is retried on the next call.
/// An expired entry is never served, even when the refetch fails.
pub struct CachingRateProvider<T: RateProvider> {
    inner: T,
    cache: RateCache,
    key: String,
    ttl: Duration,
}

impl<T: RateProvider> CachingRateProvider<T> {
    pub fn new(inner: T, cache: RateCache, base_currency: &str, ttl: Duration) -> Self {
        Self {
            inner,
            cache,
            key: base_currency.to_uppercase(),
            ttl,
        }
    }

    /// Drops the cached snapshot so the next fetch goes to the network.
    pub async fn invalidate(&self) {
        debug!("Invalidating cached rates for {}", self.key);
        self.cache.remove(&self.key).await;
    }
}

#[async_trait]
impl<T: RateProvider> RateProvider for CachingRateProvider<T> {
    async fn fetch_rates(&self) -> Result<RateSnapshot> {
        if let Some(cached) = self.cache.get(&self.key).await {
            debug!("Cache hit for rates: {}", self.key);
            return Ok(cached);
        }
        debug!("Cache miss for rates: {}", self.key);
        let snapshot = self.inner.fetch_rates().await?;
        self.cache
            .put(self.key.clone(), snapshot.clone(), Some(self.ttl))
            .await;
        Ok(snapshot)
    }
}
