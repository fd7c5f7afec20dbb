use async_trait::async_trait;
use std::time::Duration;

/// A key-value cache whose entries may carry a time-to-live.
///
/// Expired entries behave exactly like missing ones.
#[async_trait]
pub trait Cache<K, V>: Send + Sync
where
    K: Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Option<V>;
    async fn put(&self, key: K, value: V, ttl: Option<Duration>);
    async fn remove(&self, key: &K);
    async fn clear(&self);
}
