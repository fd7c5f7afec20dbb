pub mod disk;
pub mod memory;

use crate::core::RateSnapshot;
use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use disk::DiskCache;
use memory::MemoryCache;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache holding fetched rate snapshots, keyed by base currency.
pub type RateCache = Arc<dyn Cache<String, RateSnapshot>>;

const RATES_PARTITION: &str = "rates";

/// Opens the rate cache described by the config.
///
/// A persistent cache that cannot be opened falls back to memory.
pub fn open_rate_cache(config: &AppConfig) -> RateCache {
    if !config.cache.persist {
        debug!("Using in-memory rate cache");
        return Arc::new(MemoryCache::<String, RateSnapshot>::new());
    }

    let opened = config.default_data_path().and_then(|path| {
        DiskCache::<String, RateSnapshot>::open(&path.join("cache"), RATES_PARTITION)
    });
    match opened {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            warn!(error = %e, "Could not open disk cache, using in-memory rate cache");
            Arc::new(MemoryCache::<String, RateSnapshot>::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateTable;
    use std::collections::HashMap;
    use std::time::Duration;

    fn snapshot() -> RateSnapshot {
        RateSnapshot::new(RateTable::new(
            "USD",
            HashMap::from([("EUR".to_string(), 0.9)]),
        ))
    }

    #[tokio::test]
    async fn test_persistent_cache_uses_data_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_path: Some(dir.path().to_string_lossy().into_owned()),
            ..AppConfig::default()
        };

        let cache = open_rate_cache(&config);
        let snap = snapshot();
        cache
            .put("USD".to_string(), snap.clone(), Some(Duration::from_secs(60)))
            .await;
        assert_eq!(cache.get(&"USD".to_string()).await, Some(snap));
        assert!(dir.path().join("cache").exists());
    }

    #[tokio::test]
    async fn test_memory_cache_when_not_persisting() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig {
            data_path: Some(dir.path().to_string_lossy().into_owned()),
            ..AppConfig::default()
        };
        config.cache.persist = false;

        let cache = open_rate_cache(&config);
        cache.put("USD".to_string(), snapshot(), None).await;
        assert!(cache.get(&"USD".to_string()).await.is_some());
        assert!(!dir.path().join("cache").exists());
    }
}
