use crate::core::cache::Cache;
use anyhow::Result;
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<SystemTime>,
}

/// Cache stored in a fjall partition, so entries outlive the process.
///
/// Keys and values are stored as JSON. Storage errors are logged and treated as
/// a miss; the cache never fails its caller.
pub struct DiskCache<K, V> {
    keyspace: Keyspace,
    partition: PartitionHandle,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> DiskCache<K, V> {
    pub fn open(path: &Path, name: &str) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let keyspace = Config::new(path).open()?;
        let partition = keyspace.open_partition(name, PartitionCreateOptions::default())?;
        debug!("Opened disk cache {} at {}", name, path.display());
        Ok(Self {
            keyspace,
            partition,
            _marker: PhantomData,
        })
    }
}

impl<K, V> DiskCache<K, V>
where
    K: Serialize + Debug,
    V: Serialize + DeserializeOwned,
{
    fn read(&self, key: &K) -> Result<Option<V>> {
        let raw_key = serde_json::to_vec(key)?;
        let Some(raw) = self.partition.get(&raw_key)? else {
            debug!("Cache MISS for key: {:?}", key);
            return Ok(None);
        };
        let entry: CacheEntry<V> = serde_json::from_slice(&raw)?;
        if entry
            .expires_at
            .is_some_and(|expires_at| SystemTime::now() >= expires_at)
        {
            debug!("Cache entry expired for key: {:?}", key);
            self.partition.remove(raw_key)?;
            return Ok(None);
        }
        debug!("Cache HIT for key: {:?}", key);
        Ok(Some(entry.value))
    }

    fn write(&self, key: &K, value: V, ttl: Option<Duration>) -> Result<()> {
        let expires_at = ttl.map(|d| SystemTime::now() + d);
        let entry = CacheEntry { value, expires_at };
        self.partition
            .insert(serde_json::to_vec(key)?, serde_json::to_vec(&entry)?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Cache PUT for key: {:?}", key);
        Ok(())
    }

    fn delete(&self, key: &K) -> Result<()> {
        self.partition.remove(serde_json::to_vec(key)?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn delete_all(&self) -> Result<()> {
        let keys = self
            .partition
            .keys()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for key in keys {
            self.partition.remove(key)?;
        }
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

#[async_trait]
impl<K, V> Cache<K, V> for DiskCache<K, V>
where
    K: Serialize + Debug + Send + Sync + 'static,
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        match self.read(key) {
            Ok(value) => value,
            Err(e) => {
                debug!("DiskCache get error: {}", e);
                None
            }
        }
    }

    async fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        if let Err(e) = self.write(&key, value, ttl) {
            debug!("DiskCache put error: {}", e);
        }
    }

    async fn remove(&self, key: &K) {
        if let Err(e) = self.delete(key) {
            debug!("DiskCache remove error: {}", e);
        }
    }

    async fn clear(&self) {
        if let Err(e) = self.delete_all() {
            debug!("DiskCache clear error: {}", e);
        }
    }
}
