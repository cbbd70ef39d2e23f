use async_trait::async_trait;
use gallery::ports::CacheStore;
use moka::future::Cache;
use shared::{Error, Result};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// Moka-based snapshot store.
/// Entries never expire on their own; freshness is judged by the caller from
/// the timestamp stored inside the value, so a stale entry stays readable
/// until it is overwritten.
pub struct MokaCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    cache: Cache<K, V>,
}

impl<K, V> MokaCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    /// Create a Moka cache from name and optional capacity
    pub fn new(name: String, max_entries: Option<u64>) -> Self {
        let mut builder = Cache::builder().name(&name);

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        Self {
            cache: builder.build(),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl<K, V> CacheStore<K, V> for MokaCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    async fn get(&self, key: &K) -> Result<V> {
        match self.cache.get(key).await {
            Some(value) => Ok(value),
            None => Err(Error::NotFound),
        }
    }

    async fn put(&self, key: K, val: V) -> Result<()> {
        debug!("Storing snapshot for {:?}", key);
        self.cache.insert(key, val).await;
        Ok(())
    }
}

impl<K, V> Debug for MokaCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery::{CacheEntry, ScrapeResult};

    fn snapshot(timestamp_millis: i64) -> CacheEntry {
        CacheEntry::new(
            ScrapeResult::new(Vec::new(), "2026-10-17T08:00:00.000Z"),
            timestamp_millis,
            1_800_000,
        )
    }

    #[tokio::test]
    async fn test_moka_cache_put_and_get() {
        let cache = MokaCache::new("test".to_string(), None);

        cache.put("target", "html").await.unwrap();

        assert_eq!(cache.get(&"target").await.unwrap(), "html");
    }

    #[tokio::test]
    async fn test_moka_cache_get_nonexistent() {
        let cache: MokaCache<&str, &str> = MokaCache::new("test".to_string(), None);

        let result = cache.get(&"nonexistent").await;
        assert!(matches!(result.unwrap_err(), Error::NotFound));
    }

    #[tokio::test]
    async fn test_snapshot_overwrite_replaces_entry() {
        let cache = MokaCache::new("snapshots".to_string(), Some(16));
        let key = "https://shop.example.com".to_string();

        cache.put(key.clone(), snapshot(1_000)).await.unwrap();
        cache.put(key.clone(), snapshot(2_000)).await.unwrap();

        let entry = cache.get(&key).await.unwrap();
        assert_eq!(entry.timestamp_millis, 2_000);
    }

    #[tokio::test]
    async fn test_stale_snapshot_stays_readable() {
        let cache = MokaCache::new("snapshots".to_string(), Some(16));
        let key = "https://shop.example.com".to_string();
        let entry = snapshot(0);

        cache.put(key.clone(), entry.clone()).await.unwrap();

        let stored = cache.get(&key).await.unwrap();
        assert!(!stored.is_fresh(10_000_000));
        assert_eq!(stored, entry);
    }

    #[tokio::test]
    async fn test_moka_cache_bounded() {
        let cache = MokaCache::new("bounded".to_string(), Some(2));

        cache.put("key1", "value1").await.unwrap();
        cache.put("key2", "value2").await.unwrap();
        cache.put("key3", "value3").await.unwrap();
        cache.cache.run_pending_tasks().await;

        assert!(cache.entry_count() <= 2, "Cache should have at most 2 entries");
    }
}
