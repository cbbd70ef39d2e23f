#![deny(clippy::all)]

use async_trait::async_trait;
use shared::Result;

// Ports are the pluggable seams: where the cache lives, how pages are
// fetched, and what time it is.

/// Port for the snapshot cache (e.g., Moka)
#[async_trait]
pub trait CacheStore<K, V>: Send + Sync + 'static {
    /// Returns `Error::NotFound` when nothing is stored under `key`.
    async fn get(&self, key: &K) -> Result<V>;
    /// Replaces whatever was stored under `key`.
    async fn put(&self, key: K, val: V) -> Result<()>;
}

/// Port for retrieving the raw HTML of a page
#[async_trait]
pub trait PageFetcher: Send + Sync + 'static {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Port for the current wall-clock time in milliseconds since the UNIX epoch
pub trait Clock: Send + Sync + 'static {
    fn now_millis(&self) -> i64;
}
