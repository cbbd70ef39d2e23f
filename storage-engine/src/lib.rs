pub mod moka_cache;

pub use moka_cache::MokaCache;

use gallery::CacheEntry;
use std::sync::Arc;

/// Store for gallery snapshots: one entry per scrape target.
pub fn snapshot_store() -> Arc<MokaCache<String, CacheEntry>> {
    Arc::new(MokaCache::new("gallery-snapshots".to_string(), Some(16)))
}
