use crate::clock::iso_timestamp;
use crate::domain::{CacheEntry, ImagesResponse, ScrapeResult};
use crate::envelope::ResponseEnvelope;
use crate::ports::{CacheStore, Clock, PageFetcher};
use crate::scrape::extract_images;
use shared::config::ScrapeConfig;
use shared::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Serves the storefront's Instagram gallery from a TTL snapshot, scraping
/// the target page again once the snapshot goes stale.
///
/// Every request decides hit-or-refresh on its own. There is no request
/// coalescing: concurrent misses each fetch and the last write wins.
#[derive(Clone)]
pub struct ImageFetchService {
    config: ScrapeConfig,
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn CacheStore<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl ImageFetchService {
    pub fn new(
        config: ScrapeConfig,
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn CacheStore<String, CacheEntry>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            fetcher,
            store,
            clock,
        }
    }

    pub async fn get_images(&self) -> Result<ResponseEnvelope> {
        self.get_images_at(self.clock.now_millis()).await
    }

    /// Answers from the snapshot if it is younger than the TTL at
    /// `now_millis`, otherwise scrapes and stores a new one.
    ///
    /// Fetch and parse failures come back as an `Ok` failure envelope and
    /// leave the stored snapshot alone. `Err` means the cache store failed.
    pub async fn get_images_at(&self, now_millis: i64) -> Result<ResponseEnvelope> {
        if let Some(entry) = self.fresh_entry(now_millis).await? {
            debug!(
                "Serving cached gallery for {} ({} images)",
                self.config.target_url, entry.data.images_found
            );
            return self.respond(&entry.data, true);
        }

        match self.scrape(now_millis).await {
            Ok(result) => {
                let entry = CacheEntry::new(result, now_millis, self.config.ttl.0);
                self.store
                    .put(self.config.target_url.clone(), entry.clone())
                    .await?;
                info!(
                    "Refreshed gallery for {}: {} images",
                    self.config.target_url, entry.data.images_found
                );
                self.respond(&entry.data, false)
            }
            Err(err) => {
                warn!(
                    "Gallery refresh for {} failed: {}",
                    self.config.target_url, err
                );
                Ok(ResponseEnvelope::from_error(&err))
            }
        }
    }

    async fn fresh_entry(&self, now_millis: i64) -> Result<Option<CacheEntry>> {
        match self.store.get(&self.config.target_url).await {
            Ok(entry) if entry.is_fresh(now_millis) => Ok(Some(entry)),
            Ok(_) | Err(Error::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn scrape(&self, now_millis: i64) -> Result<ScrapeResult> {
        let html = self.fetcher.fetch(&self.config.target_url).await?;
        let scraped_at = iso_timestamp(now_millis);
        let images = extract_images(&html, &self.config.target_username, &scraped_at)?;

        Ok(ScrapeResult::new(images, scraped_at))
    }

    fn respond(&self, result: &ScrapeResult, cached: bool) -> Result<ResponseEnvelope> {
        ResponseEnvelope::cacheable(
            &ImagesResponse {
                success: true,
                cached,
                result,
            },
            self.config.ttl,
        )
    }
}

impl std::fmt::Debug for ImageFetchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetchService")
            .field("config", &self.config)
            .finish()
    }
}
