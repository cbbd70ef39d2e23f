use gallery::clock::SystemClock;
use gallery::http_fetcher::HttpPageFetcher;
use gallery::placeholder::PlaceholderImageService;
use gallery::ImageFetchService;
use shared::config::Config;
use std::sync::Arc;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub images: Arc<ImageFetchService>,
    pub placeholders: Arc<PlaceholderImageService>,
}

impl AppState {
    pub fn new(images: Arc<ImageFetchService>, placeholders: Arc<PlaceholderImageService>) -> Self {
        Self {
            images,
            placeholders,
        }
    }

    /// Wires the production adapters: reqwest fetcher, Moka snapshot store
    /// and the system clock.
    pub fn from_config(config: &Config) -> shared::Result<Self> {
        let fetcher = Arc::new(HttpPageFetcher::new(config.scrape.fetch_timeout)?);
        let store = storage_engine::snapshot_store();

        tracing::info!(
            "Gallery target {} (@{}), TTL {}s, fetch timeout {:?}",
            config.scrape.target_url,
            config.scrape.target_username,
            config.scrape.ttl.as_secs(),
            config.scrape.fetch_timeout
        );

        let images = Arc::new(ImageFetchService::new(
            config.scrape.clone(),
            fetcher,
            store,
            Arc::new(SystemClock),
        ));
        let placeholders = Arc::new(PlaceholderImageService::new(
            config.placeholder_base_url.clone(),
            config.scrape.fetch_timeout,
        )?);

        Ok(Self::new(images, placeholders))
    }
}
