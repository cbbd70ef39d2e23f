pub mod clock;
pub mod domain;
pub mod envelope;
pub mod http_fetcher;
pub mod placeholder;
pub mod ports;
pub mod scrape;
pub mod service;

pub use domain::{CacheEntry, ImageRecord, ScrapeResult};
pub use envelope::ResponseEnvelope;
pub use service::ImageFetchService;
