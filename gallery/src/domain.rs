use serde::{Deserialize, Serialize};

/// One embedded post pulled out of the storefront gallery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: String,
    pub image_url: String,
    pub high_res_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub index: i64,
    pub username: String,
    pub created_time: Option<String>,
    pub caption: String,
    pub scraped_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub images: Vec<ImageRecord>,
    pub images_found: usize,
    pub scraped_at: String,
    pub message: String,
}

impl ScrapeResult {
    pub fn new(images: Vec<ImageRecord>, scraped_at: impl Into<String>) -> Self {
        let images_found = images.len();
        let message = if images_found == 0 {
            "No images found on the gallery page".to_string()
        } else {
            format!("Successfully scraped {images_found} images")
        };

        Self {
            images,
            images_found,
            scraped_at: scraped_at.into(),
            message,
        }
    }
}

/// The last good scrape together with when it was taken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    pub data: ScrapeResult,
    pub timestamp_millis: i64,
    pub ttl_millis: u64,
}

impl CacheEntry {
    pub fn new(data: ScrapeResult, timestamp_millis: i64, ttl_millis: u64) -> Self {
        Self {
            data,
            timestamp_millis,
            ttl_millis,
        }
    }

    /// Fresh while strictly less than `ttl_millis` has elapsed.
    pub fn is_fresh(&self, now_millis: i64) -> bool {
        let age = now_millis.saturating_sub(self.timestamp_millis);
        age < 0 || (age as u64) < self.ttl_millis
    }
}

/// Success body: `{ success, cached, images, imagesFound, scrapedAt, message }`.
#[derive(Clone, Debug, Serialize)]
pub struct ImagesResponse<'a> {
    pub success: bool,
    pub cached: bool,
    #[serde(flatten)]
    pub result: &'a ScrapeResult,
}
