//! Placeholder images for theme previews.
//!
//! Picsum answers every variant URL with a `302` to a concrete image; the
//! `Location` of that redirect is the stable URL handed back to the theme.

use crate::envelope::ResponseEnvelope;
use futures::future::join_all;
use reqwest::{Client, StatusCode, header::LOCATION, redirect::Policy};
use serde::Serialize;
use shared::{Error, Result};
use std::time::Duration;
use tracing::{debug, info};

const VARIANTS: [&str; 12] = [
    "",
    "?grayscale",
    "?blur",
    "?grayscale&blur",
    "?random=1",
    "?grayscale&random=2",
    "?blur&random=3",
    "?grayscale&blur&random=4",
    "?random=5",
    "?grayscale&random=6",
    "?blur&random=7",
    "?grayscale&blur&random=8",
];

#[derive(Debug, Serialize)]
pub struct PlaceholderImages {
    pub images: Vec<String>,
}

/// Every grayscale/blur/random variant of `base_url`, in a fixed order.
pub fn variant_urls(base_url: &str) -> Vec<String> {
    VARIANTS
        .iter()
        .map(|suffix| format!("{base_url}{suffix}"))
        .collect()
}

#[derive(Clone, Debug)]
pub struct PlaceholderImageService {
    client: Client,
    base_url: String,
}

impl PlaceholderImageService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Resolves all variants concurrently and keeps the ones that redirected.
    pub async fn get_images(&self) -> Result<ResponseEnvelope> {
        let urls = variant_urls(&self.base_url);
        let resolved = join_all(urls.iter().map(|url| self.resolve(url))).await;
        let images: Vec<String> = resolved.into_iter().flatten().collect();

        info!("Resolved {} of {} placeholder images", images.len(), urls.len());
        ResponseEnvelope::json(200, &PlaceholderImages { images })
    }

    /// `Location` of a `302` answer; anything else resolves to nothing.
    async fn resolve(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Placeholder {} failed: {}", url, e);
                return None;
            }
        };

        if response.status() != StatusCode::FOUND {
            debug!("Placeholder {} answered {}", url, response.status());
            return None;
        }

        response
            .headers()
            .get(LOCATION)
            .and_then(|location| location.to_str().ok())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        extract::RawQuery,
        http::{StatusCode as AxumStatus, header},
        response::IntoResponse,
        routing::get,
    };
    use tokio::net::TcpListener;

    #[test]
    fn test_variant_urls_cover_every_combination() {
        let urls = variant_urls("https://picsum.photos/300/200");

        assert_eq!(urls.len(), 12);
        assert_eq!(urls[0], "https://picsum.photos/300/200");
        assert_eq!(urls[3], "https://picsum.photos/300/200?grayscale&blur");
        assert_eq!(urls[11], "https://picsum.photos/300/200?grayscale&blur&random=8");
    }

    // Redirects every variant except `?blur` (500), `?random=5` (200) and
    // `?random=1` (302 without a Location).
    async fn fake_picsum(RawQuery(query): RawQuery) -> axum::response::Response {
        match query.as_deref() {
            Some("blur") => AxumStatus::INTERNAL_SERVER_ERROR.into_response(),
            Some("random=5") => (AxumStatus::OK, "not a redirect").into_response(),
            Some("random=1") => AxumStatus::FOUND.into_response(),
            other => {
                let id = other.unwrap_or("plain").replace(['&', '='], "-");
                (
                    AxumStatus::FOUND,
                    [(header::LOCATION, format!("https://fastly.picsum.photos/id/{id}.jpg"))],
                )
                    .into_response()
            }
        }
    }

    #[tokio::test]
    async fn test_get_images_keeps_only_redirects_in_order() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let router = Router::new().route("/300/200", get(fake_picsum));
            axum::serve(listener, router).await.unwrap();
        });

        let service =
            PlaceholderImageService::new(format!("http://{addr}/300/200"), Duration::from_secs(5))
                .unwrap();
        let envelope = service.get_images().await.unwrap();

        assert_eq!(envelope.status_code, 200);
        let images: Vec<&str> = envelope.body["images"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(images.len(), 9);
        assert_eq!(images[0], "https://fastly.picsum.photos/id/plain.jpg");
        assert_eq!(images[1], "https://fastly.picsum.photos/id/grayscale.jpg");
        assert_eq!(images[2], "https://fastly.picsum.photos/id/grayscale-blur.jpg");
        assert_eq!(images[3], "https://fastly.picsum.photos/id/grayscale-random-2.jpg");
        assert!(!images.iter().any(|url| url.ends_with("/random-5.jpg")));
        assert!(!images.iter().any(|url| url.ends_with("/random-1.jpg")));
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_empty_list() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service =
            PlaceholderImageService::new(format!("http://{addr}/300/200"), Duration::from_secs(5))
                .unwrap();
        let envelope = service.get_images().await.unwrap();

        assert_eq!(envelope.status_code, 200);
        assert!(envelope.body["images"].as_array().unwrap().is_empty());
    }
}
