use crate::TtlMs;
use std::time::Duration;
use tracing::warn;

/// Settings for the gallery scrape: where to fetch, whose posts to keep,
/// and how long a scrape stays fresh.
#[derive(Clone, Debug)]
pub struct ScrapeConfig {
    pub target_url: String,
    pub target_username: String,
    pub ttl: TtlMs,
    pub fetch_timeout: Duration,
}

impl ScrapeConfig {
    pub const DEFAULT_TARGET_URL: &str = "https://www.youngla.com";
    pub const DEFAULT_TARGET_USERNAME: &str = "youngla";
    pub const DEFAULT_TTL_SECS: u64 = 1800;
    pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

    pub fn new(target_url: impl Into<String>, target_username: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            target_username: target_username.into(),
            ttl: TtlMs::from_secs(Self::DEFAULT_TTL_SECS),
            fetch_timeout: Duration::from_secs(Self::DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TARGET_URL, Self::DEFAULT_TARGET_USERNAME)
    }
}

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub scrape: ScrapeConfig,
    pub placeholder_base_url: String,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    const DEFAULT_PLACEHOLDER_URL: &str = "https://picsum.photos/300/200";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup, so callers can
    /// feed a map instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_u64 = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let target_url = lookup("GALLERY_TARGET_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                warn!(
                    "GALLERY_TARGET_URL not set, scraping {}",
                    ScrapeConfig::DEFAULT_TARGET_URL
                );
                ScrapeConfig::DEFAULT_TARGET_URL.to_string()
            });

        Self {
            host: lookup("GALLERY_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            http_port: lookup("GALLERY_HTTP_PORT")
                .and_then(|v| v.trim().parse::<u16>().ok())
                .unwrap_or(Self::DEFAULT_HTTP_PORT),
            scrape: ScrapeConfig {
                target_url,
                target_username: lookup("GALLERY_TARGET_USERNAME")
                    .unwrap_or_else(|| ScrapeConfig::DEFAULT_TARGET_USERNAME.to_string()),
                ttl: TtlMs::from_secs(parse_u64(
                    "GALLERY_CACHE_TTL_SECS",
                    ScrapeConfig::DEFAULT_TTL_SECS,
                )),
                fetch_timeout: Duration::from_secs(parse_u64(
                    "GALLERY_FETCH_TIMEOUT_SECS",
                    ScrapeConfig::DEFAULT_FETCH_TIMEOUT_SECS,
                )),
            },
            placeholder_base_url: lookup("GALLERY_PLACEHOLDER_URL")
                .unwrap_or_else(|| Self::DEFAULT_PLACEHOLDER_URL.to_string()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = Config::from_lookup(|_| None);

        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.scrape.target_url, "https://www.youngla.com");
        assert_eq!(config.scrape.target_username, "youngla");
        assert_eq!(config.scrape.ttl, TtlMs(1_800_000));
        assert_eq!(config.scrape.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.placeholder_base_url, "https://picsum.photos/300/200");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("GALLERY_TARGET_URL", "https://shop.example.com/pages/gallery"),
            ("GALLERY_TARGET_USERNAME", "examplestore"),
            ("GALLERY_CACHE_TTL_SECS", "60"),
            ("GALLERY_FETCH_TIMEOUT_SECS", "3"),
            ("GALLERY_HTTP_PORT", "9090"),
        ]));

        assert_eq!(config.scrape.target_url, "https://shop.example.com/pages/gallery");
        assert_eq!(config.scrape.target_username, "examplestore");
        assert_eq!(config.scrape.ttl.as_secs(), 60);
        assert_eq!(config.scrape.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.http_port, 9090);
    }

    #[test]
    fn test_unparseable_numbers_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("GALLERY_CACHE_TTL_SECS", "half an hour"),
            ("GALLERY_HTTP_PORT", "99999"),
            ("GALLERY_TARGET_URL", "   "),
        ]));

        assert_eq!(config.scrape.ttl.as_secs(), 1800);
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.scrape.target_url, ScrapeConfig::DEFAULT_TARGET_URL);
    }
}
