use serde::Serialize;
use serde_json::Value;
use shared::{Error, Result, TtlMs};
use std::collections::BTreeMap;

pub const GENERIC_FAILURE: &str = "Failed to scrape images";
pub const TIMEOUT_FAILURE: &str =
    "Request timed out - the gallery page is responding too slowly";

/// Transport-neutral response: status, JSON body and headers.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub body: Value,
    pub headers: BTreeMap<String, String>,
}

impl ResponseEnvelope {
    /// Plain JSON response carrying only the base CORS headers.
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Result<Self> {
        let body = serde_json::to_value(body).map_err(|e| Error::Internal(e.to_string()))?;

        Ok(Self {
            status_code,
            body,
            headers: base_headers(),
        })
    }

    /// 200 response that clients and CDNs may cache for `ttl`.
    pub fn cacheable<T: Serialize>(body: &T, ttl: TtlMs) -> Result<Self> {
        let mut envelope = Self::json(200, body)?;
        envelope.headers.insert(
            "Access-Control-Allow-Methods".into(),
            "GET, OPTIONS".into(),
        );
        envelope.headers.insert(
            "Access-Control-Allow-Headers".into(),
            "Content-Type".into(),
        );
        envelope.headers.insert(
            "Cache-Control".into(),
            format!("public, max-age={}", ttl.as_secs()),
        );
        Ok(envelope)
    }

    /// `{ success: false, error, imagesFound: 0 }` with the given status.
    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        let message: String = message.into();

        Self {
            status_code,
            body: serde_json::json!({
                "success": false,
                "error": message,
                "imagesFound": 0,
            }),
            headers: base_headers(),
        }
    }

    /// Shapes a fetch-path error into the failure envelope.
    ///
    /// Remote HTTP errors keep their status and body; timeouts and every
    /// other failure become a 500.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::HttpStatus { status, body } => {
                let status = if (400..=599).contains(status) { *status } else { 500 };
                let message = body
                    .as_deref()
                    .map(str::trim)
                    .filter(|b| !b.is_empty())
                    .unwrap_or(GENERIC_FAILURE);
                Self::failure(status, message)
            }
            Error::Timeout(_) => Self::failure(500, TIMEOUT_FAILURE),
            _ => Self::failure(500, GENERIC_FAILURE),
        }
    }

    /// 204 answer to a CORS preflight.
    pub fn preflight() -> Self {
        let mut headers = base_headers();
        headers.insert("Access-Control-Allow-Methods".into(), "GET, OPTIONS".into());
        headers.insert("Access-Control-Allow-Headers".into(), "Content-Type".into());

        Self {
            status_code: 204,
            body: Value::Null,
            headers,
        }
    }
}

fn base_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Access-Control-Allow-Origin".into(), "*".into());
    headers.insert("Content-Type".into(), "application/json".into());
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cacheable_sets_cors_and_cache_control() {
        let envelope =
            ResponseEnvelope::cacheable(&serde_json::json!({ "ok": true }), TtlMs(1_800_000))
                .unwrap();

        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(envelope.headers["Content-Type"], "application/json");
        assert_eq!(envelope.headers["Cache-Control"], "public, max-age=1800");
        assert!(envelope.headers.contains_key("Access-Control-Allow-Methods"));
        assert!(envelope.headers.contains_key("Access-Control-Allow-Headers"));
    }

    #[test]
    fn test_failure_has_no_cache_control() {
        let envelope = ResponseEnvelope::failure(500, "boom");

        assert_eq!(envelope.body["success"], false);
        assert_eq!(envelope.body["error"], "boom");
        assert_eq!(envelope.body["imagesFound"], 0);
        assert_eq!(envelope.headers["Access-Control-Allow-Origin"], "*");
        assert!(!envelope.headers.contains_key("Cache-Control"));
    }

    #[test]
    fn test_http_status_error_keeps_status_and_body() {
        let envelope = ResponseEnvelope::from_error(&Error::HttpStatus {
            status: 403,
            body: Some("Access denied".into()),
        });

        assert_eq!(envelope.status_code, 403);
        assert_eq!(envelope.body["error"], "Access denied");
    }

    #[test]
    fn test_http_status_error_without_body_uses_generic_message() {
        let envelope = ResponseEnvelope::from_error(&Error::HttpStatus {
            status: 502,
            body: Some("   ".into()),
        });

        assert_eq!(envelope.status_code, 502);
        assert_eq!(envelope.body["error"], GENERIC_FAILURE);
    }

    #[test]
    fn test_preflight_carries_base_and_cors_headers() {
        let envelope = ResponseEnvelope::preflight();

        assert_eq!(envelope.status_code, 204);
        assert_eq!(envelope.body, Value::Null);
        assert_eq!(envelope.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(envelope.headers["Content-Type"], "application/json");
        assert_eq!(envelope.headers["Access-Control-Allow-Methods"], "GET, OPTIONS");
        assert!(!envelope.headers.contains_key("Cache-Control"));
    }

    #[test]
    fn test_timeout_and_other_errors_are_500() {
        let timeout = ResponseEnvelope::from_error(&Error::Timeout(10_000));
        assert_eq!(timeout.status_code, 500);
        assert_eq!(timeout.body["error"], TIMEOUT_FAILURE);

        let network = ResponseEnvelope::from_error(&Error::Network("dns error".into()));
        assert_eq!(network.status_code, 500);
        assert_eq!(network.body["error"], GENERIC_FAILURE);
    }
}
