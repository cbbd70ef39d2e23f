use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use gallery::ResponseEnvelope;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Adapts a [`ResponseEnvelope`] into an axum response, copying status,
/// headers and the JSON body verbatim.
pub struct EnvelopeResponse(pub ResponseEnvelope);

impl From<ResponseEnvelope> for EnvelopeResponse {
    fn from(envelope: ResponseEnvelope) -> Self {
        Self(envelope)
    }
}

impl IntoResponse for EnvelopeResponse {
    fn into_response(self) -> Response {
        let envelope = self.0;
        let status =
            StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = if envelope.body.is_null() {
            Body::empty()
        } else {
            match serde_json::to_vec(&envelope.body) {
                Ok(bytes) => Body::from(bytes),
                Err(e) => {
                    tracing::error!("Failed to encode response body: {}", e);
                    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                }
            }
        };

        let mut response = Response::new(body);
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in &envelope.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!("Dropping invalid response header {}: {}", name, value),
            }
        }

        response
    }
}
