use crate::api::responses::EnvelopeResponse;
use crate::state::AppState;
use axum::extract::State;
use gallery::ResponseEnvelope;
use tracing::{error, info};

/// GET /instagram-fetch
pub async fn get_images(State(state): State<AppState>) -> EnvelopeResponse {
    match state.images.get_images().await {
        Ok(envelope) => {
            info!(
                "GET_IMAGES: status={}, cached={}",
                envelope.status_code, envelope.body["cached"]
            );
            envelope.into()
        }
        Err(err) => {
            error!("GET_IMAGES: snapshot store failed: {}", err);
            ResponseEnvelope::from_error(&err).into()
        }
    }
}

/// OPTIONS /instagram-fetch
pub async fn images_preflight() -> EnvelopeResponse {
    ResponseEnvelope::preflight().into()
}
