use crate::api::responses::EnvelopeResponse;
use crate::state::AppState;
use axum::extract::State;
use gallery::ResponseEnvelope;
use tracing::error;

/// GET /placeholder-images
pub async fn get_placeholder_images(State(state): State<AppState>) -> EnvelopeResponse {
    match state.placeholders.get_images().await {
        Ok(envelope) => envelope.into(),
        Err(err) => {
            error!("GET_PLACEHOLDER_IMAGES: {}", err);
            ResponseEnvelope::failure(500, "Failed to resolve placeholder images").into()
        }
    }
}
