use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Build and configure the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Gallery routes
        .route(
            "/instagram-fetch",
            get(handlers::get_images).options(handlers::images_preflight),
        )
        .route("/placeholder-images", get(handlers::get_placeholder_images))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
