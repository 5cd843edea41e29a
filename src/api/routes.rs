use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
///
/// CORS is wide open because the browser client is served from a different
/// origin.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Statistical ranking
        .route("/ml", post(handlers::recommend_similarity))
        // Generative ranking
        .route("/llm", post(handlers::recommend_generative))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
