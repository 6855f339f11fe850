use axum::{response::Redirect, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use super::handlers;
use crate::config::ServerConfig;
use crate::metrics::SearchMetrics;
use crate::models::JsonDocuments;
use crate::search::SearchIndex;

/// Application state shared across all handlers
pub struct AppState {
    pub index: SearchIndex,
    /// Raw documents by id, present when the service was started from a
    /// documents file rather than a prebuilt index.
    pub docs: Option<JsonDocuments>,
    pub metrics: SearchMetrics,
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let state = Arc::new(state);

    let mut router = Router::new()
        .route("/search", get(handlers::search))
        .route("/docs", get(handlers::docs))
        .route("/rawIndex", get(handlers::raw_index))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics));

    if let Some(app_dir) = &config.static_app_dir {
        router = router
            .nest_service("/app", ServeDir::new(app_dir))
            .route("/", get(|| async { Redirect::to("/app") }));
    }

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
