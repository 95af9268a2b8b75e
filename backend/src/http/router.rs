//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS for local tools.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/aggregates", get(handlers::get_aggregates))
        .route("/filter", get(handlers::get_filter).put(handlers::put_filter))
        .route("/cross-filter", post(handlers::post_cross_filter))
        .route("/charts/{chart_id}", get(handlers::get_chart))
        .route("/map", get(handlers::get_map))
        .route("/map/mode", post(handlers::post_map_mode))
        .route("/coverage", get(handlers::get_coverage));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
