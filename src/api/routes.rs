//! API Routes
//!
//! Configures the Axum router with all admin endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_handler, clear_handler, health_handler, invalidate_handler, list_handler,
    metrics_handler, AppState,
};

/// Creates the admin router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /caches` - Metrics of every cache
/// - `GET /caches/:name` - Metrics of one cache
/// - `DELETE /caches/:name` - Empty one cache
/// - `POST /caches/:name/cleanup` - Sweep expired entries of one cache
/// - `POST /caches/:name/invalidate` - Drop keys by prefix
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/caches", get(list_handler))
        .route("/caches/:name", get(metrics_handler).delete(clear_handler))
        .route("/caches/:name/cleanup", post(cleanup_handler))
        .route("/caches/:name/invalidate", post(invalidate_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
