//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::caches::{CacheRegistry, HerdCaches, NamedMetrics};
use crate::error::{CacheError, Result};
use crate::models::{
    CachesResponse, ClearResponse, HealthResponse, InvalidateRequest, RemovedResponse,
};

/// Application state shared across all handlers.
///
/// Holds type-erased handles to the same caches the application services
/// use; registry clones share the underlying stores.
#[derive(Clone, Debug)]
pub struct AppState {
    pub caches: CacheRegistry,
}

impl AppState {
    /// Creates a new AppState over the given registry.
    pub fn new(caches: CacheRegistry) -> Self {
        Self { caches }
    }

    /// Creates a new AppState exposing every concern cache.
    pub fn from_caches(caches: &HerdCaches) -> Self {
        Self::new(caches.registry())
    }
}

/// Handler for GET /caches
///
/// Returns the metrics of every registered cache.
pub async fn list_handler(State(state): State<AppState>) -> Json<CachesResponse> {
    Json(CachesResponse::new(state.caches.metrics()))
}

/// Handler for GET /caches/:name
///
/// Returns the metrics of one cache.
pub async fn metrics_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<NamedMetrics>> {
    let metrics = state.caches.get(&name)?.metrics();
    Ok(Json(NamedMetrics { name, metrics }))
}

/// Handler for POST /caches/:name/cleanup
///
/// Removes expired entries from one cache.
pub async fn cleanup_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RemovedResponse>> {
    let removed = state.caches.get(&name)?.cleanup();
    info!(cache = %name, removed, "manual expiry sweep");
    Ok(Json(RemovedResponse::new(name, removed)))
}

/// Handler for POST /caches/:name/invalidate
///
/// Removes every key of one cache starting with the given prefix.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<RemovedResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = state.caches.get(&name)?.invalidate_prefix(&req.prefix);
    info!(cache = %name, prefix = %req.prefix, removed, "invalidated by prefix");
    Ok(Json(RemovedResponse::new(name, removed)))
}

/// Handler for DELETE /caches/:name
///
/// Empties one cache and resets its counters.
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ClearResponse>> {
    state.caches.get(&name)?.clear();
    info!(cache = %name, "cache cleared");
    Ok(Json(ClearResponse::new(name)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn state() -> (HerdCaches, AppState) {
        let caches = HerdCaches::from_config(&Config::default());
        let state = AppState::from_caches(&caches);
        (caches, state)
    }

    #[tokio::test]
    async fn test_list_handler() {
        let (caches, state) = state();
        caches.search.set("q:1", Arc::new(json!([])));

        let response = list_handler(State(state)).await;
        assert_eq!(response.caches.len(), 3);
        assert_eq!(response.caches[0].metrics.size, 1);
    }

    #[tokio::test]
    async fn test_metrics_handler_unknown_cache() {
        let (_, state) = state();

        let result = metrics_handler(State(state), Path("pedigrees".to_string())).await;
        assert!(matches!(result, Err(CacheError::UnknownCache(_))));
    }

    #[tokio::test]
    async fn test_cleanup_handler() {
        let (caches, state) = state();
        caches
            .images
            .set_with_ttl("photo:1", Arc::from(vec![1u8]), Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(5)).await;

        let response = cleanup_handler(State(state), Path("images".to_string()))
            .await
            .unwrap();
        assert_eq!(response.removed, 1);
        assert!(caches.images.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_handler() {
        let (caches, state) = state();
        caches.statistics.set("herd:1:avg", Arc::new(json!(1.5)));
        caches.statistics.set("herd:1:count", Arc::new(json!(12)));
        caches.statistics.set("herd:2:count", Arc::new(json!(4)));

        let req = InvalidateRequest {
            prefix: "herd:1:".to_string(),
        };
        let response = invalidate_handler(State(state), Path("statistics".to_string()), Json(req))
            .await
            .unwrap();

        assert_eq!(response.removed, 2);
        assert_eq!(caches.statistics.keys(), vec!["herd:2:count"]);
    }

    #[tokio::test]
    async fn test_invalidate_empty_prefix() {
        let (_, state) = state();

        let req = InvalidateRequest {
            prefix: "".to_string(),
        };
        let result = invalidate_handler(State(state), Path("search".to_string()), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_clear_handler() {
        let (caches, state) = state();
        caches.search.set("q:1", Arc::new(json!([])));

        clear_handler(State(state), Path("search".to_string()))
            .await
            .unwrap();
        assert!(caches.search.is_empty());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
