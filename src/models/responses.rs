//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::caches::NamedMetrics;

/// Response body for GET /caches
#[derive(Debug, Clone, Serialize)]
pub struct CachesResponse {
    pub caches: Vec<NamedMetrics>,
}

impl CachesResponse {
    pub fn new(caches: Vec<NamedMetrics>) -> Self {
        Self { caches }
    }
}

/// Response body for cleanup and prefix invalidation
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    /// The cache that was swept
    pub name: String,
    /// Number of entries removed
    pub removed: usize,
}

impl RemovedResponse {
    pub fn new(name: impl Into<String>, removed: usize) -> Self {
        Self {
            name: name.into(),
            removed,
        }
    }
}

/// Response body for DELETE /caches/:name
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    pub name: String,
}

impl ClearResponse {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            message: format!("Cache '{}' cleared", name),
            name,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
