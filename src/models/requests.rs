//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for prefix invalidation (POST /caches/:name/invalidate)
///
/// # Fields
/// - `prefix`: Every key starting with this text is removed
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    pub prefix: String,
}

impl InvalidateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid. An empty
    /// prefix would match every key; clearing a cache has its own endpoint.
    pub fn validate(&self) -> Option<String> {
        if self.prefix.is_empty() {
            return Some("Prefix cannot be empty".to_string());
        }
        None
    }
}
