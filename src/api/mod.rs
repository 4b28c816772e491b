//! API Module
//!
//! HTTP handlers and routing for the cache admin API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /caches` - Metrics of every cache
//! - `GET /caches/:name` - Metrics of one cache
//! - `DELETE /caches/:name` - Empty one cache
//! - `POST /caches/:name/cleanup` - Sweep expired entries of one cache
//! - `POST /caches/:name/invalidate` - Drop keys by prefix

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
