//! API Module
//!
//! HTTP handlers and routing for the cache service REST API.
//!
//! # Endpoints
//! - `GET /api/v1/cache/:key` - Retrieve a value
//! - `PUT /api/v1/cache/:key` - Store a value (`?ttl=<seconds>` optional)
//! - `DELETE /api/v1/cache/:key` - Delete a value
//! - `HEAD /api/v1/cache/:key` - Check whether a key exists
//! - `GET /health` - Store liveness

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
