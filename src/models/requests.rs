//! Request DTOs for the cache service API

use serde::Deserialize;

/// Query string of `PUT /api/v1/cache/:key`
///
/// # Fields
/// - `ttl`: Optional TTL in seconds; absent or 0 stores without expiry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetQuery {
    #[serde(default)]
    pub ttl: Option<u64>,
}
