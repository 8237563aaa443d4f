//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint. They map the cache
//! layer's outcomes onto status codes: a missing key is a 404, an unavailable
//! store is a 500 with a generic message.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use crate::cache::CacheService;
use crate::error::ApiError;
use crate::health::LivenessReporter;
use crate::models::{LivenessResponse, SetQuery};
use crate::store::StoreConnection;

const KEY_NOT_FOUND: &str = "Key not found";

/// Application state shared across all handlers.
///
/// Both members hold the same connection handle; neither holds mutable state.
#[derive(Clone)]
pub struct AppState {
    pub cache: CacheService,
    pub liveness: LivenessReporter,
}

impl AppState {
    /// Creates a new AppState over the given connection handle.
    pub fn new(store: Arc<dyn StoreConnection>) -> Self {
        Self {
            cache: CacheService::new(store.clone()),
            liveness: LivenessReporter::new(store),
        }
    }
}

/// Handler for GET /api/v1/cache/:key
///
/// Returns the stored value as the plain-text body.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<String, ApiError> {
    info!("Getting value for key: {}", key);

    match state.cache.get(&key).await {
        Ok(Some(value)) => {
            info!("Value found for key: {}", key);
            Ok(value)
        }
        Ok(None) => {
            warn!("No value found for key: {}", key);
            Err(ApiError::not_found(KEY_NOT_FOUND))
        }
        Err(e) => Err(ApiError::from_cache(e, "Error retrieving value from cache")),
    }
}

/// Handler for PUT /api/v1/cache/:key
///
/// The request body is the value; `?ttl=<seconds>` sets an expiry.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<SetQuery>,
    value: String,
) -> Result<(StatusCode, &'static str), ApiError> {
    info!("Setting value for key: {} (ttl: {:?})", key, query.ttl);

    state
        .cache
        .set(&key, &value, query.ttl)
        .await
        .map_err(|e| ApiError::from_cache(e, "Error setting value in cache"))?;

    info!("Value set successfully for key: {}", key);
    Ok((StatusCode::CREATED, "Value set successfully"))
}

/// Handler for DELETE /api/v1/cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<(StatusCode, &'static str), ApiError> {
    info!("Deleting value for key: {}", key);

    let deleted = state
        .cache
        .delete(&key)
        .await
        .map_err(|e| ApiError::from_cache(e, "Error deleting value from cache"))?;

    if deleted {
        info!("Value deleted successfully for key: {}", key);
        Ok((StatusCode::OK, "Value deleted successfully"))
    } else {
        warn!("No value found to delete for key: {}", key);
        Err(ApiError::not_found(KEY_NOT_FOUND))
    }
}

/// Handler for HEAD /api/v1/cache/:key
///
/// 200 if the key has a live entry, 404 otherwise.
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    let exists = state
        .cache
        .exists(&key)
        .await
        .map_err(|e| ApiError::from_cache(e, "Error checking key in cache"))?;

    if exists {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found(KEY_NOT_FOUND))
    }
}

/// Handler for GET /health
///
/// 200 when the store answers the probe, 503 when it does not.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<LivenessResponse>) {
    let status = state.liveness.check().await;
    let code = if status.up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(LivenessResponse::from(&status)))
}
