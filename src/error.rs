//! Error types for the cache service
//!
//! Two layers of errors, both built with thiserror:
//! - [`StoreError`] is what the connection handle reports, split by whether
//!   the transport failed or the store refused the command.
//! - [`CacheError`] is what the cache access layer hands to its callers. Every
//!   store failure collapses into [`CacheError::Unavailable`].
//!
//! [`ApiError`] is the HTTP rendering of a failed request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Store Error Enum ==
/// Granular failure reported by a connection handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The channel could not be reached or used (down, timed out, handshake failed)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store received the command and rejected it
    #[error("Store rejected command: {0}")]
    Rejected(String),
}

impl StoreError {
    /// Returns `true` if this is a transport-level failure.
    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::Connection(_))
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_timeout()
            || err.is_connection_dropped()
            || err.is_connection_refusal()
        {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Rejected(err.to_string())
        }
    }
}

// == Cache Error Enum ==
/// Error returned by the cache access layer.
///
/// A missing key is never an error; see [`crate::cache::CacheService`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The store could not serve the request. Holds the diagnostic for logs.
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// The key was rejected before reaching the store
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

impl From<StoreError> for CacheError {
    fn from(err: StoreError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache access layer.
pub type Result<T> = std::result::Result<T, CacheError>;

// == API Error ==
/// A failed HTTP request: status code plus the message shown to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Maps a cache error onto a response.
    ///
    /// `unavailable` is the generic text sent in place of the diagnostic, so
    /// transport details never leave the process.
    pub fn from_cache(err: CacheError, unavailable: &str) -> Self {
        match err {
            CacheError::InvalidKey(msg) => Self {
                status: StatusCode::BAD_REQUEST,
                message: msg,
            },
            CacheError::Unavailable(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: unavailable.to_string(),
            },
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}
