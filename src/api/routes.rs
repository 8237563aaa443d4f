//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, exists_handler, get_handler, health_handler, set_handler, AppState,
};

/// Path of a single cache entry.
pub const CACHE_ENTRY_PATH: &str = "/api/v1/cache/:key";

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Explicit HEAD takes precedence over the one axum derives from GET
    let entry: MethodRouter<AppState> = get(get_handler)
        .put(set_handler)
        .delete(delete_handler)
        .head(exists_handler);

    Router::new()
        .route(CACHE_ENTRY_PATH, entry)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
