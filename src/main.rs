//! Valkey Cache - HTTP key-value cache backed by a Redis/Valkey store

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use valkey_cache::api::create_router;
use valkey_cache::store::MEMORY_SCHEME;
use valkey_cache::{spawn_reconnect_task, AppState, Config, InMemoryHandle, RedisHandle};
use valkey_cache::StoreConnection;

/// Main entry point for the cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the store connection (an unreachable store is not fatal)
/// 4. Start background reconnect task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "valkey_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Valkey Cache Service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: store_url={}, port={}, command_timeout={}ms, connect_timeout={}ms, reconnect_interval={}s",
        config.store_url,
        config.server_port,
        config.command_timeout_ms,
        config.connect_timeout_ms,
        config.reconnect_interval
    );

    let store = open_store(&config).await?;
    let state = AppState::new(store.clone());

    let reconnect_handle = spawn_reconnect_task(
        store,
        Duration::from_secs(config.reconnect_interval.max(1)),
    );
    info!("Background reconnect task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(reconnect_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Builds the connection handle named by `STORE_URL`.
///
/// A Redis store that cannot be reached at startup is left `Failed`; the
/// reconnect task picks it up from there.
async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn StoreConnection>> {
    if config.store_url.starts_with(MEMORY_SCHEME) {
        info!("Using in-process store");
        return Ok(Arc::new(InMemoryHandle::new()));
    }

    let handle = RedisHandle::new(&config.store_url, config.timeouts())
        .context("invalid STORE_URL")?;
    match handle.connect().await {
        Ok(()) => info!("Store connection established"),
        Err(e) => warn!("Store unavailable at startup, will retry: {}", e),
    }
    Ok(Arc::new(handle))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the reconnect task and allows graceful shutdown.
async fn shutdown_signal(reconnect_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    reconnect_handle.abort();
    warn!("Reconnect task aborted");
}
