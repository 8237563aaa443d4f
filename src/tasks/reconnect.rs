//! Reconnect Task
//!
//! The connection handle never retries on its own. This task is the caller
//! policy on top: while the handle is not connected, try to reconnect once
//! per interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::store::{ConnectionState, StoreConnection};

/// Spawns a background task that reconnects the store handle whenever it is
/// `Failed` or `Disconnected`.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let reconnect_handle = spawn_reconnect_task(store.clone(), Duration::from_secs(5));
/// // Later, during shutdown:
/// reconnect_handle.abort();
/// ```
pub fn spawn_reconnect_task(
    store: Arc<dyn StoreConnection>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting reconnect task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let state = store.state().await;
            if state == ConnectionState::Connected {
                debug!("Reconnect check: store connected");
                continue;
            }

            match store.reconnect().await {
                Ok(()) => info!("Reconnected to store (was {})", state),
                Err(e) => warn!("Reconnect attempt failed: {}", e),
            }
        }
    })
}
