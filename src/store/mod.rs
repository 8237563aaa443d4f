//! Store Module
//!
//! The connection handle: one long-lived channel to the remote store, shared
//! by every cache operation.
//!
//! [`StoreConnection`] is the seam the rest of the crate depends on.
//! [`RedisHandle`] talks to Redis/Valkey; [`InMemoryHandle`] keeps entries in
//! the process and is what the tests run against.

mod command;
mod entry;
mod memory;
mod redis_handle;

use std::fmt;

use async_trait::async_trait;

use crate::error::StoreError;

pub use command::{Command, Reply};
pub use entry::StoredEntry;
pub use memory::InMemoryHandle;
pub use redis_handle::{RedisHandle, Timeouts};

// == Public Constants ==
/// URL scheme that selects the in-process store.
pub const MEMORY_SCHEME: &str = "memory://";

// == Connection State ==
/// Lifecycle of the logical connection.
///
/// `Disconnected -> Connected` on connect, `Connected -> Failed` on a
/// transport fault, `Failed -> Connected` on a successful reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Failed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connected => "connected",
            ConnectionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

// == Store Connection Trait ==
/// A shared channel to the store.
///
/// Implementations must be safe to call concurrently without interleaving
/// replies, and must not retry anything on their own.
#[async_trait]
pub trait StoreConnection: Send + Sync {
    /// Sends one primitive and returns its raw reply.
    ///
    /// Fails with [`StoreError::Connection`] unless the channel is connected.
    async fn execute(&self, command: Command) -> Result<Reply, StoreError>;

    /// Sends PING and returns the store's literal reply.
    async fn probe(&self) -> Result<String, StoreError> {
        match self.execute(Command::Ping).await? {
            Reply::Status(token) => Ok(token),
            Reply::Value(Some(token)) => Ok(token),
            other => Err(StoreError::Rejected(format!(
                "unexpected PING reply: {:?}",
                other
            ))),
        }
    }

    /// Current lifecycle state.
    async fn state(&self) -> ConnectionState;

    /// Re-establishes the channel. A failure leaves the handle `Failed`.
    async fn reconnect(&self) -> Result<(), StoreError>;
}
