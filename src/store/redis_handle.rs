//! Redis Connection Handle
//!
//! Owns one multiplexed connection to a Redis/Valkey server. The connection
//! pipelines concurrent requests itself, so callers clone it out of a
//! short-held lock and never hold the lock across a round trip.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, RedisResult};
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{Command, ConnectionState, Reply, StoreConnection};
use crate::error::StoreError;

// == Timeouts ==
/// Upper bounds on every blocking call the handle makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Establishing the connection
    pub connect: Duration,
    /// A single command round trip
    pub command: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_millis(5000),
            command: Duration::from_millis(2000),
        }
    }
}

enum Channel {
    Disconnected,
    Connected {
        conn: MultiplexedConnection,
        generation: u64,
    },
    Failed {
        reason: String,
    },
}

struct Slot {
    channel: Channel,
    /// Bumped on every successful connect so a late fault on an old
    /// connection cannot fail a newer one.
    generation: u64,
}

// == Redis Handle ==
/// Connection handle backed by the `redis` crate.
pub struct RedisHandle {
    client: Client,
    timeouts: Timeouts,
    slot: RwLock<Slot>,
}

impl RedisHandle {
    // == Constructor ==
    /// Validates the URL and creates a `Disconnected` handle.
    ///
    /// No network traffic happens until [`connect`](Self::connect).
    pub fn new(url: &str, timeouts: Timeouts) -> Result<Self, StoreError> {
        let client = Client::open(url)
            .map_err(|e| StoreError::Connection(format!("invalid store url: {}", e)))?;

        Ok(Self {
            client,
            timeouts,
            slot: RwLock::new(Slot {
                channel: Channel::Disconnected,
                generation: 0,
            }),
        })
    }

    // == Connect ==
    /// Opens the connection. On failure the handle is left `Failed`.
    pub async fn connect(&self) -> Result<(), StoreError> {
        let attempt = timeout(
            self.timeouts.connect,
            self.client.get_multiplexed_async_connection(),
        )
        .await;

        let mut slot = self.slot.write().await;
        match attempt {
            Ok(Ok(conn)) => {
                slot.generation += 1;
                slot.channel = Channel::Connected {
                    conn,
                    generation: slot.generation,
                };
                info!("Connected to store (generation {})", slot.generation);
                Ok(())
            }
            Ok(Err(e)) => {
                let reason = format!("connect failed: {}", e);
                warn!("Store connection failed: {}", reason);
                slot.channel = Channel::Failed {
                    reason: reason.clone(),
                };
                Err(StoreError::Connection(reason))
            }
            Err(_) => {
                let reason = format!("connect timed out after {:?}", self.timeouts.connect);
                warn!("Store connection failed: {}", reason);
                slot.channel = Channel::Failed {
                    reason: reason.clone(),
                };
                Err(StoreError::Connection(reason))
            }
        }
    }

    /// Clones the live connection out of the slot.
    async fn channel(&self) -> Result<(MultiplexedConnection, u64), StoreError> {
        let slot = self.slot.read().await;
        match &slot.channel {
            Channel::Connected { conn, generation } => Ok((conn.clone(), *generation)),
            Channel::Disconnected => Err(StoreError::Connection("not connected".to_string())),
            Channel::Failed { reason } => Err(StoreError::Connection(reason.clone())),
        }
    }

    /// Moves the handle to `Failed`, unless a newer connection replaced the
    /// one that faulted.
    async fn mark_failed(&self, generation: u64, reason: &str) {
        let mut slot = self.slot.write().await;
        let current = match &slot.channel {
            Channel::Connected { generation, .. } => Some(*generation),
            _ => None,
        };
        if current == Some(generation) {
            warn!("Store connection faulted: {}", reason);
            slot.channel = Channel::Failed {
                reason: reason.to_string(),
            };
        }
    }
}

/// Sends one command and decodes the reply shape that command produces.
async fn run(command: &Command, conn: &mut MultiplexedConnection) -> RedisResult<Reply> {
    let cmd = command.to_cmd();
    let reply = match command {
        Command::Get(_) => Reply::Value(cmd.query_async(conn).await?),
        Command::Set(..) | Command::SetEx(..) => {
            let () = cmd.query_async(conn).await?;
            Reply::Ok
        }
        Command::Del(_) | Command::Exists(_) => Reply::Integer(cmd.query_async(conn).await?),
        Command::Ping => Reply::Status(cmd.query_async(conn).await?),
    };
    Ok(reply)
}

#[async_trait]
impl StoreConnection for RedisHandle {
    async fn execute(&self, command: Command) -> Result<Reply, StoreError> {
        let (mut conn, generation) = self.channel().await?;
        debug!("Sending {} to store", command.name());

        match timeout(self.timeouts.command, run(&command, &mut conn)).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => {
                let faulted =
                    e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal();
                let err = StoreError::from(e);
                if faulted {
                    self.mark_failed(generation, &err.to_string()).await;
                }
                Err(err)
            }
            // The request may still be answered on the shared channel, so a
            // slow reply does not fail the connection.
            Err(_) => Err(StoreError::Connection(format!(
                "{} timed out after {:?}",
                command.name(),
                self.timeouts.command
            ))),
        }
    }

    async fn state(&self) -> ConnectionState {
        match self.slot.read().await.channel {
            Channel::Disconnected => ConnectionState::Disconnected,
            Channel::Connected { .. } => ConnectionState::Connected,
            Channel::Failed { .. } => ConnectionState::Failed,
        }
    }

    async fn reconnect(&self) -> Result<(), StoreError> {
        self.connect().await
    }
}
