//! In-Process Store
//!
//! A [`StoreConnection`] that keeps entries in a `HashMap` inside the
//! process. It follows the same state machine as the Redis handle, and can be
//! pushed into `Failed` or made to reject a command so callers can exercise
//! their failure paths without a live server.

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{Command, ConnectionState, Reply, StoreConnection, StoredEntry};
use crate::error::StoreError;

#[derive(Debug)]
struct Inner {
    entries: HashMap<String, StoredEntry>,
    state: ConnectionState,
    failure: Option<String>,
    reject_next: Option<String>,
}

// == In-Memory Handle ==
/// Process-local store with Redis-like GET/SET/SETEX/DEL/EXISTS/PING semantics.
#[derive(Debug)]
pub struct InMemoryHandle {
    inner: RwLock<Inner>,
}

impl InMemoryHandle {
    /// Creates a connected, empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                state: ConnectionState::Connected,
                failure: None,
                reject_next: None,
            }),
        }
    }

    /// Simulates a transport fault: the handle goes `Failed` until reconnected.
    pub async fn fail(&self, reason: impl Into<String>) {
        let reason = reason.into();
        let mut inner = self.inner.write().await;
        warn!("In-memory store marked failed: {}", reason);
        inner.state = ConnectionState::Failed;
        inner.failure = Some(reason);
    }

    /// Makes the next command come back as a store rejection.
    pub async fn reject_next(&self, reason: impl Into<String>) {
        self.inner.write().await.reject_next = Some(reason.into());
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.inner
            .read()
            .await
            .entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }

    /// Returns true if no live entries are held.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    /// Looks up a live entry, dropping it first if it has expired.
    fn live(&mut self, key: &str) -> Option<&StoredEntry> {
        if self.entries.get(key).is_some_and(StoredEntry::is_expired) {
            self.entries.remove(key);
        }
        self.entries.get(key)
    }

    fn apply(&mut self, command: Command) -> Result<Reply, StoreError> {
        let reply = match command {
            Command::Get(key) => Reply::Value(self.live(&key).map(|e| e.value.clone())),
            Command::Set(key, value) => {
                self.entries.insert(key, StoredEntry::persistent(value));
                Reply::Ok
            }
            Command::SetEx(key, seconds, value) => {
                // Zero and out-of-range expiries are both refused
                let entry = match seconds {
                    0 => None,
                    _ => StoredEntry::expiring(value, seconds),
                }
                .ok_or_else(|| {
                    StoreError::Rejected("ERR invalid expire time in 'setex' command".to_string())
                })?;
                self.entries.insert(key, entry);
                Reply::Ok
            }
            Command::Del(key) => {
                let removed = self.live(&key).is_some();
                self.entries.remove(&key);
                Reply::Integer(i64::from(removed))
            }
            Command::Exists(key) => Reply::Integer(i64::from(self.live(&key).is_some())),
            Command::Ping => Reply::Status("PONG".to_string()),
        };
        Ok(reply)
    }
}

#[async_trait]
impl StoreConnection for InMemoryHandle {
    async fn execute(&self, command: Command) -> Result<Reply, StoreError> {
        let mut inner = self.inner.write().await;

        match inner.state {
            ConnectionState::Connected => {}
            ConnectionState::Failed => {
                let reason = inner
                    .failure
                    .clone()
                    .unwrap_or_else(|| "connection failed".to_string());
                return Err(StoreError::Connection(reason));
            }
            ConnectionState::Disconnected => {
                return Err(StoreError::Connection("not connected".to_string()));
            }
        }

        if let Some(reason) = inner.reject_next.take() {
            return Err(StoreError::Rejected(reason));
        }

        inner.apply(command)
    }

    async fn state(&self) -> ConnectionState {
        self.inner.read().await.state
    }

    async fn reconnect(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.state = ConnectionState::Connected;
        inner.failure = None;
        info!("In-memory store reconnected");
        Ok(())
    }
}
