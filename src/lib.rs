//! Valkey Cache - HTTP key-value cache backed by a Redis/Valkey store
//!
//! Provides get/set/delete/exists over one persistent store connection, with
//! optional TTLs and an on-demand liveness probe.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod health;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::CacheService;
pub use config::Config;
pub use error::{CacheError, StoreError};
pub use health::{LivenessReporter, LivenessStatus};
pub use store::{ConnectionState, InMemoryHandle, RedisHandle, StoreConnection};
pub use tasks::spawn_reconnect_task;
