//! Cache Service Module
//!
//! The cache access layer: get / set / delete / exists over a shared
//! connection handle, each a single round trip.

use std::sync::Arc;

use tracing::error;

use crate::error::{CacheError, Result, StoreError};
use crate::store::{Command, Reply, StoreConnection};

// == Cache Service ==
/// Stateless facade over a [`StoreConnection`].
///
/// Absence is an ordinary outcome: `get` yields `Ok(None)` and `delete` /
/// `exists` yield `Ok(false)`. Only a failure to talk to the store produces
/// an error, and that error is always [`CacheError::Unavailable`].
#[derive(Clone)]
pub struct CacheService {
    store: Arc<dyn StoreConnection>,
}

impl CacheService {
    // == Constructor ==
    /// Creates a service over the given connection handle.
    pub fn new(store: Arc<dyn StoreConnection>) -> Self {
        Self { store }
    }

    // == Get ==
    /// Retrieves the value stored under `key`, or `None` if there is no live
    /// entry.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        match self.execute(key, Command::Get(key.to_string())).await? {
            Reply::Value(value) => Ok(value),
            other => Err(unexpected(key, "GET", other)),
        }
    }

    // == Set ==
    /// Stores `value` under `key`, overwriting any previous entry.
    ///
    /// A `ttl` of `None` or `Some(0)` stores the entry without expiry and
    /// clears any expiry a previous write set. A positive `ttl` expires the
    /// entry that many seconds after the store accepts the write.
    pub async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<()> {
        validate_key(key)?;

        let command = match ttl {
            Some(seconds) if seconds > 0 => {
                Command::SetEx(key.to_string(), seconds, value.to_string())
            }
            _ => Command::Set(key.to_string(), value.to_string()),
        };
        let name = command.name();

        match self.execute(key, command).await? {
            Reply::Ok | Reply::Status(_) => Ok(()),
            other => Err(unexpected(key, name, other)),
        }
    }

    // == Delete ==
    /// Removes the entry under `key`. Returns `true` iff an entry existed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        validate_key(key)?;

        match self.execute(key, Command::Del(key.to_string())).await? {
            Reply::Integer(count) => Ok(count > 0),
            other => Err(unexpected(key, "DEL", other)),
        }
    }

    // == Exists ==
    /// Returns `true` iff `key` has a live entry.
    pub async fn exists(&self, key: &str) -> Result<bool> {
        validate_key(key)?;

        match self.execute(key, Command::Exists(key.to_string())).await? {
            Reply::Integer(count) => Ok(count > 0),
            other => Err(unexpected(key, "EXISTS", other)),
        }
    }

    /// Runs one command, collapsing any store failure into `Unavailable`.
    async fn execute(&self, key: &str, command: Command) -> Result<Reply> {
        let name = command.name();
        self.store.execute(command).await.map_err(|e: StoreError| {
            error!("{} failed for key {}: {}", name, key, e);
            CacheError::from(e)
        })
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
    }
    Ok(())
}

fn unexpected(key: &str, command: &str, reply: Reply) -> CacheError {
    error!("{} returned unexpected reply for key {}: {:?}", command, key, reply);
    CacheError::Unavailable(format!("unexpected {} reply: {:?}", command, reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryHandle;

    fn service() -> (Arc<InMemoryHandle>, CacheService) {
        let store = Arc::new(InMemoryHandle::new());
        let service = CacheService::new(store.clone());
        (store, service)
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let (_, cache) = service();

        assert_eq!(cache.get("missing").await.unwrap(), None);
        assert!(!cache.exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (_, cache) = service();

        cache.set("testKey", "testValue", None).await.unwrap();

        assert_eq!(
            cache.get("testKey").await.unwrap(),
            Some("testValue".to_string())
        );
        assert!(cache.exists("testKey").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_value_is_stored() {
        let (_, cache) = service();

        cache.set("k", "", None).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(String::new()));
    }

    #[tokio::test]
    async fn test_zero_ttl_means_no_expiry() {
        let (store, cache) = service();

        cache.set("k", "v", Some(0)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_out_of_range_ttl_is_unavailable() {
        let (store, cache) = service();

        let err = cache.set("k", "v", Some(u64::MAX)).await.unwrap_err();
        assert!(matches!(err, CacheError::Unavailable(ref m) if m.contains("invalid expire time")));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_overwrite_scenario() {
        let (_, cache) = service();

        cache.set("a", "1", None).await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), Some("1".to_string()));

        cache.set("a", "2", None).await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), Some("2".to_string()));

        assert!(cache.delete("a").await.unwrap());
        assert_eq!(cache.get("a").await.unwrap(), None);
        assert!(!cache.delete("a").await.unwrap());
    }

    #[tokio::test]
    async fn test_ttl_entry_expires() {
        let (_, cache) = service();

        cache.set("short", "v", Some(1)).await.unwrap();
        assert!(cache.exists("short").await.unwrap());

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        assert!(!cache.exists("short").await.unwrap());
        assert_eq!(cache.get("short").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_key_is_invalid() {
        let (_, cache) = service();

        assert!(matches!(cache.get("").await, Err(CacheError::InvalidKey(_))));
        assert!(matches!(
            cache.set("", "v", None).await,
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(cache.delete("").await, Err(CacheError::InvalidKey(_))));
        assert!(matches!(cache.exists("").await, Err(CacheError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_failed_handle_makes_every_operation_unavailable() {
        let (store, cache) = service();
        cache.set("k", "v", None).await.unwrap();
        store.fail("connection reset").await;

        assert!(matches!(cache.get("k").await, Err(CacheError::Unavailable(_))));
        assert!(matches!(
            cache.set("k", "v", Some(10)).await,
            Err(CacheError::Unavailable(_))
        ));
        assert!(matches!(cache.delete("k").await, Err(CacheError::Unavailable(_))));
        assert!(matches!(cache.exists("k").await, Err(CacheError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_store_rejection_is_unavailable() {
        let (store, cache) = service();
        store.reject_next("WRONGTYPE Operation against a key").await;

        let err = cache.get("k").await.unwrap_err();
        assert!(matches!(err, CacheError::Unavailable(ref m) if m.contains("WRONGTYPE")));
    }
}
