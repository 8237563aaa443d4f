//! Property-Based Tests for the Cache Access Layer
//!
//! Uses proptest against the in-process store.

use std::future::Future;
use std::sync::Arc;

use proptest::prelude::*;

use crate::cache::CacheService;
use crate::error::CacheError;
use crate::store::InMemoryHandle;

// == Helpers ==
fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn new_cache() -> (Arc<InMemoryHandle>, CacheService) {
    let store = Arc::new(InMemoryHandle::new());
    let cache = CacheService::new(store.clone());
    (store, cache)
}

// == Strategies ==
/// Generates valid cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:.-]{1,64}".prop_map(|s| s)
}

/// Generates values, including the empty string
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,256}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Exists { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    // Small key space so operations collide
    let key = "[a-c]";
    prop_oneof![
        (key, value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key.prop_map(|key| CacheOp::Get { key }),
        key.prop_map(|key| CacheOp::Delete { key }),
        key.prop_map(|key| CacheOp::Exists { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Keys that were never written read as absent.
    #[test]
    fn prop_unwritten_key_is_absent(key in valid_key_strategy()) {
        let (_, cache) = new_cache();

        let (value, exists) = block_on(async {
            (cache.get(&key).await, cache.exists(&key).await)
        });

        prop_assert_eq!(value, Ok(None));
        prop_assert_eq!(exists, Ok(false));
    }

    // A successful set is visible to get and exists.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in value_strategy()) {
        let (_, cache) = new_cache();

        let (read, exists) = block_on(async {
            cache.set(&key, &value, None).await.unwrap();
            (cache.get(&key).await, cache.exists(&key).await)
        });

        prop_assert_eq!(read, Ok(Some(value)));
        prop_assert_eq!(exists, Ok(true));
    }

    // The last write wins and there is still only one entry.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let (store, cache) = new_cache();

        let read = block_on(async {
            cache.set(&key, &value1, None).await.unwrap();
            cache.set(&key, &value2, Some(300)).await.unwrap();
            cache.get(&key).await
        });

        prop_assert_eq!(read, Ok(Some(value2)));
        prop_assert_eq!(block_on(store.len()), 1);
    }

    // Only the first delete after a write reports a removal.
    #[test]
    fn prop_delete_is_idempotent(
        key in valid_key_strategy(),
        value in value_strategy(),
        repeats in 1usize..5
    ) {
        let (_, cache) = new_cache();

        let (first, rest, after) = block_on(async {
            cache.set(&key, &value, None).await.unwrap();
            let first = cache.delete(&key).await;
            let mut rest = Vec::new();
            for _ in 0..repeats {
                rest.push(cache.delete(&key).await);
            }
            (first, rest, cache.get(&key).await)
        });

        prop_assert_eq!(first, Ok(true));
        prop_assert!(rest.iter().all(|r| *r == Ok(false)), "repeat delete returned {:?}", rest);
        prop_assert_eq!(after, Ok(None));
    }

    // Deleting an absent key changes nothing.
    #[test]
    fn prop_delete_missing_is_side_effect_free(
        present in valid_key_strategy(),
        missing in valid_key_strategy(),
        value in value_strategy()
    ) {
        prop_assume!(present != missing);
        let (store, cache) = new_cache();

        let (deleted, read) = block_on(async {
            cache.set(&present, &value, None).await.unwrap();
            (cache.delete(&missing).await, cache.get(&present).await)
        });

        prop_assert_eq!(deleted, Ok(false));
        prop_assert_eq!(read, Ok(Some(value)));
        prop_assert_eq!(block_on(store.len()), 1);
    }

    // A failed handle never produces an absence outcome.
    #[test]
    fn prop_failed_handle_is_unavailable(ops in prop::collection::vec(cache_op_strategy(), 1..20)) {
        let (store, cache) = new_cache();
        block_on(store.fail("connection reset by peer"));

        for op in ops {
            let failed = block_on(async {
                match op {
                    CacheOp::Set { key, value } => cache.set(&key, &value, None).await.err(),
                    CacheOp::Get { key } => cache.get(&key).await.err(),
                    CacheOp::Delete { key } => cache.delete(&key).await.err(),
                    CacheOp::Exists { key } => cache.exists(&key).await.err(),
                }
            });
            prop_assert!(
                matches!(failed, Some(CacheError::Unavailable(_))),
                "expected Unavailable, got {:?}",
                failed
            );
        }
    }

    // Against a model map, every operation agrees with the store.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let (_, cache) = new_cache();
        let mut model = std::collections::HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    block_on(cache.set(&key, &value, None)).unwrap();
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let read = block_on(cache.get(&key));
                    prop_assert_eq!(read, Ok(model.get(&key).cloned()));
                }
                CacheOp::Delete { key } => {
                    let deleted = block_on(cache.delete(&key));
                    prop_assert_eq!(deleted, Ok(model.remove(&key).is_some()));
                }
                CacheOp::Exists { key } => {
                    let exists = block_on(cache.exists(&key));
                    prop_assert_eq!(exists, Ok(model.contains_key(&key)));
                }
            }
        }
    }
}

// Separate block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(3))]

    // A TTL entry exists immediately and disappears once the TTL elapses.
    #[test]
    fn prop_ttl_expiration_behavior(key in valid_key_strategy(), value in value_strategy()) {
        let (_, cache) = new_cache();

        let (before, after) = block_on(async {
            cache.set(&key, &value, Some(1)).await.unwrap();
            let before = cache.exists(&key).await;
            tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
            (before, cache.exists(&key).await)
        });

        prop_assert_eq!(before, Ok(true));
        prop_assert_eq!(after, Ok(false));
    }
}
