//! Read-through caching over a [`CacheStore`]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::version::cache::CacheStore;

/// Get-or-fetch wrapper around an optional store.
///
/// The store only ever speeds things up: read failures and undecodable
/// entries count as misses and write failures are logged and dropped.
/// Without a store every call goes straight to the fetch.
pub struct CacheFacade<S: CacheStore> {
    store: Option<Arc<S>>,
}

impl<S: CacheStore> CacheFacade<S> {
    pub fn new(store: Option<Arc<S>>) -> Self {
        Self { store }
    }

    /// Cached value for `key`, or the result of `fetch` stored for `ttl`.
    ///
    /// Errors from `fetch` are returned as-is and never stored.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(store) = &self.store else {
            return fetch().await;
        };

        if let Some(value) = Self::lookup::<T>(store, key) {
            debug!("Cache hit for {}", key);
            return Ok(value);
        }

        debug!("Cache miss for {}", key);
        let value = fetch().await?;

        match serde_json::to_string(&value) {
            Ok(json) => {
                let _ = store.put(key, &json, ttl).inspect_err(|e| {
                    error!("Failed to store cache entry {}: {}", key, e);
                });
            }
            Err(e) => error!("Failed to serialize cache entry {}: {}", key, e),
        }

        Ok(value)
    }

    fn lookup<T: DeserializeOwned>(store: &S, key: &str) -> Option<T> {
        let raw = store
            .get(key)
            .inspect_err(|e| error!("Failed to read cache entry {}: {}", key, e))
            .ok()??;

        serde_json::from_str(&raw)
            .inspect_err(|e| error!("Discarding undecodable cache entry {}: {}", key, e))
            .ok()
    }
}
