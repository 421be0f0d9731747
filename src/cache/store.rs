//! Cache Store Module
//!
//! The cache engine: typed get/set over a shared substrate, with lazy
//! expiration on access and a full sweep for proactive removal.
//!
//! The engine keeps no copy of the substrate's contents. Every operation reads
//! or writes whole entries, so concurrent callers and the background sweep
//! rely only on the substrate's per-key atomicity.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{codec, policy, CacheEntry, CacheStatistics, KeyNamespace, StorageAccessor};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::storage::StorageBackend;

// == Cache Store ==
/// Cache engine over a [`StorageBackend`].
pub struct CacheStore {
    /// Namespaced substrate access
    accessor: StorageAccessor,
    /// Immutable engine settings
    config: CacheConfig,
    /// Start time of the most recent sweep
    last_cleanup: RwLock<DateTime<Utc>>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a cache over `backend` with the given settings.
    pub fn new(backend: Arc<dyn StorageBackend>, config: CacheConfig) -> Self {
        let namespace = KeyNamespace::new(config.key_prefix.clone());
        Self {
            accessor: StorageAccessor::new(backend, namespace),
            config,
            last_cleanup: RwLock::new(Utc::now()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Absent, undecodable and expired entries all read as `None`. An
    /// expired entry is removed on the way out.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.get_entry(key).await?.map(|entry| entry.value))
    }

    /// Like [`get`](Self::get) but returns the entry metadata as well.
    pub async fn get_entry<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CacheEntry<T>>> {
        validate_key(key)?;

        let Some(raw) = self.read_raw(key).await else {
            return Ok(None);
        };

        let entry = match codec::decode::<T>(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Treating undecodable entry '{}' as a miss: {}", key, e);
                return Ok(None);
            }
        };

        if entry.is_expired(Utc::now()) {
            self.evict_expired(key).await;
            return Ok(None);
        }

        Ok(Some(entry))
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses the configured default if None)
    pub async fn set<T: Serialize>(&self, key: &str, value: T, ttl: Option<Duration>) -> Result<()> {
        validate_key(key)?;

        let now = Utc::now();
        let expires_at = match ttl.or(self.config.default_expiration) {
            Some(ttl) => Some(policy::expiration_after(now, ttl).ok_or_else(|| {
                CacheError::InvalidArgument(format!("TTL for key '{}' is out of range", key))
            })?),
            None => None,
        };

        let entry = CacheEntry::new(value, now, expires_at);
        let raw = codec::encode(&entry).map_err(|e| {
            CacheError::InvalidArgument(format!("Value for key '{}' cannot be encoded: {}", key, e))
        })?;

        self.accessor
            .set_raw(key, raw)
            .await
            .map_err(|source| CacheError::StorageWrite {
                operation: "set",
                key: key.to_string(),
                source,
            })
    }

    // == Remove ==
    /// Removes an entry by key. Removing an absent key succeeds.
    pub async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.remove_unchecked(key).await
    }

    async fn remove_unchecked(&self, key: &str) -> Result<()> {
        self.accessor
            .remove_raw(key)
            .await
            .map_err(|source| CacheError::StorageWrite {
                operation: "remove",
                key: key.to_string(),
                source,
            })
    }

    // == Clear ==
    /// Removes every entry in the namespace.
    ///
    /// Stops at the first failed removal and returns it; keys removed before
    /// that stay removed.
    pub async fn clear(&self) -> Result<()> {
        let keys = self.accessor.list_keys().await;
        let total = keys.len();

        for key in keys {
            self.remove_unchecked(&key).await?;
        }

        info!("Cleared {} entries", total);
        Ok(())
    }

    // == Exists ==
    /// Checks whether a live entry exists.
    ///
    /// An entry that cannot be decoded counts as present; an expired one is
    /// removed and reported absent.
    pub async fn exists(&self, key: &str) -> Result<bool> {
        validate_key(key)?;

        let Some(raw) = self.read_raw(key).await else {
            return Ok(false);
        };

        match codec::decode::<IgnoredAny>(&raw) {
            Ok(entry) if entry.is_expired(Utc::now()) => {
                self.evict_expired(key).await;
                Ok(false)
            }
            Ok(_) => Ok(true),
            Err(e) => {
                debug!("Entry '{}' is undecodable, reporting it present: {}", key, e);
                Ok(true)
            }
        }
    }

    // == Get All Keys ==
    /// Logical keys of every entry in the namespace, expired or not.
    pub async fn get_all_keys(&self) -> BTreeSet<String> {
        self.accessor.list_keys().await
    }

    // == Clean Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Undecodable entries are skipped and per-key failures do not stop the
    /// sweep. `last_cleanup_time` is stamped when the sweep starts.
    ///
    /// Returns the number of entries removed.
    pub async fn clean_expired_items(&self) -> Result<usize> {
        let started = Utc::now();
        *self.last_cleanup.write().await = started;

        let mut removed = 0;
        for key in self.accessor.list_keys().await {
            let Some(raw) = self.read_raw(&key).await else {
                continue;
            };

            let Ok(entry) = codec::decode::<IgnoredAny>(&raw) else {
                continue;
            };

            if entry.is_expired(Utc::now()) {
                match self.accessor.remove_raw(&key).await {
                    Ok(()) => removed += 1,
                    Err(e) => warn!("Sweep could not remove expired entry '{}': {}", key, e),
                }
            }
        }

        if removed > 0 {
            info!("Sweep removed {} expired entries", removed);
        } else {
            debug!("Sweep found no expired entries");
        }

        Ok(removed)
    }

    // == Statistics ==
    /// Scans the namespace and returns a snapshot.
    pub async fn get_statistics(&self) -> CacheStatistics {
        let mut stats = CacheStatistics::new(self.last_cleanup_time().await);
        let now = Utc::now();

        for key in self.accessor.list_keys().await {
            stats.record_item();

            let Some(raw) = self.read_raw(&key).await else {
                continue;
            };
            stats.record_size(raw.len(), self.config.size_multiplier);

            if matches!(codec::decode::<IgnoredAny>(&raw), Ok(entry) if entry.is_expired(now)) {
                stats.record_expired();
            }
        }

        stats
    }

    /// Start of the most recent sweep, or construction time if none has run.
    pub async fn last_cleanup_time(&self) -> DateTime<Utc> {
        *self.last_cleanup.read().await
    }

    // == Get Or Fetch ==
    /// Returns the cached value, or fetches, stores and returns a fresh one.
    ///
    /// A failed fetch stores nothing. A failed write after a successful fetch
    /// is logged and the fetched value is still returned.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, ttl: Option<Duration>, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        if let Some(value) = self.get(key).await? {
            debug!("Cache hit for '{}'", key);
            return Ok(value);
        }

        debug!("Cache miss for '{}', fetching upstream", key);
        let value = fetch().await?;

        if let Err(e) = self.set(key, &value, ttl).await {
            warn!("Fetched value for '{}' could not be cached: {}", key, e);
        }

        Ok(value)
    }

    /// Substrate read for single-key lookups; a failed read counts as absent.
    async fn read_raw(&self, key: &str) -> Option<String> {
        match self.accessor.get_raw(key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Read of '{}' failed, treating as absent: {}", key, e);
                None
            }
        }
    }

    /// Best-effort removal of an entry found expired on access.
    async fn evict_expired(&self, key: &str) {
        match self.accessor.remove_raw(key).await {
            Ok(()) => debug!("Removed expired entry '{}'", key),
            Err(e) => warn!("Could not remove expired entry '{}': {}", key, e),
        }
    }
}

/// Rejects empty or blank keys before any I/O.
fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(CacheError::InvalidArgument(
            "Key cannot be empty".to_string(),
        ));
    }
    Ok(())
}
