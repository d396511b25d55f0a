//! Cache Backend Module
//!
//! The async contract the weather service consumes, and its two
//! implementations: the shared in-process store and a disabled cache.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStore, KeyPattern, StoreStats};
use crate::error::CacheError;

// == Key TTL ==
/// Remaining lifetime of a key as reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "seconds", rename_all = "snake_case")]
pub enum KeyTtl {
    /// No live value under the key
    Missing,
    /// Live value without expiry
    Persistent,
    /// Live value expiring in this many seconds
    Expires(u64),
}

// == Cache Backend Trait ==
/// TTL-aware key-value store holding serialized values.
///
/// Every operation may fail with [`CacheError`]; callers decide whether a
/// failure matters. `health_check` never fails, it answers false instead.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Stores `value` under `key` for `ttl_secs` seconds.
    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<bool, CacheError>;

    /// Live value under `key`, or None.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Removes `key`. Returns whether a live value was removed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    async fn ttl(&self, key: &str) -> Result<KeyTtl, CacheError>;

    /// Live keys matching a glob pattern (`*`, `?`).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError>;

    async fn clear_all(&self) -> Result<bool, CacheError>;

    async fn health_check(&self) -> bool;

    /// Store-level counters, if the backend tracks any.
    async fn stats(&self) -> Result<Option<StoreStats>, CacheError>;
}

// == Memory Cache ==
/// [`CacheBackend`] over a [`CacheStore`] shared behind an async lock.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize, default_ttl: u64) -> Self {
        Self::from_store(CacheStore::new(max_entries, default_ttl))
    }

    pub fn from_store(store: CacheStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Drops expired entries now; returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.purge_expired()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<bool, CacheError> {
        self.store
            .write()
            .await
            .set(key.to_string(), value, Some(ttl_secs))?;
        debug!(key, ttl_secs, "cache set");
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        // Write lock: reads update recency and counters.
        let mut store = self.store.write().await;
        match store.get(key) {
            Ok(value) => {
                debug!(key, "cache hit");
                Ok(Some(value))
            }
            Err(CacheError::NotFound(_)) | Err(CacheError::Expired(_)) => {
                debug!(key, "cache miss");
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        match self.store.write().await.delete(key) {
            Ok(()) => {
                debug!(key, "cache delete");
                Ok(true)
            }
            Err(CacheError::NotFound(_)) | Err(CacheError::Expired(_)) => Ok(false),
            Err(other) => Err(other),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.store.read().await.contains(key))
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl, CacheError> {
        Ok(self.store.read().await.ttl(key))
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let pattern = KeyPattern::new(pattern)?;
        Ok(self.store.read().await.keys(&pattern))
    }

    async fn clear_all(&self) -> Result<bool, CacheError> {
        self.store.write().await.clear();
        debug!("cache cleared");
        Ok(true)
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn stats(&self) -> Result<Option<StoreStats>, CacheError> {
        Ok(Some(self.store.read().await.stats()))
    }
}

// == Disabled Cache ==
/// Backend used when caching is switched off: every operation reports
/// [`CacheError::Unavailable`] and the service falls through to the provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCache;

impl DisabledCache {
    fn unavailable<T>() -> Result<T, CacheError> {
        Err(CacheError::Unavailable("caching is disabled".to_string()))
    }
}

#[async_trait]
impl CacheBackend for DisabledCache {
    async fn set(&self, _key: &str, _value: String, _ttl_secs: u64) -> Result<bool, CacheError> {
        Self::unavailable()
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Self::unavailable()
    }

    async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
        Self::unavailable()
    }

    async fn exists(&self, _key: &str) -> Result<bool, CacheError> {
        Self::unavailable()
    }

    async fn ttl(&self, _key: &str) -> Result<KeyTtl, CacheError> {
        Self::unavailable()
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>, CacheError> {
        Self::unavailable()
    }

    async fn clear_all(&self) -> Result<bool, CacheError> {
        Self::unavailable()
    }

    async fn health_check(&self) -> bool {
        false
    }

    async fn stats(&self) -> Result<Option<StoreStats>, CacheError> {
        Self::unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_roundtrip_and_ttl() {
        let cache = MemoryCache::new(100, 300);

        assert!(cache.set("weather:paris", "{}".to_string(), 600).await.unwrap());
        assert_eq!(cache.get("weather:paris").await.unwrap().as_deref(), Some("{}"));
        assert!(cache.exists("weather:paris").await.unwrap());
        assert_eq!(cache.ttl("weather:paris").await.unwrap(), KeyTtl::Expires(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_miss_is_none() {
        let cache = MemoryCache::new(100, 300);
        cache.set("weather:oslo", "{}".to_string(), 1).await.unwrap();

        assert_eq!(cache.get("weather:bergen").await.unwrap(), None);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("weather:oslo").await.unwrap(), None);
        assert_eq!(cache.ttl("weather:oslo").await.unwrap(), KeyTtl::Missing);

        let stats = cache.stats().await.unwrap().unwrap();
        assert_eq!(stats.misses, 2);
    }

    #[tokio::test]
    async fn test_memory_cache_delete_reports_presence() {
        let cache = MemoryCache::new(100, 300);
        cache.set("weather:kyiv", "{}".to_string(), 60).await.unwrap();

        assert!(cache.delete("weather:kyiv").await.unwrap());
        assert!(!cache.delete("weather:kyiv").await.unwrap());
        assert!(!cache.exists("weather:kyiv").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_cache_keys_and_clear_all() {
        let cache = MemoryCache::new(100, 300);
        cache.set("weather:paris", "{}".to_string(), 60).await.unwrap();
        cache.set("forecast:paris:2", "{}".to_string(), 60).await.unwrap();

        assert_eq!(cache.keys("forecast:*").await.unwrap(), vec!["forecast:paris:2"]);

        assert!(cache.clear_all().await.unwrap());
        assert!(cache.keys("*").await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_purge_expired() {
        let cache = MemoryCache::new(100, 300);
        cache.set("a", "{}".to_string(), 1).await.unwrap();
        cache.set("b", "{}".to_string(), 60).await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.purge_expired().await, 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_is_unavailable() {
        let cache = DisabledCache;

        assert!(!cache.health_check().await);
        assert!(matches!(cache.get("weather:paris").await, Err(CacheError::Unavailable(_))));
        assert!(matches!(
            cache.set("weather:paris", "{}".to_string(), 600).await,
            Err(CacheError::Unavailable(_))
        ));
        assert!(matches!(cache.keys("*").await, Err(CacheError::Unavailable(_))));
    }

    #[test]
    fn test_key_ttl_serializes_tagged() {
        let json = serde_json::to_value(KeyTtl::Expires(600)).unwrap();
        assert_eq!(json["state"], "expires");
        assert_eq!(json["seconds"], 600);
    }
}
