//! Cache Store Module
//!
//! In-process cache engine: HashMap storage with TTL expiry, LRU eviction
//! under a capacity limit, and pattern-based key enumeration.

use std::collections::HashMap;

use tokio::time::Instant;

use crate::cache::{CacheEntry, KeyPattern, KeyTtl, RecencyIndex, StoreStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::CacheError;

// == Cache Store ==
/// Key-value storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    recency: RecencyIndex,
    stats: StoreStats,
    max_entries: usize,
    /// TTL applied when a write does not name one
    default_ttl: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` values.
    pub fn new(max_entries: usize, default_ttl: u64) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyIndex::new(),
            stats: StoreStats::new(max_entries),
            max_entries,
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a value, replacing any previous one and resetting its TTL.
    ///
    /// When the store is at capacity the least recently used entry is
    /// evicted first.
    pub fn set(&mut self, key: String, value: String, ttl: Option<u64>) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            // Expired entries go before live ones are sacrificed.
            if self.purge_expired() == 0 {
                let evicted = self.recency.pop_oldest().ok_or_else(|| {
                    CacheError::CacheFull("Cache is full and eviction failed".to_string())
                })?;
                self.entries.remove(&evicted);
                self.stats.record_eviction();
            }
        }

        let entry = CacheEntry::new(value, Some(ttl.unwrap_or(self.default_ttl)));
        self.entries.insert(key.clone(), entry);
        self.recency.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Retrieves a live value.
    ///
    /// Expired entries are dropped on access and counted as misses.
    pub fn get(&mut self, key: &str) -> Result<String, CacheError> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        if entry.is_expired() {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return Err(CacheError::Expired(key.to_string()));
        }

        let value = entry.value.clone();
        self.stats.record_hit();
        self.recency.touch(key);
        Ok(value)
    }

    // == Delete ==
    pub fn delete(&mut self, key: &str) -> Result<(), CacheError> {
        match self.entries.get(key) {
            None => Err(CacheError::NotFound(key.to_string())),
            Some(entry) if entry.is_expired() => {
                self.remove_entry(key);
                self.stats.record_expirations(1);
                Err(CacheError::Expired(key.to_string()))
            }
            Some(_) => {
                self.remove_entry(key);
                Ok(())
            }
        }
    }

    // == Exists ==
    /// True if the key holds a live value. Does not touch recency or stats.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == TTL ==
    /// Remaining lifetime of a key. Does not touch recency or stats.
    pub fn ttl(&self, key: &str) -> KeyTtl {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => match entry.ttl_remaining() {
                Some(secs) => KeyTtl::Expires(secs),
                None => KeyTtl::Persistent,
            },
            _ => KeyTtl::Missing,
        }
    }

    // == Keys ==
    /// Live keys matching the pattern, sorted.
    pub fn keys(&self, pattern: &KeyPattern) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired_at(now) && pattern.matches(key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    pub fn stats(&self) -> StoreStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.recency.remove(key);
        }

        self.stats.record_expirations(expired.len());
        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) {
        self.entries.remove(key);
        self.recency.remove(key);
        self.stats.set_total_entries(self.entries.len());
    }
}
