//! Recency Index Module
//!
//! Least-recently-used ordering for capacity eviction.

use std::collections::{BTreeMap, HashMap};

// == Recency Index ==
/// Tracks access order for LRU eviction.
///
/// Every touch stamps the key with a monotonically increasing tick; the
/// smallest tick is the least recently used key. Both maps always hold the
/// same set of keys.
#[derive(Debug, Default)]
pub struct RecencyIndex {
    next_tick: u64,
    by_tick: BTreeMap<u64, String>,
    by_key: HashMap<String, u64>,
}

impl RecencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        let tick = self.next_tick;
        self.next_tick += 1;

        if let Some(previous) = self.by_key.insert(key.to_string(), tick) {
            self.by_tick.remove(&previous);
        }
        self.by_tick.insert(tick, key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.by_key.remove(key) {
            self.by_tick.remove(&tick);
        }
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_tick.pop_first()?;
        self.by_key.remove(&key);
        Some(key)
    }

    pub fn clear(&mut self) {
        self.by_tick.clear();
        self.by_key.clear();
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_oldest_follows_insertion_order() {
        let mut index = RecencyIndex::new();
        index.touch("weather:paris");
        index.touch("weather:london");
        index.touch("forecast:paris:3");

        assert_eq!(index.pop_oldest().as_deref(), Some("weather:paris"));
        assert_eq!(index.pop_oldest().as_deref(), Some("weather:london"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_touch_moves_key_to_newest() {
        let mut index = RecencyIndex::new();
        index.touch("a");
        index.touch("b");
        index.touch("c");

        index.touch("a");

        assert_eq!(index.pop_oldest().as_deref(), Some("b"));
        assert_eq!(index.pop_oldest().as_deref(), Some("c"));
        assert_eq!(index.pop_oldest().as_deref(), Some("a"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_repeated_touch_keeps_single_slot() {
        let mut index = RecencyIndex::new();
        index.touch("a");
        index.touch("a");
        index.touch("a");

        assert_eq!(index.len(), 1);
        assert_eq!(index.by_tick.len(), 1);
    }

    #[test]
    fn test_remove_unknown_key_is_noop() {
        let mut index = RecencyIndex::new();
        index.touch("a");
        index.remove("missing");
        assert_eq!(index.len(), 1);

        index.remove("a");
        assert_eq!(index.pop_oldest(), None);
    }

    #[test]
    fn test_clear() {
        let mut index = RecencyIndex::new();
        index.touch("a");
        index.touch("b");
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.pop_oldest(), None);
    }
}
