use std::collections::HashMap;
use lru::LruCache as OrderedSet;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;
use crate::cache::{validate_key, validate_value, BoundedCache, CacheStats};
use crate::core::config::validate_capacity;
use crate::core::error::Result;

/// Entry in LFU cache with frequency counter
struct LfuEntry<V> {
    value: V,
    frequency: u64,
}

/// Least-frequently-used cache.
///
/// Keys are grouped into buckets by access frequency. Each bucket keeps its keys
/// in insertion order (an unbounded `lru::LruCache` used as an ordered set), so
/// eviction takes the oldest key of the lowest-frequency bucket in O(1).
pub struct LfuCache<V> {
    inner: Mutex<LfuInner<V>>,
    capacity: usize,
}

struct LfuInner<V> {
    entries: HashMap<String, LfuEntry<V>>,
    buckets: HashMap<u64, OrderedSet<String, ()>>,
    min_frequency: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<V> LfuInner<V> {
    /// Move `key` from its bucket to the next one up.
    fn touch(&mut self, key: &str) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        let freq = entry.frequency;
        entry.frequency += 1;

        self.detach(key, freq);
        self.buckets
            .entry(freq + 1)
            .or_insert_with(OrderedSet::unbounded)
            .push(key.to_string(), ());
    }

    /// Remove `key` from the bucket at `freq`, dropping the bucket once empty.
    fn detach(&mut self, key: &str, freq: u64) {
        let emptied = match self.buckets.get_mut(&freq) {
            Some(bucket) => {
                bucket.pop(key);
                bucket.is_empty()
            }
            None => false,
        };
        if emptied {
            self.buckets.remove(&freq);
            if self.min_frequency == freq {
                self.min_frequency = freq + 1;
            }
        }
    }

    fn evict(&mut self) -> Option<String> {
        let freq = self.min_frequency;
        let bucket = self.buckets.get_mut(&freq)?;
        let (victim, _) = bucket.pop_lru()?;
        if bucket.is_empty() {
            self.buckets.remove(&freq);
        }
        self.entries.remove(&victim);
        self.evictions += 1;
        Some(victim)
    }

    fn recompute_min_frequency(&mut self) {
        self.min_frequency = self.buckets.keys().copied().min().unwrap_or(1);
    }
}

impl<V> LfuCache<V> {
    pub fn new(capacity: usize) -> Result<Self> {
        validate_capacity("lfu capacity", capacity)?;
        Ok(LfuCache {
            inner: Mutex::new(LfuInner {
                entries: HashMap::with_capacity(capacity.min(1024)),
                buckets: HashMap::new(),
                min_frequency: 1,
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
            capacity,
        })
    }

    /// Current access frequency of `key`, if cached. Does not count as an access.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        self.inner.lock().entries.get(key).map(|e| e.frequency)
    }

    pub fn min_frequency(&self) -> Option<u64> {
        let inner = self.inner.lock();
        if inner.entries.is_empty() {
            None
        } else {
            Some(inner.min_frequency)
        }
    }
}

impl<V> BoundedCache<V> for LfuCache<V>
where
    V: Serialize + Clone + Send,
{
    fn get(&self, key: &str) -> Result<Option<V>> {
        validate_key(key)?;
        let mut inner = self.inner.lock();
        let value = inner.entries.get(key).map(|e| e.value.clone());
        match value {
            Some(value) => {
                inner.touch(key);
                inner.hits += 1;
                Ok(Some(value))
            }
            None => {
                inner.misses += 1;
                Ok(None)
            }
        }
    }

    fn put(&self, key: &str, value: V) -> Result<()> {
        validate_key(key)?;
        validate_value(&value)?;

        let mut inner = self.inner.lock();
        if let Some(entry) = inner.entries.get_mut(key) {
            // An update counts as an access.
            entry.value = value;
            inner.touch(key);
            return Ok(());
        }

        if inner.entries.len() >= self.capacity {
            match inner.evict() {
                Some(victim) => {
                    debug!(cache = "lfu", evicted = %victim, "evicted least frequently used entry");
                }
                None => debug_assert!(
                    inner.entries.len() < self.capacity,
                    "full lfu cache had no entry at min_frequency"
                ),
            }
        }

        inner.entries.insert(key.to_string(), LfuEntry { value, frequency: 1 });
        inner.buckets
            .entry(1)
            .or_insert_with(OrderedSet::unbounded)
            .push(key.to_string(), ());
        inner.min_frequency = 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let mut inner = self.inner.lock();
        let Some(entry) = inner.entries.remove(key) else {
            return Ok(false);
        };
        inner.detach(key, entry.frequency);
        // Removal can empty the minimum bucket without the next one existing.
        inner.recompute_min_frequency();
        Ok(true)
    }

    fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.buckets.clear();
        inner.min_frequency = 1;
    }

    fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            size: inner.entries.len(),
            capacity: self.capacity,
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
        }
    }

    fn name(&self) -> &str {
        "lfu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    fn cache(capacity: usize) -> LfuCache<i32> {
        LfuCache::new(capacity).unwrap()
    }

    #[test]
    fn test_evicts_lower_frequency() {
        let c = cache(2);
        c.put("a", 1).unwrap();
        c.put("b", 2).unwrap();
        for _ in 0..3 {
            c.get("a").unwrap();
        }
        c.get("b").unwrap();
        c.put("c", 3).unwrap();

        assert_eq!(c.get("b").unwrap(), None);
        assert_eq!(c.get("a").unwrap(), Some(1));
        assert_eq!(c.get("c").unwrap(), Some(3));
    }

    #[test]
    fn test_ties_evict_oldest_insert() {
        let c = cache(3);
        c.put("a", 1).unwrap();
        c.put("b", 2).unwrap();
        c.put("c", 3).unwrap();
        c.put("d", 4).unwrap();

        assert_eq!(c.frequency("a"), None);
        assert_eq!(c.len(), 3);
        assert_eq!(c.get("b").unwrap(), Some(2));
    }

    #[test]
    fn test_frequency_bookkeeping() {
        let c = cache(4);
        c.put("a", 1).unwrap();
        assert_eq!(c.frequency("a"), Some(1));
        assert_eq!(c.min_frequency(), Some(1));

        c.get("a").unwrap();
        c.get("a").unwrap();
        assert_eq!(c.frequency("a"), Some(3));
        // The only bucket moved up, so the minimum follows it.
        assert_eq!(c.min_frequency(), Some(3));

        c.put("b", 2).unwrap();
        assert_eq!(c.min_frequency(), Some(1));
    }

    #[test]
    fn test_update_counts_as_access() {
        let c = cache(2);
        c.put("a", 1).unwrap();
        c.put("a", 5).unwrap();
        assert_eq!(c.frequency("a"), Some(2));
        assert_eq!(c.len(), 1);

        c.put("b", 2).unwrap();
        c.put("c", 3).unwrap();
        assert_eq!(c.get("b").unwrap(), None);
        assert_eq!(c.get("a").unwrap(), Some(5));
    }

    #[test]
    fn test_remove_keeps_min_frequency_valid() {
        let c = cache(3);
        c.put("a", 1).unwrap();
        c.put("b", 2).unwrap();
        c.get("b").unwrap();
        c.get("b").unwrap();

        assert!(c.remove("a").unwrap());
        assert_eq!(c.min_frequency(), Some(3));

        c.put("c", 3).unwrap();
        c.put("d", 4).unwrap();
        c.put("e", 5).unwrap();
        // "c" was the oldest key at frequency 1.
        assert_eq!(c.frequency("c"), None);
        assert_eq!(c.frequency("b"), Some(3));
    }

    #[test]
    fn test_size_never_exceeds_capacity() {
        let c = cache(3);
        for i in 0..60 {
            let key = format!("k{}", i % 5);
            if i % 3 == 0 {
                c.get(&key).unwrap();
            }
            c.put(&key, i).unwrap();
            assert!(c.len() <= 3);
        }
    }

    #[test]
    fn test_clear_resets_state() {
        let c = cache(2);
        c.put("a", 1).unwrap();
        c.get("a").unwrap();
        c.clear();
        assert_eq!(c.len(), 0);
        assert_eq!(c.min_frequency(), None);

        c.put("b", 2).unwrap();
        assert_eq!(c.frequency("b"), Some(1));
    }

    #[test]
    fn test_invalid_key() {
        let c = cache(1);
        assert_eq!(c.get("").unwrap_err().kind, ErrorKind::InvalidKey);
        assert_eq!(c.put(" ", 1).unwrap_err().kind, ErrorKind::InvalidKey);
        assert_eq!(c.remove("").unwrap_err().kind, ErrorKind::InvalidKey);
    }
}
