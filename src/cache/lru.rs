use std::num::NonZeroUsize;
use lru::LruCache as LruMap;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;
use crate::cache::{validate_key, validate_value, BoundedCache, CacheStats};
use crate::core::config::validate_capacity;
use crate::core::error::Result;

/// Least-recently-used cache with a fixed entry count
pub struct LruCache<V> {
    inner: Mutex<LruInner<V>>,
    capacity: usize,
}

struct LruInner<V> {
    entries: LruMap<String, V>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<V> LruCache<V> {
    pub fn new(capacity: usize) -> Result<Self> {
        validate_capacity("lru capacity", capacity)?;
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Ok(LruCache {
            inner: Mutex::new(LruInner {
                entries: LruMap::new(cap),
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
            capacity,
        })
    }

    /// Keys ordered from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let inner = self.inner.lock();
        inner.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().entries.contains(key)
    }
}

impl<V> BoundedCache<V> for LruCache<V>
where
    V: Serialize + Clone + Send,
{
    fn get(&self, key: &str) -> Result<Option<V>> {
        validate_key(key)?;
        let mut inner = self.inner.lock();
        match inner.entries.get(key).cloned() {
            Some(value) => {
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
        // `push` hands back the displaced pair: the old value on replace, the LRU entry on eviction.
        if let Some((old_key, _)) = inner.entries.push(key.to_string(), value) {
            if old_key != key {
                inner.evictions += 1;
                debug!(cache = "lru", evicted = %old_key, "evicted least recently used entry");
            }
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.inner.lock().entries.pop(key).is_some())
    }

    fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&self) {
        self.inner.lock().entries.clear();
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
        "lru"
    }
}
