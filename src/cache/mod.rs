//! Fixed-capacity key/value stores shared by the coordinator and the query planner.
//!
//! Both variants guard their state with a single `parking_lot::Mutex`, so every
//! operation on one cache is serialized. Values must be serializable: the size
//! ceiling is checked against their JSON encoding before insertion.

pub mod lru;
pub mod lfu;

use serde::{Serialize, Deserialize};
use crate::core::error::{Error, Result};

pub use self::lfu::LfuCache;
pub use self::lru::LruCache;

/// Per-entry ceiling on the serialized size of a cached value (1 MiB).
pub const MAX_ENTRY_BYTES: usize = 1024 * 1024;

/// Common capability of the bounded caches.
pub trait BoundedCache<V>: Send + Sync {
    /// Look up `key`, updating recency or frequency bookkeeping on a hit.
    fn get(&self, key: &str) -> Result<Option<V>>;

    /// Insert or replace `key`, evicting one entry if a new key meets a full cache.
    fn put(&self, key: &str, value: V) -> Result<()>;

    /// Drop `key` without touching any other entry. Returns whether it was present.
    fn remove(&self, key: &str) -> Result<bool>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn clear(&self);

    fn stats(&self) -> CacheStats;

    fn name(&self) -> &str;
}

/// Snapshot of a single cache's counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.size as f64 / self.capacity as f64
        }
    }
}

pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::invalid_key("cache key must be a non-empty string"));
    }
    Ok(())
}

/// Serialize `value` once to check it against [`MAX_ENTRY_BYTES`].
pub(crate) fn validate_value<V: Serialize>(value: &V) -> Result<usize> {
    let encoded = serde_json::to_vec(value)?;
    if encoded.len() > MAX_ENTRY_BYTES {
        return Err(Error::value_too_large(format!(
            "serialized value is {} bytes, limit is {}",
            encoded.len(),
            MAX_ENTRY_BYTES
        )));
    }
    Ok(encoded.len())
}
