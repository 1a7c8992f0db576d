use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use parking_lot::Mutex;
use crate::cache::{BoundedCache, CacheStats, LruCache};
use crate::core::error::Result;
use crate::query::types::QueryPlan;

/// Plan cache for avoiding recomputation
pub struct PlanCache {
    plans: LruCache<QueryPlan>,
    usage: Mutex<HashMap<String, u64>>,   // query text -> times served from cache
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl PlanCache {
    pub fn new(size_limit: usize) -> Result<Self> {
        Ok(PlanCache {
            plans: LruCache::new(size_limit)?,
            usage: Mutex::new(HashMap::new()),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        })
    }

    /// Look up a plan by its signature digest, counting a use of its query text on hit.
    pub fn get(&self, cache_key: &str) -> Result<Option<QueryPlan>> {
        match self.plans.get(cache_key)? {
            Some(plan) => {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                *self.usage.lock().entry(plan.query_text.clone()).or_insert(0) += 1;
                Ok(Some(plan))
            }
            None => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    pub fn put(&self, plan: QueryPlan) -> Result<()> {
        let key = plan.cache_key.clone();
        self.plans.put(&key, plan)
    }

    pub fn usage_count(&self, query_text: &str) -> u64 {
        self.usage.lock().get(query_text).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn clear(&self) {
        self.plans.clear();
        self.usage.lock().clear();
    }

    pub fn hits(&self) -> u64 {
        self.hit_count.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.miss_count.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> CacheStats {
        self.plans.stats()
    }
}
