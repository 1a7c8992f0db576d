use std::sync::atomic::{AtomicU64, Ordering};
use chrono::Utc;
use tracing::{debug, info};
use crate::cache::{BoundedCache, LfuCache, LruCache};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::stats::{CoordinatorMetrics, HealthCheck, HealthCheckResult};
use crate::core::types::{CacheStrategy, CacheValue, DocId, RequestPayload};
use crate::index::inverted::TextSearchIndex;
use crate::query::planner::QueryPlanner;
use crate::query::types::{QueryParams, QueryPlan};
use crate::queue::priority::{Priority, PriorityRequestQueue, QueueStats};
use crate::search::results::ScoredDocument;

/// Facade over the caches, search index, request queue and query planner.
///
/// Build one at process start and share it (usually behind an `Arc`) with every
/// request handler. Each component locks its own state; the coordinator's
/// counters are atomics, so no call here holds more than one lock at a time.
pub struct CacheCoordinator {
    config: Config,

    lru: LruCache<CacheValue>,
    lfu: LfuCache<CacheValue>,
    search_index: TextSearchIndex,
    request_queue: PriorityRequestQueue,
    query_planner: QueryPlanner,

    hits: AtomicU64,
    misses: AtomicU64,
    requests_processed: AtomicU64,
    queries_optimized: AtomicU64,
}

impl CacheCoordinator {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let coordinator = CacheCoordinator {
            lru: LruCache::new(config.lru_capacity)?,
            lfu: LfuCache::new(config.lfu_capacity)?,
            search_index: TextSearchIndex::new(),
            request_queue: PriorityRequestQueue::new(
                config.queue_max_size,
                config.rate_limit_requests,
                config.rate_limit_window(),
            )?,
            query_planner: QueryPlanner::from_config(&config)?,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            requests_processed: AtomicU64::new(0),
            queries_optimized: AtomicU64::new(0),
            config,
        };

        info!(
            lru_capacity = coordinator.config.lru_capacity,
            lfu_capacity = coordinator.config.lfu_capacity,
            queue_max_size = coordinator.config.queue_max_size,
            complexity_threshold = coordinator.config.complexity_threshold,
            "cache coordinator ready"
        );
        Ok(coordinator)
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(Config::default())
    }

    fn store(&self, strategy: CacheStrategy) -> &dyn BoundedCache<CacheValue> {
        match strategy {
            CacheStrategy::Lru => &self.lru,
            CacheStrategy::Lfu => &self.lfu,
        }
    }

    // ---- caches ----

    pub fn cache_get(&self, key: &str, strategy: CacheStrategy) -> Result<Option<CacheValue>> {
        let value = self.store(strategy).get(key)?;
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(value)
    }

    pub fn cache_set(&self, key: &str, value: CacheValue, strategy: CacheStrategy) -> Result<()> {
        self.store(strategy).put(key, value)
    }

    /// Drop `key` from one cache, e.g. after the source record changed.
    pub fn cache_invalidate(&self, key: &str, strategy: CacheStrategy) -> Result<bool> {
        self.store(strategy).remove(key)
    }

    /// Read-through lookup: on a miss, run `loader` against the source of truth and
    /// cache whatever it finds.
    pub fn cache_get_or_load<F, E>(
        &self,
        key: &str,
        strategy: CacheStrategy,
        loader: F,
    ) -> std::result::Result<Option<CacheValue>, E>
    where
        F: FnOnce() -> std::result::Result<Option<CacheValue>, E>,
        E: From<Error>,
    {
        if let Some(value) = self.cache_get(key, strategy)? {
            return Ok(Some(value));
        }

        let loaded = loader()?;
        if let Some(value) = &loaded {
            self.cache_set(key, value.clone(), strategy)?;
            debug!(key, strategy = %strategy, "populated cache from loader");
        }
        Ok(loaded)
    }

    pub fn clear_caches(&self) {
        self.lru.clear();
        self.lfu.clear();
        self.query_planner.clear_cache();
    }

    // ---- search ----

    pub fn add_search_document(&self, doc_id: u64, text: &str) -> Result<()> {
        self.search_index.add_document(DocId::new(doc_id), text)
    }

    pub fn remove_search_document(&self, doc_id: u64) -> bool {
        self.search_index.remove_document(DocId::new(doc_id))
    }

    pub fn search_documents(&self, query: &str, limit: usize) -> Result<Vec<ScoredDocument>> {
        self.search_index.search(query, limit)
    }

    // ---- request queue ----

    pub fn add_request(&self, payload: RequestPayload, priority: Priority) -> bool {
        self.request_queue.add_request(payload, priority)
    }

    pub fn get_next_request(&self) -> Option<RequestPayload> {
        let request = self.request_queue.get_next_request()?;
        self.requests_processed.fetch_add(1, Ordering::Relaxed);
        Some(request.payload)
    }

    pub fn queue_stats(&self) -> QueueStats {
        self.request_queue.get_queue_stats()
    }

    // ---- planner ----

    pub fn optimize_query(&self, query_text: &str, params: &QueryParams) -> Result<QueryPlan> {
        let plan = self.query_planner.optimize_query(query_text, params)?;
        self.queries_optimized.fetch_add(1, Ordering::Relaxed);
        Ok(plan)
    }

    // ---- monitoring ----

    pub fn get_metrics(&self) -> CoordinatorMetrics {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            hits as f64 / lookups as f64 * 100.0
        };

        let lru = self.lru.stats();
        let lfu = self.lfu.stats();
        let capacity = lru.capacity + lfu.capacity;
        let cache_utilization = if capacity == 0 {
            0.0
        } else {
            (lru.size + lfu.size) as f64 / capacity as f64 * 100.0
        };

        CoordinatorMetrics {
            timestamp: Utc::now(),
            hits,
            misses,
            hit_rate,
            cache_utilization,
            requests_processed: self.requests_processed.load(Ordering::Relaxed),
            queries_optimized: self.queries_optimized.load(Ordering::Relaxed),
            documents_indexed: self.search_index.document_count(),
            queue_depth: self.request_queue.len(),
            lru,
            lfu,
        }
    }

    pub fn reset_metrics(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.requests_processed.store(0, Ordering::Relaxed);
        self.queries_optimized.store(0, Ordering::Relaxed);
    }

    pub fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::from_checks(vec![
            HealthCheck::cache("lru_cache", &self.lru.stats()),
            HealthCheck::cache("lfu_cache", &self.lfu.stats()),
            HealthCheck::queue(&self.request_queue.get_queue_stats()),
            HealthCheck::search_index(
                self.search_index.document_count(),
                self.search_index.term_count(),
            ),
        ])
    }

    // ---- accessors ----

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lru(&self) -> &LruCache<CacheValue> {
        &self.lru
    }

    pub fn lfu(&self) -> &LfuCache<CacheValue> {
        &self.lfu
    }

    pub fn search_index(&self) -> &TextSearchIndex {
        &self.search_index
    }

    pub fn request_queue(&self) -> &PriorityRequestQueue {
        &self.request_queue
    }

    pub fn query_planner(&self) -> &QueryPlanner {
        &self.query_planner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use serde_json::json;

    fn coordinator() -> CacheCoordinator {
        CacheCoordinator::new(Config::default().with_lru_capacity(2).with_lfu_capacity(2)).unwrap()
    }

    #[test]
    fn test_strategy_dispatch() {
        let c = coordinator();
        c.cache_set("k", json!(1), CacheStrategy::Lru).unwrap();

        assert_eq!(c.cache_get("k", CacheStrategy::Lru).unwrap(), Some(json!(1)));
        assert_eq!(c.cache_get("k", CacheStrategy::Lfu).unwrap(), None);
        assert_eq!(c.lru().len(), 1);
        assert_eq!(c.lfu().len(), 0);
    }

    #[test]
    fn test_hit_miss_metrics() {
        let c = coordinator();
        c.cache_set("a", json!("x"), CacheStrategy::Lfu).unwrap();
        c.cache_get("a", CacheStrategy::Lfu).unwrap();
        c.cache_get("a", CacheStrategy::Lfu).unwrap();
        c.cache_get("b", CacheStrategy::Lfu).unwrap();
        c.cache_get("b", CacheStrategy::Lru).unwrap();

        let metrics = c.get_metrics();
        assert_eq!(metrics.hits, 2);
        assert_eq!(metrics.misses, 2);
        assert!((metrics.hit_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_cache_utilization() {
        let c = coordinator();
        c.cache_set("a", json!(1), CacheStrategy::Lru).unwrap();
        c.cache_set("b", json!(2), CacheStrategy::Lru).unwrap();
        c.cache_set("c", json!(3), CacheStrategy::Lfu).unwrap();
        assert!((c.get_metrics().cache_utilization - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_key_propagates_without_counting() {
        let c = coordinator();
        let err = c.cache_get("", CacheStrategy::Lru).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidKey);
        assert_eq!(c.get_metrics().misses, 0);
    }

    #[test]
    fn test_get_or_load_populates_once() {
        let c = coordinator();
        let mut calls = 0;
        let first: Result<Option<CacheValue>> = c.cache_get_or_load("user:1", CacheStrategy::Lru, || {
            calls += 1;
            Ok(Some(json!({"name": "Ada"})))
        });
        assert_eq!(first.unwrap(), Some(json!({"name": "Ada"})));

        let second: Result<Option<CacheValue>> = c.cache_get_or_load("user:1", CacheStrategy::Lru, || {
            panic!("loader should not run on a hit")
        });
        assert_eq!(second.unwrap(), Some(json!({"name": "Ada"})));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_get_or_load_does_not_cache_absent_rows() {
        let c = coordinator();
        let loaded: Result<Option<CacheValue>> =
            c.cache_get_or_load("user:404", CacheStrategy::Lfu, || Ok(None));
        assert_eq!(loaded.unwrap(), None);
        assert!(c.lfu().is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let c = coordinator();
        c.cache_set("a", json!(1), CacheStrategy::Lfu).unwrap();
        assert!(c.cache_invalidate("a", CacheStrategy::Lfu).unwrap());
        assert!(!c.cache_invalidate("a", CacheStrategy::Lfu).unwrap());

        c.cache_set("b", json!(2), CacheStrategy::Lru).unwrap();
        c.optimize_query("SELECT 1", &QueryParams::new()).unwrap();
        c.clear_caches();
        assert!(c.lru().is_empty());
        assert_eq!(c.query_planner().cached_plans(), 0);
    }

    #[test]
    fn test_request_metrics() {
        let c = coordinator();
        let mut payload = RequestPayload::new();
        payload.insert("op".to_string(), json!("export"));
        assert!(c.add_request(payload.clone(), Priority::High));
        assert_eq!(c.get_next_request(), Some(payload));
        assert_eq!(c.get_next_request(), None);
        assert_eq!(c.get_metrics().requests_processed, 1);
    }

    #[test]
    fn test_queries_optimized_counts_successes() {
        let c = coordinator();
        c.optimize_query("SELECT 1", &QueryParams::new()).unwrap();
        c.optimize_query("SELECT 1", &QueryParams::new()).unwrap();
        assert!(c.optimize_query("SELECT 1; DROP TABLE x", &QueryParams::new()).is_err());
        assert_eq!(c.get_metrics().queries_optimized, 2);

        c.reset_metrics();
        assert_eq!(c.get_metrics().queries_optimized, 0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let err = CacheCoordinator::new(Config::default().with_queue_max_size(0)).err().unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_health_check_reports_components() {
        let c = coordinator();
        let health = c.health_check();
        assert!(health.status.is_healthy());
        let names: Vec<&str> = health.checks.iter().map(|check| check.name.as_str()).collect();
        assert_eq!(names, vec!["lru_cache", "lfu_cache", "request_queue", "search_index"]);
    }
}
