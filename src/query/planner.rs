use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use crate::core::config::{Config, validate_capacity};
use crate::core::error::{Error, Result};
use crate::core::types::CacheStrategy;
use crate::query::cache::PlanCache;
use crate::query::types::{CostModel, OptimizationHint, QueryFeatures, QueryParams, QueryPlan};
use crate::query::validator::QueryValidator;

pub const DEFAULT_PLAN_CACHE_SIZE: usize = 1000;

/// Query planner picks a cache strategy and TTL from a complexity heuristic
pub struct QueryPlanner {
    pub complexity_threshold: u64,
    pub base_ttl_secs: u64,
    pub cost_model: CostModel,
    validator: QueryValidator,
    plans: PlanCache,
}

impl QueryPlanner {
    pub fn new(complexity_threshold: u64, base_ttl_secs: u64) -> Result<Self> {
        Self::with_plan_cache_size(complexity_threshold, base_ttl_secs, DEFAULT_PLAN_CACHE_SIZE)
    }

    pub fn with_plan_cache_size(
        complexity_threshold: u64,
        base_ttl_secs: u64,
        plan_cache_size: usize,
    ) -> Result<Self> {
        if complexity_threshold == 0 {
            return Err(Error::invalid_config("complexity_threshold must be positive"));
        }
        if base_ttl_secs == 0 {
            return Err(Error::invalid_config("cache ttl must be positive"));
        }
        validate_capacity("plan cache size", plan_cache_size)?;

        Ok(QueryPlanner {
            complexity_threshold,
            base_ttl_secs,
            cost_model: CostModel::default(),
            validator: QueryValidator::new()?,
            plans: PlanCache::new(plan_cache_size)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_plan_cache_size(
            config.complexity_threshold,
            config.cache_ttl_secs,
            config.plan_cache_capacity,
        )
    }

    /// Plan `query_text`, returning the memoized plan when the signature was seen before.
    pub fn optimize_query(&self, query_text: &str, params: &QueryParams) -> Result<QueryPlan> {
        if let Err(err) = self.validator.validate(query_text) {
            warn!(query_len = query_text.len(), error = %err, "query rejected before planning");
            return Err(err);
        }

        let cache_key = plan_cache_key(query_text, params);
        if let Some(plan) = self.plans.get(&cache_key)? {
            debug!(key = &cache_key[..12], "plan cache hit");
            return Ok(plan);
        }

        let plan = self.build_plan(query_text, params, cache_key);
        debug!(
            key = &plan.cache_key[..12],
            complexity = plan.complexity_score,
            strategy = %plan.cache_strategy,
            "plan cache miss, computed new plan"
        );
        // Plans too large to memoize are still valid answers.
        if let Err(err) = self.plans.put(plan.clone()) {
            debug!(key = &plan.cache_key[..12], error = %err, "plan not memoized");
        }
        Ok(plan)
    }

    fn build_plan(&self, query_text: &str, params: &QueryParams, cache_key: String) -> QueryPlan {
        let complexity_score = QueryFeatures::extract(query_text, params).complexity(&self.cost_model);

        let (cache_strategy, ttl_seconds, optimization_hints) = if complexity_score < self.complexity_threshold {
            (CacheStrategy::Lru, self.base_ttl_secs, Vec::new())
        } else {
            (
                CacheStrategy::Lfu,
                self.base_ttl_secs.saturating_mul(2),
                vec![OptimizationHint::ConsiderIndexing, OptimizationHint::UsePagination],
            )
        };

        QueryPlan {
            query_text: query_text.to_string(),
            cache_key,
            complexity_score,
            cache_strategy,
            ttl_seconds,
            optimization_hints,
        }
    }

    /// How many times a plan for `query_text` was served from the plan cache.
    pub fn usage_count(&self, query_text: &str) -> u64 {
        self.plans.usage_count(query_text)
    }

    /// Number of plans computed from scratch.
    pub fn plans_computed(&self) -> u64 {
        self.plans.misses()
    }

    pub fn plan_cache_hits(&self) -> u64 {
        self.plans.hits()
    }

    pub fn cached_plans(&self) -> usize {
        self.plans.len()
    }

    pub fn clear_cache(&self) {
        self.plans.clear();
    }
}

/// SHA-256 over the query text and its sorted `name=value` parameter pairs.
///
/// Parameter values only ever appear hashed, so the key is safe to log.
pub fn plan_cache_key(query_text: &str, params: &QueryParams) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query_text.as_bytes());
    hasher.update([0u8]);
    for (name, value) in params {
        hasher.update(name.as_bytes());
        hasher.update(b"=");
        hasher.update(value.to_string().as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}
