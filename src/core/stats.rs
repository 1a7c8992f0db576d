use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use crate::cache::CacheStats;
use crate::queue::priority::QueueStats;

/// Coordinator metrics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorMetrics {
    pub timestamp: DateTime<Utc>,

    // Global cache counters (coordinator-level, both strategies)
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,              // percent
    pub cache_utilization: f64,     // percent of combined capacity

    pub requests_processed: u64,
    pub queries_optimized: u64,

    pub documents_indexed: usize,
    pub queue_depth: usize,

    pub lru: CacheStats,
    pub lfu: CacheStats,
}

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    fn severity(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 0,
            HealthStatus::Degraded(_) => 1,
            HealthStatus::Unhealthy(_) => 2,
        }
    }
}

/// Health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    pub timestamp: DateTime<Utc>,
}

impl HealthCheckResult {
    /// Overall status is the worst status among the individual checks.
    pub fn from_checks(checks: Vec<HealthCheck>) -> Self {
        let status = checks
            .iter()
            .map(|check| &check.status)
            .max_by_key(|status| status.severity())
            .cloned()
            .unwrap_or(HealthStatus::Healthy);

        HealthCheckResult {
            status,
            checks,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub message: Option<String>,
}

impl HealthCheck {
    pub fn cache(name: &str, stats: &CacheStats) -> Self {
        HealthCheck {
            name: name.to_string(),
            // A full cache is the steady state, not a problem.
            status: HealthStatus::Healthy,
            message: Some(format!(
                "{}/{} entries, {} evictions",
                stats.size, stats.capacity, stats.evictions
            )),
        }
    }

    pub fn queue(stats: &QueueStats) -> Self {
        let fill = stats.total as f64 / stats.max_size.max(1) as f64;
        let status = if stats.rate_limit_remaining == 0 {
            HealthStatus::Degraded("rate limit exhausted".to_string())
        } else if fill >= 0.9 {
            HealthStatus::Degraded(format!("queue {:.0}% full", fill * 100.0))
        } else {
            HealthStatus::Healthy
        };

        HealthCheck {
            name: "request_queue".to_string(),
            status,
            message: Some(format!("{}/{} queued", stats.total, stats.max_size)),
        }
    }

    pub fn search_index(documents: usize, terms: usize) -> Self {
        HealthCheck {
            name: "search_index".to_string(),
            status: HealthStatus::Healthy,
            message: Some(format!("{} documents, {} terms", documents, terms)),
        }
    }
}
