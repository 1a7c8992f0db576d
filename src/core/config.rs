use std::time::Duration;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, Result};

/// Upper bound for every capacity-like setting.
pub const MAX_CAPACITY: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lru_capacity: usize,
    pub lfu_capacity: usize,

    pub queue_max_size: usize,
    pub rate_limit_requests: usize,
    pub rate_limit_window_secs: u64,

    pub complexity_threshold: u64,
    pub cache_ttl_secs: u64,
    pub plan_cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lru_capacity: 1000,
            lfu_capacity: 1000,

            queue_max_size: 1000,
            rate_limit_requests: 1000,   // accepted requests per window
            rate_limit_window_secs: 60,

            complexity_threshold: 1000,
            cache_ttl_secs: 300,         // doubled for complex queries
            plan_cache_capacity: 1000,
        }
    }
}

impl Config {
    pub fn with_lru_capacity(mut self, capacity: usize) -> Self {
        self.lru_capacity = capacity;
        self
    }

    pub fn with_lfu_capacity(mut self, capacity: usize) -> Self {
        self.lfu_capacity = capacity;
        self
    }

    pub fn with_queue_max_size(mut self, max_size: usize) -> Self {
        self.queue_max_size = max_size;
        self
    }

    pub fn with_rate_limit(mut self, requests: usize, window_secs: u64) -> Self {
        self.rate_limit_requests = requests;
        self.rate_limit_window_secs = window_secs;
        self
    }

    pub fn with_complexity_threshold(mut self, threshold: u64) -> Self {
        self.complexity_threshold = threshold;
        self
    }

    pub fn with_cache_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.cache_ttl_secs = ttl_secs;
        self
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    /// Reject zero or absurdly large sizes before any component is built.
    pub fn validate(&self) -> Result<()> {
        validate_capacity("lru_capacity", self.lru_capacity)?;
        validate_capacity("lfu_capacity", self.lfu_capacity)?;
        validate_capacity("queue_max_size", self.queue_max_size)?;
        validate_capacity("rate_limit_requests", self.rate_limit_requests)?;
        validate_capacity("plan_cache_capacity", self.plan_cache_capacity)?;

        if self.rate_limit_window_secs == 0 {
            return Err(Error::invalid_config("rate_limit_window_secs must be positive"));
        }
        if self.complexity_threshold == 0 {
            return Err(Error::invalid_config("complexity_threshold must be positive"));
        }
        if self.complexity_threshold > MAX_CAPACITY as u64 {
            return Err(Error::invalid_config(format!(
                "complexity_threshold must be at most {}", MAX_CAPACITY
            )));
        }
        if self.cache_ttl_secs == 0 {
            return Err(Error::invalid_config("cache_ttl_secs must be positive"));
        }
        Ok(())
    }
}

pub(crate) fn validate_capacity(name: &str, value: usize) -> Result<()> {
    if value == 0 || value > MAX_CAPACITY {
        return Err(Error::invalid_config(format!(
            "{} must be between 1 and {}, got {}", name, MAX_CAPACITY, value
        )));
    }
    Ok(())
}
