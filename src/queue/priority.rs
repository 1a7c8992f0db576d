use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Serialize, Deserialize};
use tracing::debug;
use uuid::Uuid;
use crate::core::config::validate_capacity;
use crate::core::error::{Error, Result};
use crate::core::types::RequestPayload;
use crate::queue::rate_limiter::SlidingWindowRateLimiter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Normal,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Normal, Priority::Low];

    /// Parse a priority name, falling back to `Normal` for anything unrecognized.
    pub fn parse_or_default(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Normal,
        }
    }

    fn tier(&self) -> usize {
        match self {
            Priority::High => 0,
            Priority::Normal => 1,
            Priority::Low => 2,
        }
    }
}

impl From<&str> for Priority {
    fn from(name: &str) -> Self {
        Priority::parse_or_default(name)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Priority::High => f.write_str("high"),
            Priority::Normal => f.write_str("normal"),
            Priority::Low => f.write_str("low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedRequest {
    pub id: Uuid,
    pub priority: Priority,
    pub payload: RequestPayload,
    pub enqueued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueStats {
    pub total: usize,
    pub high: usize,
    pub normal: usize,
    pub low: usize,
    pub max_size: usize,
    pub rate_limit_remaining: usize,
    pub accepted: u64,
    pub rejected_rate_limited: u64,
    pub rejected_full: u64,
}

struct QueueInner {
    tiers: [VecDeque<QueuedRequest>; 3],
    limiter: SlidingWindowRateLimiter,
    accepted: u64,
    rejected_rate_limited: u64,
    rejected_full: u64,
}

impl QueueInner {
    fn len(&self) -> usize {
        self.tiers.iter().map(VecDeque::len).sum()
    }
}

/// Three-tier FIFO queue with admission control.
///
/// A request is accepted only if the sliding-window rate limiter has budget
/// left and the queue holds fewer than `max_size` requests. The two gates are
/// independent; a rejection is reported as `false`, never as an error.
pub struct PriorityRequestQueue {
    inner: Mutex<QueueInner>,
    max_size: usize,
}

impl PriorityRequestQueue {
    pub fn new(max_size: usize, rate_limit: usize, window: Duration) -> Result<Self> {
        validate_capacity("queue max_size", max_size)?;
        validate_capacity("rate limit", rate_limit)?;
        if window.is_zero() {
            return Err(Error::invalid_config("rate limit window must be positive"));
        }

        Ok(PriorityRequestQueue {
            inner: Mutex::new(QueueInner {
                tiers: [VecDeque::new(), VecDeque::new(), VecDeque::new()],
                limiter: SlidingWindowRateLimiter::new(rate_limit, window),
                accepted: 0,
                rejected_rate_limited: 0,
                rejected_full: 0,
            }),
            max_size,
        })
    }

    pub fn add_request(&self, payload: RequestPayload, priority: Priority) -> bool {
        self.add_request_at(payload, priority, Instant::now())
    }

    /// Same as [`add_request`](Self::add_request) with an explicit clock reading.
    pub fn add_request_at(&self, payload: RequestPayload, priority: Priority, now: Instant) -> bool {
        let mut inner = self.inner.lock();

        if inner.limiter.is_limited(now) {
            inner.rejected_rate_limited += 1;
            debug!(priority = %priority, "request rejected: rate limit reached");
            return false;
        }
        if inner.len() >= self.max_size {
            inner.rejected_full += 1;
            debug!(priority = %priority, max_size = self.max_size, "request rejected: queue full");
            return false;
        }

        inner.tiers[priority.tier()].push_back(QueuedRequest {
            id: Uuid::new_v4(),
            priority,
            payload,
            enqueued_at: Utc::now(),
        });
        inner.limiter.record(now);
        inner.accepted += 1;
        true
    }

    /// Pop the oldest request of the highest non-empty tier.
    pub fn get_next_request(&self) -> Option<QueuedRequest> {
        let mut inner = self.inner.lock();
        inner.tiers.iter_mut().find_map(VecDeque::pop_front)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn get_queue_stats(&self) -> QueueStats {
        self.get_queue_stats_at(Instant::now())
    }

    pub fn get_queue_stats_at(&self, now: Instant) -> QueueStats {
        let mut inner = self.inner.lock();
        let rate_limit_remaining = inner.limiter.remaining(now);
        QueueStats {
            total: inner.len(),
            high: inner.tiers[Priority::High.tier()].len(),
            normal: inner.tiers[Priority::Normal.tier()].len(),
            low: inner.tiers[Priority::Low.tier()].len(),
            max_size: self.max_size,
            rate_limit_remaining,
            accepted: inner.accepted,
            rejected_rate_limited: inner.rejected_rate_limited,
            rejected_full: inner.rejected_full,
        }
    }

    /// Drop all queued requests; rate-limit history is kept.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        for tier in inner.tiers.iter_mut() {
            tier.clear();
        }
    }
}
