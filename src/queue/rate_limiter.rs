use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding-window admission counter.
///
/// Keeps the timestamp of every accepted request still inside the window and
/// prunes expired ones on each check, so cost is linear in the window size.
#[derive(Debug, Clone)]
pub struct SlidingWindowRateLimiter {
    pub limit: usize,
    pub window: Duration,
    timestamps: VecDeque<Instant>,
}

impl SlidingWindowRateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        SlidingWindowRateLimiter {
            limit,
            window,
            timestamps: VecDeque::with_capacity(limit.min(4096)),
        }
    }

    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.timestamps.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn is_limited(&mut self, now: Instant) -> bool {
        self.prune(now);
        self.timestamps.len() >= self.limit
    }

    /// Records an accepted request. A `now` earlier than the newest entry is
    /// clamped to it, keeping the deque ordered for `prune`.
    pub fn record(&mut self, now: Instant) {
        let at = self.timestamps.back().map_or(now, |last| now.max(*last));
        self.timestamps.push_back(at);
    }

    pub fn remaining(&mut self, now: Instant) -> usize {
        self.prune(now);
        self.limit.saturating_sub(self.timestamps.len())
    }

    pub fn reset(&mut self) {
        self.timestamps.clear();
    }
}
