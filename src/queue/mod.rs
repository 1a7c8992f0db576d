pub mod priority;
pub mod rate_limiter;
