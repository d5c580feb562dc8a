//! Shared helpers: bounded retry and request rate limiting

pub mod rate_limit;
pub mod retry;

pub use rate_limit::RateLimiter;
pub use retry::retry_with_attempts;
