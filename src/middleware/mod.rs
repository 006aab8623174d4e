// HTTP middleware applied ahead of routing
pub mod error_shaping;
pub mod rate_limit;

pub use rate_limit::{RateLimit, RateLimitConfig, RateLimiter};
