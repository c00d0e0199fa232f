//! Rate limiting for outbound chat calls
//!
//! A token bucket shared by every in-flight call of one gateway. Each
//! physical attempt, retries included, takes one token.

mod limiter;
mod types;


pub use limiter::RateLimiter;
pub use types::RateLimiterConfig;
