//! Recovery primitives guarding the remote chat endpoint
//!
//! - [`CircuitBreaker`]: stops calling a failing endpoint
//! - [`RateLimiter`]: bounds outbound call volume per window
//! - [`RetryPolicy`] and [`backoff`]: bounded retries with a delay schedule

pub mod backoff;
pub mod circuit_breaker;
pub mod rate_limiter;
pub mod retry;

pub use backoff::{BackoffStrategy, ConstantBackoff, ExponentialBackoff};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats, CircuitState};
pub use rate_limiter::{RateLimiter, RateLimiterConfig};
pub use retry::RetryPolicy;
