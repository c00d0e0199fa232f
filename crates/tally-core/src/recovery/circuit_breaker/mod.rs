//! Circuit breaker pattern for fault tolerance
//!
//! Stops calling a failing endpoint after repeated failures and probes it
//! again once a cool-down has passed.

mod breaker;
#[cfg(test)]
mod tests;
mod types;

pub use breaker::CircuitBreaker;
pub use types::{CircuitBreakerConfig, CircuitBreakerStats, CircuitState};
