//! Backoff strategies for retry operations
//!
//! The delay schedule is kept apart from the retry loop so it can be
//! tested without a transport.

use crate::config::ClientConfig;
use std::time::Duration;

/// Backoff strategy trait
pub trait BackoffStrategy: Send + Sync {
    /// Get the delay after the given failed attempt (0-indexed)
    fn delay_for_attempt(&self, attempt: u32) -> Duration;
}

/// Constant backoff - same delay for all attempts
#[derive(Debug, Clone)]
pub struct ConstantBackoff {
    delay: Duration,
}

impl ConstantBackoff {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl BackoffStrategy for ConstantBackoff {
    fn delay_for_attempt(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

/// Exponential backoff: `initial * 2^attempt`, capped at `max_delay`
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    max_delay: Duration,
}

impl ExponentialBackoff {
    pub fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay: max_delay.max(initial_delay),
        }
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Pick the schedule configured for a gateway.
///
/// Without `max_retry_delay_ms` every retry waits `retry_delay_ms`; with it
/// the delay doubles from `retry_delay_ms` up to the cap.
pub fn from_config(config: &ClientConfig) -> Box<dyn BackoffStrategy> {
    let initial = Duration::from_millis(config.retry_delay_ms);
    match config.max_retry_delay_ms {
        Some(max_ms) => Box::new(ExponentialBackoff::new(
            initial,
            Duration::from_millis(max_ms),
        )),
        None => Box::new(ConstantBackoff::new(initial)),
    }
}
