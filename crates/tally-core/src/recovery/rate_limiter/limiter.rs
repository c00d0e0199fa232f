//! Token bucket rate limiter implementation

use super::types::{BucketState, RateLimiterConfig};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// Rate limiter using a token bucket that refills in whole ticks.
///
/// The check-and-decrement happens under one lock, so two concurrent
/// callers never take the same token. The lock is released while a caller
/// sleeps for the next tick.
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<BucketState>,
}

impl RateLimiter {
    /// Create a new rate limiter with default configuration
    pub fn new() -> Self {
        Self::with_config(RateLimiterConfig::default())
    }

    /// Create a new rate limiter with a full bucket
    pub fn with_config(config: RateLimiterConfig) -> Self {
        Self {
            state: Mutex::new(BucketState::new(config, Instant::now())),
        }
    }

    /// Take a token without waiting; `false` when the bucket is empty
    pub async fn try_acquire(&self) -> bool {
        let mut state = self.state.lock().await;
        state.refill(Instant::now());

        if state.available_tokens > 0 {
            state.available_tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Take a token, waiting for the next refill tick if the bucket is empty.
    ///
    /// Returns how long the caller was held back.
    pub async fn acquire(&self) -> Duration {
        let start = Instant::now();

        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                state.refill(now);

                if state.available_tokens > 0 {
                    state.available_tokens -= 1;
                    return start.elapsed();
                }
                state.until_next_refill(now)
            };

            tracing::debug!(
                wait_ms = wait.as_millis() as u64,
                "Rate limit reached, waiting for refill"
            );
            // A zero wait means the tick boundary is now; yield and re-check.
            sleep(wait.max(Duration::from_millis(1))).await;
        }
    }

    /// Tokens currently in the bucket, after applying any due refill
    pub async fn available_tokens(&self) -> u32 {
        let mut state = self.state.lock().await;
        state.refill(Instant::now());
        state.available_tokens
    }

    /// Get configuration
    pub async fn config(&self) -> RateLimiterConfig {
        self.state.lock().await.config
    }

    /// Apply a new capacity and tick length.
    ///
    /// Tokens already in the bucket are kept, clamped to the new capacity.
    pub async fn reconfigure(&self, config: RateLimiterConfig) {
        let mut state = self.state.lock().await;
        state.config = config;
        state.available_tokens = state.available_tokens.min(config.capacity);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
