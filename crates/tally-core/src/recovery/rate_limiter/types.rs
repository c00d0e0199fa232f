//! Type definitions for rate limiting

use crate::config::RateLimitSettings;
use std::time::Duration;
use tokio::time::Instant;

/// Token bucket configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Bucket capacity; also the number of tokens restored per tick
    pub capacity: u32,
    /// Length of one refill tick
    pub refill_interval: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::from(&RateLimitSettings::default())
    }
}

impl From<&RateLimitSettings> for RateLimiterConfig {
    fn from(settings: &RateLimitSettings) -> Self {
        Self {
            capacity: settings.max_tokens_per_minute.max(1),
            refill_interval: settings.refill_interval().max(Duration::from_millis(1)),
        }
    }
}

impl RateLimiterConfig {
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            refill_interval: refill_interval.max(Duration::from_millis(1)),
        }
    }
}

/// Bucket contents, mutated only under the limiter's lock
#[derive(Debug)]
pub(super) struct BucketState {
    pub config: RateLimiterConfig,
    pub available_tokens: u32,
    /// Start of the current refill tick
    pub last_refill_at: Instant,
}

impl BucketState {
    pub fn new(config: RateLimiterConfig, now: Instant) -> Self {
        Self {
            config,
            available_tokens: config.capacity,
            last_refill_at: now,
        }
    }

    /// Restore the bucket to capacity if at least one tick has passed.
    ///
    /// `last_refill_at` stays aligned to tick boundaries, so a caller that
    /// arrives late does not shift the schedule.
    pub fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill_at);
        let interval = self.config.refill_interval;
        if elapsed < interval {
            return;
        }

        let remainder_nanos = elapsed.as_nanos() % interval.as_nanos();
        let remainder = Duration::from_nanos(u64::try_from(remainder_nanos).unwrap_or(u64::MAX));
        self.last_refill_at = now - remainder;
        self.available_tokens = self.config.capacity;
    }

    /// Time left until the next tick starts
    pub fn until_next_refill(&self, now: Instant) -> Duration {
        (self.last_refill_at + self.config.refill_interval).saturating_duration_since(now)
    }
}
