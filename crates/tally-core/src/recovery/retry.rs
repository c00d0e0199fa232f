//! Bounded retry loop for transient failures
//!
//! `max_attempts` counts physical attempts, the first one included. Only
//! errors classified retryable by
//! [`GatewayError::is_retryable`](crate::error::GatewayError::is_retryable) get
//! another attempt; anything else surfaces immediately.

use super::backoff::{self, BackoffStrategy, ConstantBackoff};
use crate::config::ClientConfig;
use crate::error::GatewayResult;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry policy for one logical call
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Box<dyn BackoffStrategy>,
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` is floored at one
    pub fn new(max_attempts: u32, backoff: impl BackoffStrategy + 'static) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Box::new(backoff),
        }
    }

    /// Build the policy described by a gateway configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            backoff: backoff::from_config(config),
        }
    }

    /// A policy that makes a single attempt
    pub fn no_retry() -> Self {
        Self::new(1, ConstantBackoff::new(Duration::ZERO))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the attempt following `failed_attempt` (0-indexed)
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        self.backoff.delay_for_attempt(failed_attempt)
    }

    /// Execute an operation with retries.
    ///
    /// The operation receives the 0-indexed attempt number. When every
    /// attempt fails, the last error is returned exactly as produced.
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> GatewayResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        let mut attempt = 0;

        loop {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(attempt = attempt + 1, "request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !error.is_retryable() {
                        return Err(error);
                    }

                    if attempt + 1 >= self.max_attempts {
                        warn!(
                            attempts = self.max_attempts,
                            error = %error,
                            "all retry attempts exhausted"
                        );
                        return Err(error);
                    }

                    let delay = self.delay_after(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "retrying after failure"
                    );

                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("first_delay", &self.delay_after(0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn constant(max_attempts: u32, delay_ms: u64) -> RetryPolicy {
        RetryPolicy::new(max_attempts, ConstantBackoff::new(Duration::from_millis(delay_ms)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_success_immediately() {
        let policy = constant(3, 100);
        let result = policy.execute(|_| async { Ok(42) }).await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_success_after_failures() {
        let attempts = Arc::new(AtomicU32::new(0));
        let policy = constant(3, 100);

        let result = policy
            .execute(|_| {
                let attempts = attempts.clone();
                async move {
                    let count = attempts.fetch_add(1, Ordering::SeqCst);
                    if count < 2 {
                        Err(GatewayError::transport("timeout"))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_max_attempts_exceeded_keeps_last_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let policy = constant(3, 100);

        let result: GatewayResult<()> = policy
            .execute(|attempt| {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(GatewayError::transport(format!("Network error #{}", attempt)))
                }
            })
            .await;

        assert_eq!(result.unwrap_err().to_string(), "Network error #2");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_permanent_error_no_retry() {
        let attempts = Arc::new(AtomicU32::new(0));
        let policy = constant(5, 100);

        let result: GatewayResult<()> = policy
            .execute(|_| {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(GatewayError::transport_status("unauthorized", 401))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_format_not_retried() {
        let attempts = Arc::new(AtomicU32::new(0));
        let policy = constant(5, 100);

        let result: GatewayResult<()> = policy
            .execute(|_| {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(GatewayError::response_format("no text content found"))
                }
            })
            .await;

        assert!(matches!(result, Err(GatewayError::ResponseFormat { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_waits_between_attempts() {
        let policy = constant(3, 250);
        let start = Instant::now();

        let _: GatewayResult<()> = policy
            .execute(|_| async { Err(GatewayError::transport("boom")) })
            .await;

        // Two gaps between three attempts
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_attempts_floored_to_one() {
        assert_eq!(constant(0, 10).max_attempts(), 1);
        assert_eq!(RetryPolicy::no_retry().max_attempts(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig::default()
            .with_max_retries(4)
            .with_retry_delay_ms(20);
        let policy = RetryPolicy::from_config(&config);

        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.delay_after(3), Duration::from_millis(20));
    }
}
