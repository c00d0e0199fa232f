//! Circuit breaker implementation

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::time::Instant;

use super::types::{BreakerState, CircuitBreakerConfig, CircuitBreakerStats, CircuitState};
use crate::error::{GatewayError, GatewayResult};

/// Circuit breaker guarding one remote dependency.
///
/// All state transitions happen under a single lock, so two concurrent
/// failures cannot both observe the threshold and open the circuit twice.
/// The lock is never held across an await point.
pub struct CircuitBreaker {
    /// Component name (for logging)
    name: String,
    config: RwLock<CircuitBreakerConfig>,
    state: Mutex<BreakerState>,
    total_calls: AtomicU64,
    total_failures: AtomicU64,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with default config
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, CircuitBreakerConfig::default())
    }

    /// Create a new circuit breaker with custom config
    pub fn with_config(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config: RwLock::new(config),
            state: Mutex::new(BreakerState::default()),
            total_calls: AtomicU64::new(0),
            total_failures: AtomicU64::new(0),
        }
    }

    /// Get the component name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> CircuitBreakerConfig {
        *self.config.read()
    }

    /// Replace thresholds and timeouts; the current state is kept.
    pub fn reconfigure(&self, config: CircuitBreakerConfig) {
        *self.config.write() = config;
    }

    /// Current state as last recorded.
    ///
    /// Time-based transitions (open to half-open) only happen when a call
    /// asks for permission through [`CircuitBreaker::try_acquire`].
    pub fn state(&self) -> CircuitState {
        self.state.lock().state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.state.lock().consecutive_failures
    }

    /// Ask permission for one logical call.
    ///
    /// Fails with [`GatewayError::CircuitOpen`] while the circuit is open,
    /// and in half-open state once the trial window has passed. A late
    /// rejection leaves the state alone, so a trial still in flight can
    /// close the circuit when it succeeds.
    pub fn try_acquire(&self) -> GatewayResult<()> {
        let config = self.config();
        let now = Instant::now();
        let mut guard = self.state.lock();

        let current = guard.state;
        match current {
            CircuitState::Closed => Ok(()),
            CircuitState::Open => {
                let ready = guard
                    .opened_at
                    .map(|opened_at| now.duration_since(opened_at) >= config.reset_timeout)
                    .unwrap_or(true);
                if ready {
                    self.transition_to_half_open(&mut guard, now);
                    Ok(())
                } else {
                    Err(GatewayError::circuit_open(&self.name))
                }
            }
            CircuitState::HalfOpen => {
                let elapsed = guard
                    .half_open_since
                    .map(|since| now.duration_since(since))
                    .unwrap_or_default();
                let stale_after = config
                    .half_open_timeout
                    .saturating_add(config.reset_timeout);

                if elapsed <= config.half_open_timeout {
                    Ok(())
                } else if elapsed >= stale_after {
                    // No verdict for a whole cool-down: open a new trial window
                    self.transition_to_half_open(&mut guard, now);
                    Ok(())
                } else {
                    // Trials still in flight decide the state
                    Err(GatewayError::circuit_open(&self.name))
                }
            }
        }
    }

    /// Record a successful operation
    pub fn record_success(&self) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);

        let mut guard = self.state.lock();
        let current = guard.state;
        match current {
            CircuitState::Closed => {
                guard.consecutive_failures = 0;
            }
            CircuitState::HalfOpen => {
                self.transition_to_closed(&mut guard);
            }
            CircuitState::Open => {
                // Admitted before the circuit opened; the next trial decides.
            }
        }
    }

    /// Record a failed operation
    pub fn record_failure(&self) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        self.total_failures.fetch_add(1, Ordering::Relaxed);

        let threshold = self.config().failure_threshold;
        let now = Instant::now();
        let mut guard = self.state.lock();
        guard.last_failure_at = Some(now);
        guard.consecutive_failures = guard.consecutive_failures.saturating_add(1);

        let current = guard.state;
        match current {
            CircuitState::Closed => {
                if guard.consecutive_failures >= threshold {
                    self.transition_to_open(&mut guard, now);
                }
            }
            CircuitState::HalfOpen => {
                // Any failure in half-open state opens the circuit again
                self.transition_to_open(&mut guard, now);
            }
            CircuitState::Open => {}
        }
    }

    /// Execute an operation with circuit breaker protection.
    ///
    /// The operation is not started when the circuit is open. Its outcome
    /// is recorded exactly once, whatever happened inside it.
    pub async fn call<T, F, Fut>(&self, operation: F) -> GatewayResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        self.try_acquire()?;

        match operation().await {
            Ok(result) => {
                self.record_success();
                Ok(result)
            }
            Err(e) => {
                self.record_failure();
                Err(e)
            }
        }
    }

    /// Get circuit breaker statistics
    pub fn stats(&self) -> CircuitBreakerStats {
        let guard = self.state.lock();
        CircuitBreakerStats {
            state: guard.state,
            consecutive_failures: guard.consecutive_failures,
            total_calls: self.total_calls.load(Ordering::Relaxed),
            total_failures: self.total_failures.load(Ordering::Relaxed),
            last_failure_at: guard.last_failure_at,
            opened_at: guard.opened_at,
        }
    }

    /// Manually reset the circuit breaker to closed state
    pub fn reset(&self) {
        let mut guard = self.state.lock();
        self.transition_to_closed(&mut guard);
    }

    /// Manually open the circuit breaker
    pub fn trip(&self) {
        let mut guard = self.state.lock();
        self.transition_to_open(&mut guard, Instant::now());
    }

    fn transition_to_open(&self, state: &mut BreakerState, now: Instant) {
        state.state = CircuitState::Open;
        state.opened_at = Some(now);
        state.half_open_since = None;

        tracing::warn!(
            circuit = %self.name,
            consecutive_failures = state.consecutive_failures,
            "Circuit breaker opened"
        );
    }

    fn transition_to_half_open(&self, state: &mut BreakerState, now: Instant) {
        state.state = CircuitState::HalfOpen;
        state.half_open_since = Some(now);

        tracing::info!(
            circuit = %self.name,
            "Circuit breaker transitioning to half-open"
        );
    }

    fn transition_to_closed(&self, state: &mut BreakerState) {
        state.state = CircuitState::Closed;
        state.consecutive_failures = 0;
        state.opened_at = None;
        state.half_open_since = None;

        tracing::info!(
            circuit = %self.name,
            "Circuit breaker closed"
        );
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}
