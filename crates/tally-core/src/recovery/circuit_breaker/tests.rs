//! Tests for circuit breaker functionality

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::breaker::CircuitBreaker;
use super::types::{CircuitBreakerConfig, CircuitState};
use crate::error::{CIRCUIT_OPEN_MESSAGE, GatewayError, GatewayResult};

fn config(failure_threshold: u32, reset_ms: u64, half_open_ms: u64) -> CircuitBreakerConfig {
    CircuitBreakerConfig {
        failure_threshold,
        reset_timeout: Duration::from_millis(reset_ms),
        half_open_timeout: Duration::from_millis(half_open_ms),
    }
}

#[tokio::test]
async fn test_circuit_starts_closed() {
    let cb = CircuitBreaker::new("test");
    assert_eq!(cb.state(), CircuitState::Closed);
    assert!(cb.try_acquire().is_ok());
}

#[tokio::test]
async fn test_circuit_opens_after_failures() {
    let cb = CircuitBreaker::with_config("test", config(3, 1_000, 500));

    cb.record_failure();
    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Closed);

    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Open);

    let err = cb.try_acquire().unwrap_err();
    assert!(err.is_circuit_open());
    assert_eq!(err.to_string(), CIRCUIT_OPEN_MESSAGE);
}

#[tokio::test]
async fn test_success_resets_consecutive_failures() {
    let cb = CircuitBreaker::with_config("test", config(3, 1_000, 500));

    cb.record_failure();
    cb.record_failure();
    cb.record_success();
    assert_eq!(cb.consecutive_failures(), 0);

    cb.record_failure();
    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_circuit_transitions_to_half_open() {
    let cb = CircuitBreaker::with_config("test", config(1, 50, 500));

    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Open);
    assert!(cb.try_acquire().is_err());

    tokio::time::advance(Duration::from_millis(60)).await;

    assert!(cb.try_acquire().is_ok());
    assert_eq!(cb.state(), CircuitState::HalfOpen);
}

#[tokio::test(start_paused = true)]
async fn test_half_open_success_closes() {
    let cb = CircuitBreaker::with_config("test", config(2, 10, 500));

    cb.record_failure();
    cb.record_failure();
    tokio::time::advance(Duration::from_millis(20)).await;
    assert!(cb.try_acquire().is_ok());

    cb.record_success();
    assert_eq!(cb.state(), CircuitState::Closed);
    assert_eq!(cb.consecutive_failures(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_half_open_failure_reopens() {
    let cb = CircuitBreaker::with_config("test", config(1, 10, 500));

    cb.record_failure();
    let first_opened = cb.stats().opened_at.unwrap();

    tokio::time::advance(Duration::from_millis(20)).await;
    assert!(cb.try_acquire().is_ok());

    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Open);
    assert!(cb.stats().opened_at.unwrap() > first_opened);
    assert!(cb.try_acquire().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_half_open_rejects_late_calls_without_reopening() {
    let cb = CircuitBreaker::with_config("test", config(1, 1_000, 100));

    cb.record_failure();
    tokio::time::advance(Duration::from_millis(1_001)).await;
    assert!(cb.try_acquire().is_ok());
    assert_eq!(cb.state(), CircuitState::HalfOpen);

    // Trial calls inside the window proceed
    tokio::time::advance(Duration::from_millis(50)).await;
    assert!(cb.try_acquire().is_ok());

    // Past the window: rejected, but the state is left to the trials
    tokio::time::advance(Duration::from_millis(100)).await;
    let err = cb.try_acquire().unwrap_err();
    assert!(err.is_circuit_open());
    assert_eq!(cb.state(), CircuitState::HalfOpen);
}

#[tokio::test(start_paused = true)]
async fn test_slow_trial_success_closes_after_window() {
    let cb = CircuitBreaker::with_config("test", config(1, 1_000, 50));

    cb.record_failure();
    tokio::time::advance(Duration::from_millis(1_001)).await;
    assert!(cb.try_acquire().is_ok());

    tokio::time::advance(Duration::from_millis(100)).await;
    assert!(cb.try_acquire().is_err());

    cb.record_success();
    assert_eq!(cb.state(), CircuitState::Closed);
    assert_eq!(cb.consecutive_failures(), 0);
    assert!(cb.try_acquire().is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_half_open_starts_new_window() {
    let cb = CircuitBreaker::with_config("test", config(1, 1_000, 50));

    cb.record_failure();
    tokio::time::advance(Duration::from_millis(1_001)).await;
    assert!(cb.try_acquire().is_ok());

    // The trial never reports back
    tokio::time::advance(Duration::from_millis(500)).await;
    assert!(cb.try_acquire().is_err());

    tokio::time::advance(Duration::from_millis(600)).await;
    assert!(cb.try_acquire().is_ok());
    assert_eq!(cb.state(), CircuitState::HalfOpen);

    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Open);
}

#[tokio::test]
async fn test_call_success() {
    let cb = CircuitBreaker::new("test");

    let result: GatewayResult<i32> = cb.call(|| async { Ok(42) }).await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(cb.stats().total_calls, 1);
}

#[tokio::test]
async fn test_call_rejected_when_open_without_running_operation() {
    let cb = CircuitBreaker::with_config("test", config(1, 60_000, 500));
    cb.record_failure();

    let ran = AtomicU32::new(0);
    let result: GatewayResult<i32> = cb
        .call(|| async {
            ran.fetch_add(1, Ordering::SeqCst);
            Ok(42)
        })
        .await;

    assert!(matches!(result, Err(GatewayError::CircuitOpen { .. })));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_call_propagates_original_error() {
    let cb = CircuitBreaker::new("test");

    let result: GatewayResult<()> = cb
        .call(|| async { Err(GatewayError::transport("upstream exploded")) })
        .await;

    assert_eq!(result.unwrap_err().to_string(), "upstream exploded");
    assert_eq!(cb.consecutive_failures(), 1);
}

#[tokio::test]
async fn test_concurrent_failures_open_once() {
    let cb = Arc::new(CircuitBreaker::with_config("test", config(5, 60_000, 500)));

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let cb = cb.clone();
            tokio::spawn(async move { cb.record_failure() })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let stats = cb.stats();
    assert_eq!(stats.state, CircuitState::Open);
    assert_eq!(stats.total_failures, 20);
    assert_eq!(stats.consecutive_failures, 20);
}

#[tokio::test]
async fn test_reconfigure_keeps_state() {
    let cb = CircuitBreaker::with_config("test", config(3, 1_000, 500));
    cb.record_failure();

    cb.reconfigure(config(2, 1_000, 500));
    cb.record_failure();
    assert_eq!(cb.state(), CircuitState::Open);
}

#[tokio::test]
async fn test_stats() {
    let cb = CircuitBreaker::new("test");

    cb.record_success();
    cb.record_success();
    cb.record_failure();

    let stats = cb.stats();
    assert_eq!(stats.total_calls, 3);
    assert_eq!(stats.total_failures, 1);
    assert!((stats.failure_rate() - 33.33).abs() < 0.1);
}

#[tokio::test]
async fn test_manual_trip_and_reset() {
    let cb = CircuitBreaker::new("test");
    cb.trip();
    assert_eq!(cb.state(), CircuitState::Open);
    cb.reset();
    assert_eq!(cb.state(), CircuitState::Closed);
}
