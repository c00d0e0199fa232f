//! Gateway accessor methods

use super::types::LlmGateway;
use crate::recovery::circuit_breaker::{CircuitBreakerStats, CircuitState};

impl LlmGateway {
    /// Get the model name configured for this gateway
    pub fn model(&self) -> String {
        self.config.read().model.clone()
    }

    /// Get the circuit breaker state
    pub fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state()
    }

    /// Get circuit breaker statistics
    pub fn circuit_breaker_stats(&self) -> CircuitBreakerStats {
        self.circuit_breaker.stats()
    }

    /// Reset the circuit breaker to closed
    pub fn reset_circuit_breaker(&self) {
        self.circuit_breaker.reset();
    }

    /// Rate-limiter tokens currently available
    pub async fn available_tokens(&self) -> u32 {
        self.rate_limiter.available_tokens().await
    }

    /// Whether a transport has been built and is cached
    pub fn has_transport(&self) -> bool {
        self.transport.lock().is_some()
    }
}
