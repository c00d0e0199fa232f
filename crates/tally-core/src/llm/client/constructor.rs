//! Gateway construction

use super::types::LlmGateway;
use crate::config::ClientConfig;
use crate::error::GatewayResult;
use crate::llm::transport::{ChatTransport, HttpTransportFactory, SharedTransport, TransportFactory};
use crate::recovery::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::recovery::rate_limiter::{RateLimiter, RateLimiterConfig};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::debug;

const BREAKER_NAME: &str = "llm_anthropic";

impl LlmGateway {
    /// Create a gateway that talks HTTP to the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`](crate::error::GatewayError::Config)
    /// if the configuration is invalid.
    /// The HTTP client itself is built lazily before the first call.
    pub fn new(config: ClientConfig) -> GatewayResult<Self> {
        Self::with_factory(config, Arc::new(HttpTransportFactory))
    }

    /// Create a gateway that sends every request through `transport`
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn ChatTransport>,
    ) -> GatewayResult<Self> {
        Self::with_factory(config, Arc::new(SharedTransport::new(transport)))
    }

    /// Create a gateway whose transports come from `factory`
    pub fn with_factory(
        config: ClientConfig,
        factory: Arc<dyn TransportFactory>,
    ) -> GatewayResult<Self> {
        config.validate()?;

        let circuit_breaker = Arc::new(CircuitBreaker::with_config(
            BREAKER_NAME,
            CircuitBreakerConfig::from(&config.circuit_breaker),
        ));
        let rate_limiter = Arc::new(RateLimiter::with_config(RateLimiterConfig::from(
            &config.rate_limit,
        )));

        debug!(
            model = %config.model,
            base_url = %config.base_url,
            max_retries = config.max_retries,
            "Created LLM gateway"
        );

        Ok(Self {
            config: RwLock::new(config),
            factory,
            transport: Mutex::new(None),
            circuit_breaker,
            rate_limiter,
        })
    }
}
