//! Gateway type definitions

use crate::config::ClientConfig;
use crate::llm::transport::{ChatTransport, TransportFactory};
use crate::recovery::circuit_breaker::CircuitBreaker;
use crate::recovery::rate_limiter::RateLimiter;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Gateway to a chat-completion endpoint.
///
/// Each gateway owns its configuration, circuit breaker and rate limiter;
/// nothing is shared between instances. A gateway is safe to use from many
/// tasks at once.
///
/// # Examples
///
/// ```no_run
/// use tally_core::config::ClientConfig;
/// use tally_core::llm::{ChatMessage, LlmGateway};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let gateway = LlmGateway::new(ClientConfig::new("sk-ant-..."))?;
///
/// let messages = vec![
///     ChatMessage::system("You categorize bank transactions."),
///     ChatMessage::user("STARBUCKS #1234 SEATTLE"),
/// ];
/// let category = gateway.chat(&messages, None).await?;
/// println!("{}", category);
/// # Ok(())
/// # }
/// ```
pub struct LlmGateway {
    pub(super) config: RwLock<ClientConfig>,
    pub(super) factory: Arc<dyn TransportFactory>,
    /// Built on first use; cleared when the transport identity changes
    pub(super) transport: Mutex<Option<Arc<dyn ChatTransport>>>,
    pub(super) circuit_breaker: Arc<CircuitBreaker>,
    pub(super) rate_limiter: Arc<RateLimiter>,
}

impl std::fmt::Debug for LlmGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmGateway")
            .field("config", &*self.config.read())
            .field("transport_ready", &self.transport.lock().is_some())
            .field("circuit_breaker", &self.circuit_breaker)
            .finish()
    }
}
