//! Transport seam between the gateway and the remote endpoint
//!
//! The gateway never builds a network client on its own; it asks a
//! [`TransportFactory`] for a [`ChatTransport`] and can be handed a fake one.

mod anthropic;
pub mod sanitize;

pub use anthropic::{AnthropicTransport, HttpTransportFactory};

use crate::config::ClientConfig;
use crate::error::GatewayResult;
use crate::llm::messages::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// One physical request/response exchange with the chat endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a fully assembled request
    async fn send(&self, request: &ChatRequest) -> GatewayResult<ChatResponse>;
}

/// Builds a transport for the transport-identity fields of a config
/// (endpoint, key, protocol version and timeout).
pub trait TransportFactory: Send + Sync {
    fn build(&self, config: &ClientConfig) -> GatewayResult<Arc<dyn ChatTransport>>;
}

/// Factory handing out one injected transport regardless of config
#[derive(Clone)]
pub struct SharedTransport {
    transport: Arc<dyn ChatTransport>,
}

impl SharedTransport {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }
}

impl TransportFactory for SharedTransport {
    fn build(&self, _config: &ClientConfig) -> GatewayResult<Arc<dyn ChatTransport>> {
        Ok(self.transport.clone())
    }
}

impl std::fmt::Debug for SharedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTransport").finish_non_exhaustive()
    }
}
