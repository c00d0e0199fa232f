//! Chat request handling

use super::request::build_request;
use super::types::LlmGateway;
use crate::config::ClientConfig;
use crate::error::GatewayResult;
use crate::llm::messages::{ChatMessage, ChatOverrides, ChatRequest, ChatResponse};
use crate::llm::normalizer::normalize;
use crate::llm::transport::ChatTransport;
use crate::recovery::retry::RetryPolicy;
use std::sync::Arc;
use tracing::{debug, instrument};

impl LlmGateway {
    /// Send one conversation and return the canonical response text.
    ///
    /// The call is rejected up front while the circuit breaker is open.
    /// Otherwise each physical attempt waits for a rate-limiter token, and
    /// transient transport failures are retried up to `max_retries`
    /// attempts in total. A retry-exhausted call counts as one breaker
    /// failure.
    ///
    /// # Errors
    ///
    /// - `CircuitOpen` while the breaker is open
    /// - `Transport` with the last attempt's original message once retries run out
    /// - `ResponseFormat` when the response holds neither text nor a tool call
    /// - `InvalidInput` for an empty conversation
    #[instrument(skip(self, messages, overrides), fields(messages = messages.len()))]
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        overrides: Option<&ChatOverrides>,
    ) -> GatewayResult<String> {
        let config = self.config_snapshot();
        let request = build_request(&config, messages, overrides)?;
        let transport = self.transport()?;

        let response = self
            .circuit_breaker
            .call(|| self.send_with_retry(&config, transport.as_ref(), &request))
            .await?;

        normalize(&response)
    }

    /// The retry loop around the transport; the breaker sees only its outcome
    async fn send_with_retry(
        &self,
        config: &ClientConfig,
        transport: &dyn ChatTransport,
        request: &ChatRequest,
    ) -> GatewayResult<ChatResponse> {
        let policy = RetryPolicy::from_config(config);

        policy
            .execute(|attempt| async move {
                let waited = self.rate_limiter.acquire().await;
                if !waited.is_zero() {
                    debug!(
                        attempt = attempt + 1,
                        waited_ms = waited.as_millis() as u64,
                        "Rate limited before attempt"
                    );
                }
                transport.send(request).await
            })
            .await
    }

    pub(super) fn config_snapshot(&self) -> ClientConfig {
        self.config.read().clone()
    }

    /// Current transport, building one from the live config if needed
    pub(super) fn transport(&self) -> GatewayResult<Arc<dyn ChatTransport>> {
        let mut slot = self.transport.lock();
        if let Some(transport) = slot.as_ref() {
            return Ok(transport.clone());
        }

        let config = self.config.read().clone();
        let transport = self.factory.build(&config)?;
        debug!(base_url = %config.base_url, "Transport built");
        *slot = Some(transport.clone());
        Ok(transport)
    }
}
