//! HTTP transport for the Anthropic messages endpoint

use super::sanitize::{error_message, sanitize_error_body};
use super::{ChatTransport, TransportFactory};
use crate::config::ClientConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::llm::messages::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, instrument};

const MESSAGES_PATH: &str = "/v1/messages";

/// Sends chat requests to `{base_url}/v1/messages`
pub struct AnthropicTransport {
    http_client: Client,
    url: String,
    api_key: Option<String>,
    api_version: String,
}

impl AnthropicTransport {
    /// Build a transport from the transport-identity fields of `config`
    pub fn new(config: &ClientConfig) -> GatewayResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url: format!("{}{}", config.base_url.trim_end_matches('/'), MESSAGES_PATH),
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn status_error(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = error_message(&body).unwrap_or_else(|| sanitize_error_body(&body));
        GatewayError::transport_status(
            format!("Anthropic API error (status {}): {}", status, detail),
            status.as_u16(),
        )
    }
}

#[async_trait]
impl ChatTransport for AnthropicTransport {
    #[instrument(skip(self, request), fields(model = %request.model), level = "debug")]
    async fn send(&self, request: &ChatRequest) -> GatewayResult<ChatResponse> {
        let mut builder = self
            .http_client
            .post(&self.url)
            .header("anthropic-version", &self.api_version)
            .json(request);

        if let Some(api_key) = &self.api_key {
            builder = builder.header("x-api-key", api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::transport(format!("Anthropic request timed out: {}", e))
            } else {
                GatewayError::transport(format!("Anthropic request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::transport(format!("Failed to read Anthropic response: {}", e)))?;

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            GatewayError::response_format(format!("Failed to parse Anthropic response: {}", e))
        })?;

        debug!(blocks = parsed.content.len(), "Anthropic response received");
        Ok(parsed)
    }
}

impl std::fmt::Debug for AnthropicTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicTransport")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Default factory: one [`AnthropicTransport`] per transport identity
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransportFactory;

impl TransportFactory for HttpTransportFactory {
    fn build(&self, config: &ClientConfig) -> GatewayResult<Arc<dyn ChatTransport>> {
        if config.api_key.is_none() {
            return Err(GatewayError::config_field(
                "API key is not configured",
                "api_key",
            ));
        }
        debug!(base_url = %config.base_url, "Building HTTP transport");
        Ok(Arc::new(AnthropicTransport::new(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::messages::{MessageRole, ResponseBlock, WireMessage};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ChatRequest {
        ChatRequest {
            model: "claude-test".to_string(),
            messages: vec![WireMessage {
                role: MessageRole::User,
                content: "Hello".to_string(),
            }],
            max_tokens: 64,
            temperature: 0.2,
            top_p: None,
            top_k: None,
            system: Some("Be brief".to_string()),
            tools: None,
            tool_choice: None,
        }
    }

    fn transport_for(server: &MockServer) -> AnthropicTransport {
        let config = ClientConfig::new("test-api-key").with_base_url(server.uri());
        AnthropicTransport::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_send_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-api-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "claude-test",
                "max_tokens": 64,
                "system": "Be brief",
                "messages": [{"role": "user", "content": "Hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "content": [{"type": "text", "text": "Hi there"}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 5, "output_tokens": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = transport_for(&server).send(&request()).await.unwrap();
        assert_eq!(response.content, vec![ResponseBlock::text("Hi there")]);
        assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
    }

    #[tokio::test]
    async fn test_server_error_is_retryable_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_json(json!({
                "type": "error",
                "error": {"type": "overloaded_error", "message": "Overloaded"}
            })))
            .mount(&server)
            .await;

        let err = transport_for(&server).send(&request()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(529));
        assert!(err.is_retryable());
        assert!(err.to_string().contains("Overloaded"));
    }

    #[tokio::test]
    async fn test_client_error_is_permanent_and_sanitized() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string("invalid x-api-key: test-api-key-123"),
            )
            .mount(&server)
            .await;

        let err = transport_for(&server).send(&request()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));
        assert!(!err.is_retryable());
        assert!(!err.to_string().contains("test-api-key-123"));
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_format_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = transport_for(&server).send(&request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::ResponseFormat { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_connection_failure_is_retryable() {
        let config = ClientConfig::new("k").with_base_url("http://127.0.0.1:1");
        let transport = AnthropicTransport::new(&config).unwrap();

        let err = transport.send(&request()).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status_code(), None);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ClientConfig::new("k").with_base_url("https://proxy.example.com/");
        let transport = AnthropicTransport::new(&config).unwrap();
        assert_eq!(transport.url(), "https://proxy.example.com/v1/messages");
    }

    #[test]
    fn test_factory_requires_api_key() {
        let result = HttpTransportFactory.build(&ClientConfig::default());
        assert!(matches!(result, Err(GatewayError::Config { .. })));
    }

    #[test]
    fn test_debug_redacts_key() {
        let transport = AnthropicTransport::new(&ClientConfig::new("sk-ant-secret")).unwrap();
        assert!(!format!("{:?}", transport).contains("sk-ant-secret"));
    }
}
