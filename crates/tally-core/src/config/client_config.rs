//! Effective gateway configuration
//!
//! A [`ClientConfig`] lives as long as the gateway that owns it. There is no
//! process-wide instance; every gateway carries its own copy.

use super::defaults::*;
use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Token bucket settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    /// Bucket capacity, refilled once per `refill_interval_ms`
    pub max_tokens_per_minute: u32,
    /// Length of one refill window in milliseconds
    pub refill_interval_ms: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_tokens_per_minute: DEFAULT_MAX_TOKENS_PER_MINUTE,
            refill_interval_ms: DEFAULT_REFILL_INTERVAL_MS,
        }
    }
}

impl RateLimitSettings {
    pub fn refill_interval(&self) -> Duration {
        Duration::from_millis(self.refill_interval_ms)
    }
}

/// Circuit breaker settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerSettings {
    /// Consecutive logical failures before the circuit opens
    pub failure_threshold: u32,
    /// Time the circuit stays open before a trial call is let through
    pub reset_timeout_ms: u64,
    /// Window after entering half-open in which trial calls may proceed
    pub half_open_timeout_ms: u64,
}

impl Default for CircuitBreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            reset_timeout_ms: DEFAULT_RESET_TIMEOUT_MS,
            half_open_timeout_ms: DEFAULT_HALF_OPEN_TIMEOUT_MS,
        }
    }
}

impl CircuitBreakerSettings {
    pub fn reset_timeout(&self) -> Duration {
        Duration::from_millis(self.reset_timeout_ms)
    }

    pub fn half_open_timeout(&self) -> Duration {
        Duration::from_millis(self.half_open_timeout_ms)
    }
}

/// Complete configuration of one gateway client.
///
/// Optional fields stay `None` unless a caller set them, and are skipped
/// during serialization so nothing absent leaks into a request or a dump.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Secret key for the chat-completion endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Endpoint base URL
    pub base_url: String,
    /// Value of the `anthropic-version` header
    pub api_version: String,
    /// Model identifier
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Upper bound on physical attempts per logical call
    pub max_retries: u32,
    /// Delay before the first retry, and the floor for later ones
    pub retry_delay_ms: u64,
    /// Cap for growing retry delays; absent means a constant delay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retry_delay_ms: Option<u64>,
    /// Requests per chunk in `chat_batch`
    pub batch_size: usize,
    /// Global cap on in-flight requests in `chat_batch`
    pub max_concurrent: usize,
    /// Per-request timeout enforced by the HTTP transport
    pub request_timeout_ms: u64,
    pub rate_limit: RateLimitSettings,
    pub circuit_breaker: CircuitBreakerSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: None,
            top_k: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            max_retry_delay_ms: None,
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            rate_limit: RateLimitSettings::default(),
            circuit_breaker: CircuitBreakerSettings::default(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("max_retry_delay_ms", &self.max_retry_delay_ms)
            .field("batch_size", &self.batch_size)
            .field("max_concurrent", &self.max_concurrent)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("rate_limit", &self.rate_limit)
            .field("circuit_breaker", &self.circuit_breaker)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config with the given API key and defaults elsewhere
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay_ms(mut self, delay_ms: u64) -> Self {
        self.retry_delay_ms = delay_ms;
        self
    }

    pub fn with_batching(mut self, batch_size: usize, max_concurrent: usize) -> Self {
        self.batch_size = batch_size;
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitSettings) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_circuit_breaker(mut self, circuit_breaker: CircuitBreakerSettings) -> Self {
        self.circuit_breaker = circuit_breaker;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Whether `other` needs a different transport handle than `self`.
    ///
    /// Only the endpoint, credentials, protocol version and request timeout
    /// are baked into a transport; every other field is read per call.
    pub fn transport_identity_differs(&self, other: &ClientConfig) -> bool {
        self.base_url != other.base_url
            || self.api_key != other.api_key
            || self.api_version != other.api_version
            || self.request_timeout_ms != other.request_timeout_ms
    }

    /// Validate the configuration
    pub fn validate(&self) -> GatewayResult<()> {
        if self.model.trim().is_empty() {
            return Err(GatewayError::config_field("Model must not be empty", "model"));
        }

        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            GatewayError::config_field(
                format!("Invalid base URL '{}': {}", self.base_url, e),
                "base_url",
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GatewayError::config_field(
                format!("Base URL must use http or https, got '{}'", url.scheme()),
                "base_url",
            ));
        }

        if let Some(key) = &self.api_key {
            if key.trim().is_empty() {
                return Err(GatewayError::config_field(
                    "API key must not be blank",
                    "api_key",
                ));
            }
        }

        if self.max_tokens == 0 {
            return Err(GatewayError::config_field(
                "max_tokens must be greater than 0",
                "max_tokens",
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(GatewayError::config_field(
                format!("temperature must be between 0 and 2, got {}", self.temperature),
                "temperature",
            ));
        }

        if let Some(top_p) = self.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(GatewayError::config_field(
                    format!("top_p must be between 0 and 1, got {}", top_p),
                    "top_p",
                ));
            }
        }

        if let Some(max_delay) = self.max_retry_delay_ms {
            if max_delay < self.retry_delay_ms {
                return Err(GatewayError::config_field(
                    format!(
                        "max_retry_delay_ms ({}) must not be below retry_delay_ms ({})",
                        max_delay, self.retry_delay_ms
                    ),
                    "max_retry_delay_ms",
                ));
            }
        }

        if self.batch_size == 0 {
            return Err(GatewayError::config_field(
                "batch_size must be greater than 0",
                "batch_size",
            ));
        }
        if self.max_concurrent == 0 {
            return Err(GatewayError::config_field(
                "max_concurrent must be greater than 0",
                "max_concurrent",
            ));
        }
        if self.rate_limit.max_tokens_per_minute == 0 {
            return Err(GatewayError::config_field(
                "rate_limit.max_tokens_per_minute must be greater than 0",
                "rate_limit.max_tokens_per_minute",
            ));
        }
        if self.rate_limit.refill_interval_ms == 0 {
            return Err(GatewayError::config_field(
                "rate_limit.refill_interval_ms must be greater than 0",
                "rate_limit.refill_interval_ms",
            ));
        }
        if self.circuit_breaker.failure_threshold == 0 {
            return Err(GatewayError::config_field(
                "circuit_breaker.failure_threshold must be greater than 0",
                "circuit_breaker.failure_threshold",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_malformed_base_url_rejected() {
        let config = ClientConfig::new("key").with_base_url("not a url");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, GatewayError::Config { field: Some(ref f), .. } if f == "base_url"));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let config = ClientConfig::new("key").with_base_url("ftp://example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_delay_cap_below_floor_rejected() {
        let mut config = ClientConfig::new("key").with_retry_delay_ms(500);
        config.max_retry_delay_ms = Some(100);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = ClientConfig::new("key").with_batching(2, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("sk-very-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_absent_optionals_not_serialized() {
        let json = serde_json::to_value(ClientConfig::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("top_p"));
        assert!(!obj.contains_key("top_k"));
        assert!(!obj.contains_key("max_retry_delay_ms"));
        assert!(!obj.contains_key("api_key"));
    }

    #[test]
    fn test_transport_identity() {
        let base = ClientConfig::new("a");
        let mut tuned = base.clone();
        tuned.temperature = 0.1;
        tuned.max_tokens = 99;
        assert!(!base.transport_identity_differs(&tuned));

        let rekeyed = ClientConfig::new("b");
        assert!(base.transport_identity_differs(&rekeyed));

        let moved = base.clone().with_base_url("https://proxy.internal");
        assert!(base.transport_identity_differs(&moved));
    }
}
