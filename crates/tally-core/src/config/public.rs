//! Caller-facing view of the effective configuration

use super::client_config::{CircuitBreakerSettings, ClientConfig, RateLimitSettings};
use serde::Serialize;

/// Effective configuration with the secret key stripped.
///
/// This is what `get_config` hands out; it has no field that can hold the
/// API key, only whether one is configured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicConfig {
    pub has_api_key: bool,
    pub base_url: String,
    pub api_version: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retry_delay_ms: Option<u64>,
    pub batch_size: usize,
    pub max_concurrent: usize,
    pub request_timeout_ms: u64,
    pub rate_limit: RateLimitSettings,
    pub circuit_breaker: CircuitBreakerSettings,
}

impl From<&ClientConfig> for PublicConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            has_api_key: config.api_key.is_some(),
            base_url: config.base_url.clone(),
            api_version: config.api_version.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
            max_retry_delay_ms: config.max_retry_delay_ms,
            batch_size: config.batch_size,
            max_concurrent: config.max_concurrent,
            request_timeout_ms: config.request_timeout_ms,
            rate_limit: config.rate_limit,
            circuit_breaker: config.circuit_breaker,
        }
    }
}
