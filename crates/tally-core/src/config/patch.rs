//! Partial configuration and the merge that produces an effective config
//!
//! Every field of a [`ClientConfigPatch`] is optional. `None` always means
//! "not provided" and never overwrites a value in the base configuration.

use super::client_config::{CircuitBreakerSettings, ClientConfig, RateLimitSettings};
use serde::{Deserialize, Serialize};

/// Partial override of [`RateLimitSettings`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens_per_minute: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refill_interval_ms: Option<u64>,
}

/// Partial override of [`CircuitBreakerSettings`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_open_timeout_ms: Option<u64>,
}

/// Partial override of a [`ClientConfig`]
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retry_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_breaker: Option<CircuitBreakerPatch>,
}

impl std::fmt::Debug for ClientConfigPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfigPatch")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("max_retries", &self.max_retries)
            .field("batch_size", &self.batch_size)
            .field("max_concurrent", &self.max_concurrent)
            .field("rate_limit", &self.rate_limit)
            .field("circuit_breaker", &self.circuit_breaker)
            .finish_non_exhaustive()
    }
}

impl ClientConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = Some(max_concurrent);
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitPatch) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn with_circuit_breaker(mut self, circuit_breaker: CircuitBreakerPatch) -> Self {
        self.circuit_breaker = Some(circuit_breaker);
        self
    }

    /// Whether the patch carries no values at all
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Layer `other` on top of `self`; values present in `other` win.
    pub fn merge(mut self, other: ClientConfigPatch) -> Self {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.api_key, other.api_key);
        take(&mut self.base_url, other.base_url);
        take(&mut self.api_version, other.api_version);
        take(&mut self.model, other.model);
        take(&mut self.max_tokens, other.max_tokens);
        take(&mut self.temperature, other.temperature);
        take(&mut self.top_p, other.top_p);
        take(&mut self.top_k, other.top_k);
        take(&mut self.max_retries, other.max_retries);
        take(&mut self.retry_delay_ms, other.retry_delay_ms);
        take(&mut self.max_retry_delay_ms, other.max_retry_delay_ms);
        take(&mut self.batch_size, other.batch_size);
        take(&mut self.max_concurrent, other.max_concurrent);
        take(&mut self.request_timeout_ms, other.request_timeout_ms);

        self.rate_limit = match (self.rate_limit, other.rate_limit) {
            (Some(mut base), Some(top)) => {
                take(&mut base.max_tokens_per_minute, top.max_tokens_per_minute);
                take(&mut base.refill_interval_ms, top.refill_interval_ms);
                Some(base)
            }
            (base, top) => top.or(base),
        };
        self.circuit_breaker = match (self.circuit_breaker, other.circuit_breaker) {
            (Some(mut base), Some(top)) => {
                take(&mut base.failure_threshold, top.failure_threshold);
                take(&mut base.reset_timeout_ms, top.reset_timeout_ms);
                take(&mut base.half_open_timeout_ms, top.half_open_timeout_ms);
                Some(base)
            }
            (base, top) => top.or(base),
        };
        self
    }
}

/// Build the effective configuration from a base and an override.
///
/// Fields present in `patch` replace the base value key by key; nested
/// rate limit and circuit breaker settings merge field by field.
pub fn build_effective_config(base: &ClientConfig, patch: &ClientConfigPatch) -> ClientConfig {
    fn set<T: Clone>(target: &mut T, value: &Option<T>) {
        if let Some(value) = value {
            *target = value.clone();
        }
    }

    let mut merged = base.clone();

    if patch.api_key.is_some() {
        merged.api_key = patch.api_key.clone();
    }
    set(&mut merged.base_url, &patch.base_url);
    set(&mut merged.api_version, &patch.api_version);
    set(&mut merged.model, &patch.model);
    set(&mut merged.max_tokens, &patch.max_tokens);
    set(&mut merged.temperature, &patch.temperature);
    if patch.top_p.is_some() {
        merged.top_p = patch.top_p;
    }
    if patch.top_k.is_some() {
        merged.top_k = patch.top_k;
    }
    set(&mut merged.max_retries, &patch.max_retries);
    set(&mut merged.retry_delay_ms, &patch.retry_delay_ms);
    if patch.max_retry_delay_ms.is_some() {
        merged.max_retry_delay_ms = patch.max_retry_delay_ms;
    }
    set(&mut merged.batch_size, &patch.batch_size);
    set(&mut merged.max_concurrent, &patch.max_concurrent);
    set(&mut merged.request_timeout_ms, &patch.request_timeout_ms);

    if let Some(rate_limit) = &patch.rate_limit {
        merged.rate_limit = apply_rate_limit(merged.rate_limit, rate_limit);
    }
    if let Some(circuit_breaker) = &patch.circuit_breaker {
        merged.circuit_breaker = apply_circuit_breaker(merged.circuit_breaker, circuit_breaker);
    }

    merged
}

fn apply_rate_limit(mut base: RateLimitSettings, patch: &RateLimitPatch) -> RateLimitSettings {
    if let Some(capacity) = patch.max_tokens_per_minute {
        base.max_tokens_per_minute = capacity;
    }
    if let Some(interval) = patch.refill_interval_ms {
        base.refill_interval_ms = interval;
    }
    base
}

fn apply_circuit_breaker(
    mut base: CircuitBreakerSettings,
    patch: &CircuitBreakerPatch,
) -> CircuitBreakerSettings {
    if let Some(threshold) = patch.failure_threshold {
        base.failure_threshold = threshold;
    }
    if let Some(reset) = patch.reset_timeout_ms {
        base.reset_timeout_ms = reset;
    }
    if let Some(half_open) = patch.half_open_timeout_ms {
        base.half_open_timeout_ms = half_open;
    }
    base
}

/// What an applied patch changed, as far as the gateway's collaborators care
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigChange {
    /// Endpoint identity changed; the transport must be rebuilt
    pub transport: bool,
    pub rate_limit: bool,
    pub circuit_breaker: bool,
}

impl ConfigChange {
    pub fn between(old: &ClientConfig, new: &ClientConfig) -> Self {
        Self {
            transport: old.transport_identity_differs(new),
            rate_limit: old.rate_limit != new.rate_limit,
            circuit_breaker: old.circuit_breaker != new.circuit_breaker,
        }
    }
}
