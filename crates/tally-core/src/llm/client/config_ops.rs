//! Live configuration reads and updates

use super::types::LlmGateway;
use crate::config::{ClientConfigPatch, ConfigChange, PublicConfig, build_effective_config};
use crate::error::GatewayResult;
use crate::recovery::circuit_breaker::CircuitBreakerConfig;
use crate::recovery::rate_limiter::RateLimiterConfig;
use tracing::{debug, info};

impl LlmGateway {
    /// Effective configuration without the API key
    pub fn get_config(&self) -> PublicConfig {
        PublicConfig::from(&*self.config.read())
    }

    /// Merge `patch` into the live configuration.
    ///
    /// The merged result is validated first; on error nothing changes.
    /// Changing the endpoint, key, API version or timeout drops the current
    /// transport so the next call builds a fresh one. Tuning fields apply
    /// to the next call as they are.
    pub async fn update_config(&self, patch: &ClientConfigPatch) -> GatewayResult<()> {
        let change = {
            let mut slot = self.transport.lock();
            let mut config = self.config.write();

            let updated = build_effective_config(&config, patch);
            updated.validate()?;

            let change = ConfigChange::between(&config, &updated);
            if change.transport && slot.take().is_some() {
                debug!("Transport identity changed, transport dropped");
            }
            *config = updated;
            change
        };

        let config = self.config_snapshot();
        if change.rate_limit {
            self.rate_limiter
                .reconfigure(RateLimiterConfig::from(&config.rate_limit))
                .await;
        }
        if change.circuit_breaker {
            self.circuit_breaker
                .reconfigure(CircuitBreakerConfig::from(&config.circuit_breaker));
        }

        info!(
            transport = change.transport,
            rate_limit = change.rate_limit,
            circuit_breaker = change.circuit_breaker,
            "Gateway configuration updated"
        );
        Ok(())
    }
}
