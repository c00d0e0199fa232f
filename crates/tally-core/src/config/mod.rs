//! Gateway configuration
//!
//! - [`ClientConfig`]: the effective configuration owned by one gateway
//! - [`ClientConfigPatch`]: partial overrides and [`build_effective_config`]
//! - [`PublicConfig`]: the redacted view returned to callers
//! - [`ConfigLoader`]: defaults < file < environment < explicit overrides

mod client_config;
pub mod defaults;
mod loader;
mod patch;
mod public;

pub use client_config::{CircuitBreakerSettings, ClientConfig, RateLimitSettings};
pub use loader::{ConfigLoader, default_config_path, load_patch_from_env, load_patch_from_file};
pub use patch::{
    CircuitBreakerPatch, ClientConfigPatch, ConfigChange, RateLimitPatch, build_effective_config,
};
pub use public::PublicConfig;
