//! Layered configuration loading
//!
//! Layers, lowest priority first: built-in defaults, config file,
//! environment variables, explicit overrides. Each layer is a
//! [`ClientConfigPatch`] folded through [`build_effective_config`].

use super::client_config::ClientConfig;
use super::defaults::{ENV_API_KEY, ENV_BASE_URL, ENV_MODEL};
use super::patch::{ClientConfigPatch, build_effective_config};
use crate::error::{GatewayError, GatewayResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default config file location (`<config dir>/tally/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tally").join("config.toml"))
}

/// Read a partial configuration from a TOML or JSON file.
pub fn load_patch_from_file(path: &Path) -> GatewayResult<ClientConfigPatch> {
    let content = fs::read_to_string(path).map_err(|e| {
        GatewayError::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| {
            GatewayError::config(format!(
                "Failed to parse JSON config '{}': {}",
                path.display(),
                e
            ))
        }),
        _ => toml::from_str(&content).map_err(|e| {
            GatewayError::config(format!(
                "Failed to parse TOML config '{}': {}",
                path.display(),
                e
            ))
        }),
    }
}

/// Build a partial configuration from environment variables.
///
/// `lookup` abstracts the environment so tests need not mutate process state.
/// Blank values count as unset.
pub fn load_patch_from_env<F>(lookup: F) -> ClientConfigPatch
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    ClientConfigPatch {
        api_key: ENV_API_KEY.iter().find_map(|name| read(*name)),
        base_url: read(ENV_BASE_URL),
        model: read(ENV_MODEL),
        ..Default::default()
    }
}

/// Builder for the layered configuration
#[derive(Debug)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    use_default_file: bool,
    use_env: bool,
    overrides: ClientConfigPatch,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            use_default_file: true,
            use_env: true,
            overrides: ClientConfigPatch::default(),
        }
    }

    /// Use an explicit config file; it must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Skip the default config file location
    pub fn without_default_file(mut self) -> Self {
        self.use_default_file = false;
        self
    }

    /// Skip environment variables
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Apply explicit overrides on top of every other layer
    pub fn with_overrides(mut self, overrides: ClientConfigPatch) -> Self {
        self.overrides = overrides;
        self
    }

    /// Resolve and validate the effective configuration
    pub fn load(self) -> GatewayResult<ClientConfig> {
        self.load_with_env(|name| std::env::var(name).ok())
    }

    /// Same as [`ConfigLoader::load`] with an explicit environment lookup
    pub fn load_with_env<F>(self, lookup: F) -> GatewayResult<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut layered = ClientConfigPatch::default();

        match &self.file {
            Some(path) => {
                if !path.exists() {
                    return Err(GatewayError::config(format!(
                        "Config file '{}' does not exist",
                        path.display()
                    )));
                }
                debug!(path = %path.display(), "loading config file");
                layered = layered.merge(load_patch_from_file(path)?);
            }
            None if self.use_default_file => {
                if let Some(path) = default_config_path().filter(|p| p.exists()) {
                    debug!(path = %path.display(), "loading default config file");
                    layered = layered.merge(load_patch_from_file(&path)?);
                }
            }
            None => {}
        }

        if self.use_env {
            layered = layered.merge(load_patch_from_env(lookup));
        }

        layered = layered.merge(self.overrides);

        let config = build_effective_config(&ClientConfig::default(), &layered);
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
