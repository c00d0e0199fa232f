//! Configuration commands

use anyhow::Result;
use tally_core::{ClientConfig, PublicConfig};

/// Print the effective configuration; the API key is reduced to `has_api_key`
pub fn show(config: &ClientConfig) -> Result<()> {
    println!("{}", render(config)?);
    Ok(())
}

fn render(config: &ClientConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(&PublicConfig::from(config))?)
}
