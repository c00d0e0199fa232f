//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction, ModelArgs};
use crate::commands;
use anyhow::{Context, Result};
use tally_core::{ChatOverrides, ClientConfig, ClientConfigPatch, ConfigLoader};

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Chat {
            prompt,
            system,
            model,
        } => {
            let config = load_config(cli.config.as_deref(), &model)?;
            commands::chat::run(config, &prompt, overrides(system)).await
        }
        Commands::Batch {
            file,
            system,
            model,
        } => {
            let config = load_config(cli.config.as_deref(), &model)?;
            commands::batch::run(config, &file, overrides(system)).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = load_config(cli.config.as_deref(), &ModelArgs::default())?;
                commands::config::show(&config)
            }
        },
    }
}

/// Resolve defaults < config file < environment < command-line flags
fn load_config(path: Option<&str>, model: &ModelArgs) -> Result<ClientConfig> {
    let mut loader = ConfigLoader::new().with_overrides(model_patch(model));
    if let Some(path) = path {
        let expanded = shellexpand::tilde(path).into_owned();
        loader = loader.with_file(expanded);
    }

    let config = loader.load().context("Failed to load configuration")?;
    tracing::debug!(model = %config.model, base_url = %config.base_url, "Configuration loaded");
    Ok(config)
}

fn model_patch(model: &ModelArgs) -> ClientConfigPatch {
    ClientConfigPatch {
        model: model.model.clone(),
        temperature: model.temperature,
        max_tokens: model.max_tokens,
        ..Default::default()
    }
}

fn overrides(system: Option<String>) -> ChatOverrides {
    ChatOverrides {
        system_prompt: system,
        ..Default::default()
    }
}
