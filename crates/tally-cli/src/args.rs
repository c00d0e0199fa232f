//! CLI argument definitions using clap
//!
//! - tally chat "prompt"        # One conversation
//! - tally batch prompts.txt    # One prompt per line, answers in order
//! - tally config show          # Effective config, key redacted

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Tally - categorize transactions through a resilient LLM gateway")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML or JSON config file (default: ~/.config/tally/config.toml)
    #[arg(long, global = true, env = "TALLY_CONFIG")]
    pub config: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a single prompt and print the answer
    Chat {
        /// Prompt text
        prompt: String,

        /// System prompt prepended to the conversation
        #[arg(long)]
        system: Option<String>,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Send every non-empty line of a file as its own prompt
    Batch {
        /// File with one prompt per line
        file: PathBuf,

        /// System prompt used for every line
        #[arg(long)]
        system: Option<String>,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Per-call model settings shared by `chat` and `batch`
#[derive(clap::Args, Clone, Debug, Default)]
pub struct ModelArgs {
    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature (0.0 to 2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration as JSON (API key never shown)
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chat_with_overrides() {
        let cli = Cli::parse_from([
            "tally",
            "chat",
            "hello",
            "--system",
            "be brief",
            "--temperature",
            "0.2",
            "--max-tokens",
            "50",
        ]);

        match cli.command {
            Commands::Chat {
                prompt,
                system,
                model,
            } => {
                assert_eq!(prompt, "hello");
                assert_eq!(system.as_deref(), Some("be brief"));
                assert_eq!(model.temperature, Some(0.2));
                assert_eq!(model.max_tokens, Some(50));
                assert!(model.model.is_none());
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tally", "config", "show", "--json-logs", "--config", "x.toml"]);
        assert!(cli.json_logs);
        assert_eq!(cli.config.as_deref(), Some("x.toml"));
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Show
            }
        ));
    }
}
