//! Single-prompt chat command

use anyhow::Result;
use tally_core::{ChatMessage, ChatOverrides, ClientConfig, LlmGateway};

/// Send one prompt and print the canonical answer
pub async fn run(config: ClientConfig, prompt: &str, overrides: ChatOverrides) -> Result<()> {
    let gateway = LlmGateway::new(config)?;
    let answer = gateway
        .chat(&[ChatMessage::user(prompt)], Some(&overrides))
        .await?;

    println!("{}", answer);
    Ok(())
}
