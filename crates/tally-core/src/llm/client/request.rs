//! Request assembly from configuration, conversation and overrides

use crate::config::ClientConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::llm::messages::{
    ChatMessage, ChatOverrides, ChatRequest, MessageRole, WireMessage, WireTool, WireToolChoice,
};

/// Assemble the wire request for one logical call.
///
/// System messages are moved out of the conversation into `system`,
/// joined by blank lines, with the override's `system_prompt` first.
/// Fails with [`GatewayError::InvalidInput`] when nothing but system
/// messages remain.
pub fn build_request(
    config: &ClientConfig,
    messages: &[ChatMessage],
    overrides: Option<&ChatOverrides>,
) -> GatewayResult<ChatRequest> {
    let empty = ChatOverrides::default();
    let overrides = overrides.unwrap_or(&empty);

    let mut system_parts: Vec<&str> = Vec::new();
    if let Some(prompt) = overrides.system_prompt.as_deref() {
        if !prompt.trim().is_empty() {
            system_parts.push(prompt);
        }
    }

    let mut wire_messages = Vec::with_capacity(messages.len());
    for message in messages {
        match message.role {
            MessageRole::System => system_parts.push(&message.content),
            MessageRole::User | MessageRole::Assistant => wire_messages.push(WireMessage {
                role: message.role,
                content: message.content.clone(),
            }),
        }
    }

    if wire_messages.is_empty() {
        return Err(GatewayError::invalid_input(
            "conversation has no user or assistant messages",
        ));
    }

    let temperature = overrides.temperature.unwrap_or(config.temperature);
    if !(0.0..=2.0).contains(&temperature) {
        return Err(GatewayError::invalid_input(format!(
            "temperature must be between 0 and 2, got {}",
            temperature
        )));
    }

    let max_tokens = overrides.max_tokens.unwrap_or(config.max_tokens);
    if max_tokens == 0 {
        return Err(GatewayError::invalid_input("max_tokens must be greater than 0"));
    }

    let tools = overrides
        .functions
        .as_ref()
        .filter(|functions| !functions.is_empty())
        .map(|functions| functions.iter().map(WireTool::from).collect::<Vec<_>>());

    let tool_choice = overrides
        .tool_choice
        .as_ref()
        .map(|choice| WireToolChoice::Tool {
            name: choice.name.clone(),
        });

    Ok(ChatRequest {
        model: overrides
            .model
            .clone()
            .unwrap_or_else(|| config.model.clone()),
        messages: wire_messages,
        max_tokens,
        temperature,
        top_p: config.top_p,
        top_k: config.top_k,
        system: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
        tools,
        tool_choice,
    })
}
