//! Chat message types and the wire shapes exchanged with the endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions; lifted into the request's `system` field
    System,
    /// Human input
    User,
    /// Model output from an earlier turn
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a new system message
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a new user message
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Declaration of a function the model may call instead of answering in text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments
    pub parameters: Value,
}

impl FunctionSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Forces the model to call the named function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolChoice {
    pub name: String,
}

impl ToolChoice {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Per-call adjustments layered over the gateway configuration.
///
/// Every field is optional; `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOverrides {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Prepended to any system messages found in the conversation
    pub system_prompt: Option<String>,
    pub functions: Option<Vec<FunctionSpec>>,
    pub tool_choice: Option<ToolChoice>,
}

impl ChatOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_functions(mut self, functions: Vec<FunctionSpec>) -> Self {
        self.functions = Some(functions);
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }
}

/// A non-system message as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Tool declaration as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl From<&FunctionSpec> for WireTool {
    fn from(spec: &FunctionSpec) -> Self {
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            input_schema: spec.parameters.clone(),
        }
    }
}

/// Tool choice as it appears on the wire: `{"type":"tool","name":..}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireToolChoice {
    Tool { name: String },
}

/// Request body sent to the chat-completion endpoint.
///
/// Optional members are omitted entirely when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<WireTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<WireToolChoice>,
}

/// One segment of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseBlock {
    /// Free text
    Text { text: String },
    /// Structured tool invocation with a JSON payload
    ToolUse {
        #[serde(default)]
        id: String,
        name: String,
        input: Value,
    },
    /// Any block kind this client does not use
    #[serde(other)]
    Other,
}

impl ResponseBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_use(name: impl Into<String>, input: Value) -> Self {
        Self::ToolUse {
            id: String::new(),
            name: name.into(),
            input,
        }
    }
}

/// Response body from the chat-completion endpoint.
///
/// Only the content blocks are read; other members are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub content: Vec<ResponseBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

impl ChatResponse {
    pub fn new(content: Vec<ResponseBlock>) -> Self {
        Self {
            content,
            stop_reason: None,
        }
    }

    /// A response holding one text block
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![ResponseBlock::text(text)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_unset_optionals() {
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![WireMessage {
                role: MessageRole::User,
                content: "hi".to_string(),
            }],
            max_tokens: 10,
            temperature: 0.5,
            top_p: None,
            top_k: None,
            system: None,
            tools: None,
            tool_choice: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn test_tool_choice_wire_shape() {
        let choice = WireToolChoice::Tool {
            name: "categorize".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&choice).unwrap(),
            json!({"type": "tool", "name": "categorize"})
        );
    }

    #[test]
    fn test_response_blocks_deserialize() {
        let body = json!({
            "id": "msg_1",
            "type": "message",
            "content": [
                {"type": "text", "text": "hello"},
                {"type": "tool_use", "id": "tu_1", "name": "categorize", "input": {"a": 1}},
                {"type": "thinking", "thinking": "..."}
            ],
            "stop_reason": "end_turn"
        });

        let response: ChatResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.content.len(), 3);
        assert_eq!(response.content[0], ResponseBlock::text("hello"));
        assert!(matches!(response.content[1], ResponseBlock::ToolUse { ref name, .. } if name == "categorize"));
        assert_eq!(response.content[2], ResponseBlock::Other);
    }
}
