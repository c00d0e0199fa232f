//! LLM gateway: message types, transports, normalization and the client

pub mod client;
pub mod messages;
pub mod normalizer;
pub mod transport;

pub use client::LlmGateway;
pub use messages::{
    ChatMessage, ChatOverrides, ChatRequest, ChatResponse, FunctionSpec, MessageRole,
    ResponseBlock, ToolChoice,
};
pub use normalizer::normalize;
pub use transport::{
    AnthropicTransport, ChatTransport, HttpTransportFactory, SharedTransport, TransportFactory,
};
