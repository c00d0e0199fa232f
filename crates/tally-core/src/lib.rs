//! Tally Core Library
//!
//! A resilient gateway to a pay-per-call chat-completion API. One
//! [`LlmGateway`] owns a circuit breaker, a token-bucket rate limiter and a
//! retry policy, and turns "send these messages, get text back" into a
//! dependable primitive for the rest of Tally.

pub mod config;
pub mod error;
pub mod llm;
pub mod recovery;

// Re-export commonly used types
pub use config::{ClientConfig, ClientConfigPatch, ConfigLoader, PublicConfig};
pub use error::{CIRCUIT_OPEN_MESSAGE, GatewayError, GatewayResult};
pub use llm::{
    ChatMessage, ChatOverrides, ChatTransport, FunctionSpec, LlmGateway, ResponseBlock,
    ToolChoice, TransportFactory,
};
pub use recovery::{CircuitBreakerStats, CircuitState};
