//! Core error types for the gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Message carried by every fast-fail from an open circuit breaker.
pub const CIRCUIT_OPEN_MESSAGE: &str = "Circuit breaker is OPEN";

/// Main error type for the gateway
///
/// Transport errors display their message untouched so that the remote root
/// cause is still visible after the retry controller gives up.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// Invalid or missing configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        field: Option<String>,
    },

    /// The circuit breaker rejected the call without a network attempt
    #[error("Circuit breaker is OPEN")]
    CircuitOpen { component: String },

    /// Network, timeout or non-success HTTP status from the endpoint
    #[error("{message}")]
    Transport {
        message: String,
        status_code: Option<u16>,
        retryable: bool,
    },

    /// Response arrived but carried nothing usable
    #[error("Response format error: {message}")]
    ResponseFormat { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// Caller supplied something the gateway cannot send
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}
