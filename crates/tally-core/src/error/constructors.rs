//! Constructor methods for GatewayError

use super::types::GatewayError;

impl GatewayError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a configuration error naming the offending field
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an open-circuit rejection for the named component
    pub fn circuit_open(component: impl Into<String>) -> Self {
        Self::CircuitOpen {
            component: component.into(),
        }
    }

    /// Create a transport error without a status code (network, timeout)
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status_code: None,
            retryable: true,
        }
    }

    /// Create a transport error from an HTTP status
    ///
    /// 408, 429 and 5xx are retryable; every other status is permanent.
    pub fn transport_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Transport {
            message: message.into(),
            status_code: Some(status_code),
            retryable: Self::is_retryable_status(status_code),
        }
    }

    /// Create a transport error that must not be retried
    pub fn transport_permanent(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status_code: None,
            retryable: false,
        }
    }

    /// Create a new response format error
    pub fn response_format(message: impl Into<String>) -> Self {
        Self::ResponseFormat {
            message: message.into(),
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
