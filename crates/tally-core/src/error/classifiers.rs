//! Error classification used by the retry controller

use super::types::GatewayError;

impl GatewayError {
    /// Check whether another attempt could plausibly succeed.
    ///
    /// Only transport failures are ever retried. A malformed response,
    /// bad configuration or an open circuit will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport { retryable, .. } => *retryable,
            GatewayError::Config { .. }
            | GatewayError::CircuitOpen { .. }
            | GatewayError::ResponseFormat { .. }
            | GatewayError::Json { .. }
            | GatewayError::InvalidInput { .. } => false,
        }
    }

    /// Whether the error came from the transport call itself
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Transport { .. })
    }

    /// Whether this is the breaker's fast-fail rejection
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, GatewayError::CircuitOpen { .. })
    }

    /// HTTP status code attached to the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::Transport { status_code, .. } => *status_code,
            _ => None,
        }
    }

    pub(crate) fn is_retryable_status(status: u16) -> bool {
        matches!(status, 408 | 429) || (500..=599).contains(&status)
    }
}
