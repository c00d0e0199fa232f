//! Conversions from foreign error types

use super::types::GatewayError;

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err.to_string())
    }
}
