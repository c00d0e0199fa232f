//! Error types for the Tally gateway
//!
//! Every fallible operation in `tally-core` returns [`GatewayResult`]. The
//! variants map onto the failure classes the gateway distinguishes:
//! configuration, open circuit, transport, response format and input errors.

mod classifiers;
mod constructors;
mod conversions;
mod types;

pub use types::{CIRCUIT_OPEN_MESSAGE, GatewayError, GatewayResult};
