//! Resilient gateway client
//!
//! Every logical call runs through the same pipeline: circuit breaker,
//! then a retry loop in which each attempt takes a rate-limiter token
//! before reaching the transport, then response normalization.

mod accessors;
mod batch;
mod chat;
mod config_ops;
mod constructor;
mod request;
mod types;


pub use request::build_request;
pub use types::LlmGateway;
