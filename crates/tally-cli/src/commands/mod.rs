//! CLI command handlers

pub mod batch;
pub mod chat;
pub mod config;
