//! # Import Relay
//!
//! Main library for the GED import relay.
//!
//! This crate provides the entry point and configuration for running
//! the relay: consuming import requests from Kafka, relaying them to
//! the remote import-index service, and publishing failures.

pub mod config;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur during relay initialization or execution.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] import_relay_ingest::IngestError),

    /// Gateway error.
    #[error("Gateway error: {0}")]
    GatewayError(#[from] import_relay_gateway::GatewayError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RelayError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
