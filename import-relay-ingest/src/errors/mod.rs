//! Error types for the import relay ingest.

use import_relay_gateway::GatewayError;
use thiserror::Error;

/// Errors that can occur in the import relay ingest.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The inbound message could not be decoded.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Kafka-related error.
    #[error("Kafka error: {0}")]
    KafkaError(String),

    /// Failed to publish to the failure topic.
    #[error("Publish error: {0}")]
    PublishError(String),

    /// Channel communication error.
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// Error raised by the import gateway call.
    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    /// Configuration error.
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl IngestError {
    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }

    /// Create a Kafka error.
    pub fn kafka(msg: impl Into<String>) -> Self {
        Self::KafkaError(msg.into())
    }

    /// Create a publish error.
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::PublishError(msg.into())
    }

    /// Create a channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::ChannelError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<rdkafka::error::KafkaError> for IngestError {
    fn from(err: rdkafka::error::KafkaError) -> Self {
        Self::KafkaError(err.to_string())
    }
}
