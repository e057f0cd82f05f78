//! Failure publisher for the import relay.
//!
//! Emits failure envelopes to the failure topic, keyed by the
//! stringified index id.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use tracing::{debug, info};

use import_relay_shared::FailureEnvelope;

use crate::errors::IngestError;

/// Delivery timeout for failure-topic publishes.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// Sink for failure envelopes.
///
/// Publishing is best-effort from the pipeline's point of view: the
/// caller logs and swallows errors, since the original message has
/// already been acknowledged by the time a permanent failure is
/// published.
#[async_trait]
pub trait FailureSink: Send + Sync {
    /// Publish one failure envelope.
    async fn publish(&self, envelope: &FailureEnvelope) -> Result<(), IngestError>;
}

/// Kafka-backed implementation of [`FailureSink`].
pub struct KafkaFailurePublisher {
    producer: FutureProducer,
    topic: String,
}

impl KafkaFailurePublisher {
    /// Create a new publisher for the given failure topic.
    pub fn new(brokers: &str, topic: impl Into<String>) -> Result<Self, IngestError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .set("compression.type", "zstd")
            .create()
            .map_err(|e| IngestError::kafka(e.to_string()))?;

        let topic = topic.into();
        info!(brokers = %brokers, topic = %topic, "Created failure publisher");

        Ok(Self { producer, topic })
    }
}

#[async_trait]
impl FailureSink for KafkaFailurePublisher {
    async fn publish(&self, envelope: &FailureEnvelope) -> Result<(), IngestError> {
        let body =
            serde_json::to_string(envelope).map_err(|e| IngestError::publish(e.to_string()))?;
        let key = envelope.key();

        let record = FutureRecord::to(&self.topic).key(&key).payload(&body);

        self.producer
            .send(record, PUBLISH_TIMEOUT)
            .await
            .map_err(|(e, _)| IngestError::publish(e.to_string()))?;

        debug!(id_indice = envelope.id_indice, "Published failure envelope");
        Ok(())
    }
}
