//! Consumer module for the import relay.
//!
//! Provides Kafka consumer functionality for receiving import requests
//! and the acknowledgment seam used by the workers.

mod kafka_consumer;
mod messages;

pub use kafka_consumer::KafkaConsumer;
pub use messages::InboundMessage;

use crate::errors::IngestError;

/// Commits a message's offset once the policy decides to acknowledge.
///
/// Acknowledgment is manual and deferred; nothing is committed on
/// receipt.
pub trait Acknowledger: Send + Sync {
    /// Mark the message at (topic, partition, offset) as processed.
    fn acknowledge(&self, topic: &str, partition: i32, offset: i64) -> Result<(), IngestError>;
}
