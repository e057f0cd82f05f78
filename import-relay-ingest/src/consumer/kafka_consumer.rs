//! Kafka consumer implementation for the import relay.
//!
//! Pulls raw import-request messages from Kafka and routes them to the
//! worker pool, preserving per-partition ordering.

use rdkafka::{
    config::ClientConfig,
    consumer::{CommitMode, Consumer, StreamConsumer},
    message::Message as KafkaMessage,
    Offset, TopicPartitionList,
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info};

use crate::consumer::{Acknowledger, InboundMessage};
use crate::errors::IngestError;

/// Kafka consumer for import requests.
///
/// Offsets are committed manually through the [`Acknowledger`]
/// implementation; auto-commit is disabled.
pub struct KafkaConsumer {
    consumer: StreamConsumer,
    topic: String,
}

impl KafkaConsumer {
    /// Create a new Kafka consumer.
    ///
    /// # Arguments
    ///
    /// * `brokers` - Kafka broker addresses (comma-separated)
    /// * `group_id` - Consumer group ID
    /// * `topic` - Request topic to subscribe to
    pub fn new(
        brokers: &str,
        group_id: &str,
        topic: impl Into<String>,
    ) -> Result<Self, IngestError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .create()
            .map_err(|e| IngestError::kafka(e.to_string()))?;

        let topic = topic.into();
        info!(brokers = %brokers, group_id = %group_id, topic = %topic, "Created Kafka consumer");

        Ok(Self { consumer, topic })
    }

    /// Subscribe to the request topic.
    pub fn subscribe(&self) -> Result<(), IngestError> {
        self.consumer
            .subscribe(&[self.topic.as_str()])
            .map_err(|e| IngestError::kafka(e.to_string()))?;

        info!(topic = %self.topic, "Subscribed to Kafka topic");
        Ok(())
    }

    /// Pull messages and route each to a worker channel by partition.
    ///
    /// Messages from the same partition always land on the same worker,
    /// so they are processed and acknowledged in delivery order. Runs
    /// until the shutdown signal fires or the stream ends.
    pub async fn run(
        &self,
        senders: Vec<mpsc::Sender<InboundMessage>>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), IngestError> {
        use futures::StreamExt;

        if senders.is_empty() {
            return Err(IngestError::channel("no worker channels"));
        }

        let mut message_stream = self.consumer.stream();

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Consumer received shutdown signal");
                    break;
                }
                message = message_stream.next() => {
                    match message {
                        Some(Ok(msg)) => {
                            let inbound = InboundMessage {
                                topic: msg.topic().to_string(),
                                partition: msg.partition(),
                                offset: msg.offset(),
                                payload: msg.payload().unwrap_or_default().to_vec(),
                            };

                            debug!(
                                partition = inbound.partition,
                                offset = inbound.offset,
                                "Routing message"
                            );

                            let index =
                                inbound.partition.rem_euclid(senders.len() as i32) as usize;
                            if senders[index].send(inbound).await.is_err() {
                                error!("Worker channel closed, stopping consumer");
                                break;
                            }
                        }
                        Some(Err(e)) => {
                            error!(error = %e, "Kafka error");
                        }
                        None => {
                            info!("Kafka stream ended");
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl Acknowledger for KafkaConsumer {
    fn acknowledge(&self, topic: &str, partition: i32, offset: i64) -> Result<(), IngestError> {
        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(topic, partition, Offset::Offset(offset + 1))
            .map_err(|e| IngestError::kafka(e.to_string()))?;

        self.consumer
            .commit(&tpl, CommitMode::Async)
            .map_err(|e| IngestError::kafka(e.to_string()))?;

        Ok(())
    }
}
