//! Orchestrator module for the import relay.
//!
//! Coordinates the consumer and the fixed-size worker pool.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info};

use import_relay_gateway::ImportGateway;

use crate::consumer::{Acknowledger, InboundMessage, KafkaConsumer};
use crate::errors::IngestError;
use crate::metrics::MetricsRecorder;
use crate::publisher::FailureSink;
use crate::worker::{RelayWorker, WorkerConfig};

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Number of workers pulling from the partition channels.
    pub workers: usize,
    /// Size of each worker's message channel buffer.
    pub channel_buffer_size: usize,
    /// Retry parameters handed to each worker.
    pub worker: WorkerConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            channel_buffer_size: 256,
            worker: WorkerConfig::default(),
        }
    }
}

/// Orchestrator that coordinates the relay components.
///
/// The orchestrator:
/// - Spawns the consumer task and the worker pool
/// - Routes messages to workers by partition, preserving ordering
/// - Handles shutdown signals and drains workers before exit
pub struct Orchestrator {
    consumer: Arc<KafkaConsumer>,
    gateway: Arc<dyn ImportGateway>,
    failure_sink: Arc<dyn FailureSink>,
    metrics: Arc<dyn MetricsRecorder>,
    config: OrchestratorConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl Orchestrator {
    /// Create a new orchestrator with default configuration.
    pub fn new(
        consumer: KafkaConsumer,
        gateway: Arc<dyn ImportGateway>,
        failure_sink: Arc<dyn FailureSink>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self::with_config(
            consumer,
            gateway,
            failure_sink,
            metrics,
            OrchestratorConfig::default(),
        )
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        consumer: KafkaConsumer,
        gateway: Arc<dyn ImportGateway>,
        failure_sink: Arc<dyn FailureSink>,
        metrics: Arc<dyn MetricsRecorder>,
        config: OrchestratorConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            consumer: Arc::new(consumer),
            gateway,
            failure_sink,
            metrics,
            config,
            shutdown_tx,
        }
    }

    /// Run the orchestrator.
    ///
    /// Blocks until a shutdown signal is received or the consumer
    /// stream ends; workers are drained before returning.
    pub async fn run(&self) -> Result<(), IngestError> {
        info!(workers = self.config.workers, "Starting import relay orchestrator");

        self.consumer.subscribe()?;

        let acknowledger: Arc<dyn Acknowledger> = self.consumer.clone();

        let mut senders = Vec::with_capacity(self.config.workers);
        let mut worker_handles = Vec::with_capacity(self.config.workers);

        for id in 0..self.config.workers.max(1) {
            let (tx, rx) = mpsc::channel::<InboundMessage>(self.config.channel_buffer_size);
            senders.push(tx);

            let worker = RelayWorker::new(
                id,
                self.gateway.clone(),
                self.failure_sink.clone(),
                self.metrics.clone(),
                acknowledger.clone(),
                self.config.worker.clone(),
            );

            worker_handles.push(tokio::spawn(async move {
                worker.run(rx).await;
            }));
        }

        let consumer = self.consumer.clone();
        let shutdown_rx = self.shutdown_tx.subscribe();

        let consumer_handle = tokio::spawn(async move {
            if let Err(e) = consumer.run(senders, shutdown_rx).await {
                error!(error = %e, "Consumer error");
            }
        });

        let shutdown_tx = self.shutdown_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
            }
        });

        // When the consumer returns it drops the senders, so the
        // workers drain their channels and exit.
        let _ = consumer_handle.await;
        for handle in worker_handles {
            let _ = handle.await;
        }

        info!("Orchestrator shutdown complete");
        Ok(())
    }

    /// Trigger a graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}
