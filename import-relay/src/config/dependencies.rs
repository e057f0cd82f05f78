//! Dependency initialization and wiring for the import relay.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::RelayError;
use import_relay_gateway::{GatewayConfig, GrpcImportGateway};
use import_relay_ingest::{
    consumer::KafkaConsumer,
    metrics::RelayMetrics,
    orchestrator::{Orchestrator, OrchestratorConfig},
    publisher::KafkaFailurePublisher,
    worker::WorkerConfig,
};

/// Default Kafka broker address.
const DEFAULT_KAFKA_BROKER: &str = "localhost:9092";

/// Default Kafka consumer group ID.
const DEFAULT_KAFKA_GROUP_ID: &str = "import-relay";

/// Default request topic.
const DEFAULT_REQUEST_TOPIC: &str = "importacao.solicitacoes";

/// Default failure topic.
const DEFAULT_FAILURE_TOPIC: &str = "importacao.falhas";

/// Default import service endpoint.
const DEFAULT_GRPC_ENDPOINT: &str = "http://localhost:50051";

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// Shared metrics recorder, for inspection and logging.
    pub metrics: Arc<RelayMetrics>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `KAFKA_BROKER`: Kafka broker address (default: localhost:9092)
    /// - `KAFKA_GROUP_ID`: Consumer group ID (default: import-relay)
    /// - `IMPORT_REQUEST_TOPIC`: Inbound topic (default: importacao.solicitacoes)
    /// - `IMPORT_FAILURE_TOPIC`: Failure topic (default: importacao.falhas)
    /// - `IMPORT_GRPC_ENDPOINT`: Import service endpoint (default: http://localhost:50051)
    /// - `RELAY_WORKERS`: Worker pool size (default: 4)
    /// - `RELAY_MAX_ATTEMPTS`: Gateway attempts per message (default: 3)
    /// - `RELAY_RETRY_BACKOFF_MS`: Delay between attempts (default: 5000)
    pub fn new() -> Result<Self, RelayError> {
        let kafka_broker =
            env::var("KAFKA_BROKER").unwrap_or_else(|_| DEFAULT_KAFKA_BROKER.to_string());
        let kafka_group_id =
            env::var("KAFKA_GROUP_ID").unwrap_or_else(|_| DEFAULT_KAFKA_GROUP_ID.to_string());
        let request_topic =
            env::var("IMPORT_REQUEST_TOPIC").unwrap_or_else(|_| DEFAULT_REQUEST_TOPIC.to_string());
        let failure_topic =
            env::var("IMPORT_FAILURE_TOPIC").unwrap_or_else(|_| DEFAULT_FAILURE_TOPIC.to_string());
        let grpc_endpoint =
            env::var("IMPORT_GRPC_ENDPOINT").unwrap_or_else(|_| DEFAULT_GRPC_ENDPOINT.to_string());

        let workers = env_parse("RELAY_WORKERS", 4usize)?;
        let max_attempts = env_parse("RELAY_MAX_ATTEMPTS", 3u32)?;
        let retry_backoff_ms = env_parse("RELAY_RETRY_BACKOFF_MS", 5000u64)?;

        info!(
            kafka_broker = %kafka_broker,
            kafka_group_id = %kafka_group_id,
            request_topic = %request_topic,
            failure_topic = %failure_topic,
            grpc_endpoint = %grpc_endpoint,
            workers,
            max_attempts,
            retry_backoff_ms,
            "Initializing dependencies"
        );

        let gateway = GrpcImportGateway::new(&GatewayConfig::new(grpc_endpoint))?;
        info!("Import gateway created");

        let publisher = KafkaFailurePublisher::new(&kafka_broker, failure_topic)?;
        let consumer = KafkaConsumer::new(&kafka_broker, &kafka_group_id, request_topic)?;
        info!("Kafka clients created");

        let metrics = Arc::new(RelayMetrics::new());

        let orchestrator = Orchestrator::with_config(
            consumer,
            Arc::new(gateway),
            Arc::new(publisher),
            metrics.clone(),
            OrchestratorConfig {
                workers,
                channel_buffer_size: 256,
                worker: WorkerConfig {
                    max_attempts,
                    retry_backoff: Duration::from_millis(retry_backoff_ms),
                },
            },
        );

        Ok(Self {
            orchestrator,
            metrics,
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> Result<T, RelayError> {
    parse_or_default(name, env::var(name).ok(), default)
}

fn parse_or_default<T: std::str::FromStr>(
    name: &str,
    value: Option<String>,
    default: T,
) -> Result<T, RelayError> {
    match value {
        Some(value) => value
            .parse()
            .map_err(|_| RelayError::config(format!("Invalid value for {}: {}", name, value))),
        None => Ok(default),
    }
}
