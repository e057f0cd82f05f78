//! Relay worker.
//!
//! Each worker owns one message at a time and runs it end-to-end:
//! decode, map, gateway call, classify, act. Transient failures are
//! retried in place with a fixed backoff; the offset is only committed
//! once a terminal decision says so.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use import_relay_gateway::ImportGateway;
use import_relay_shared::{FailureEnvelope, ImportRequestPayload};

use crate::classifier::{classify, decide, DispatchResult, FailureCategory, Outcome};
use crate::consumer::{Acknowledger, InboundMessage};
use crate::decoder::decode;
use crate::mapper::map_request;
use crate::metrics::MetricsRecorder;
use crate::publisher::FailureSink;

/// Retry parameters for transient failures.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum gateway attempts per message, including the first.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_backoff: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_backoff: Duration::from_secs(5),
        }
    }
}

/// Processes messages from one worker channel sequentially.
pub struct RelayWorker {
    id: usize,
    gateway: Arc<dyn ImportGateway>,
    failure_sink: Arc<dyn FailureSink>,
    metrics: Arc<dyn MetricsRecorder>,
    acknowledger: Arc<dyn Acknowledger>,
    config: WorkerConfig,
}

impl RelayWorker {
    pub fn new(
        id: usize,
        gateway: Arc<dyn ImportGateway>,
        failure_sink: Arc<dyn FailureSink>,
        metrics: Arc<dyn MetricsRecorder>,
        acknowledger: Arc<dyn Acknowledger>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            id,
            gateway,
            failure_sink,
            metrics,
            acknowledger,
            config,
        }
    }

    /// Drain the channel, running each message to a terminal state
    /// before accepting the next.
    pub async fn run(&self, mut receiver: mpsc::Receiver<InboundMessage>) {
        info!(worker = self.id, "Worker started");

        while let Some(message) = receiver.recv().await {
            self.process(message).await;
        }

        info!(worker = self.id, "Worker stopped");
    }

    /// Run one message to a terminal state.
    pub async fn process(&self, message: InboundMessage) {
        self.metrics.message_received();
        self.metrics.in_flight_inc();
        let started = Instant::now();

        match decode(&message.payload) {
            Ok(payload) => self.dispatch(&message, &payload).await,
            Err(err) => {
                warn!(
                    worker = self.id,
                    partition = message.partition,
                    offset = message.offset,
                    error = %err,
                    "Failed to decode import request"
                );
                self.metrics.message_invalid();

                let outcome = classify(&DispatchResult::DecodeFailed(err.to_string()));
                self.finish(&message, None, &outcome).await;
            }
        }

        self.metrics.record_latency(started.elapsed());
        self.metrics.in_flight_dec();
    }

    /// Call the gateway, retrying transient failures with a fixed
    /// backoff up to the attempt cap.
    async fn dispatch(&self, message: &InboundMessage, payload: &ImportRequestPayload) {
        let request = map_request(payload);

        let mut attempt = 1u32;
        loop {
            let dispatch = match self.gateway.importar_indice(request.clone()).await {
                Ok(response) => {
                    self.metrics.import_processed();
                    DispatchResult::Completed(response)
                }
                Err(err) => DispatchResult::CallFailed(err),
            };

            let outcome = classify(&dispatch);

            if let Outcome::TransientFailure { detail } = &outcome {
                self.metrics
                    .import_failed(FailureCategory::Technical, detail);

                if attempt < self.config.max_attempts {
                    warn!(
                        worker = self.id,
                        partition = message.partition,
                        offset = message.offset,
                        attempt,
                        max_attempts = self.config.max_attempts,
                        detail = %detail,
                        "Gateway call failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry_backoff).await;
                    attempt += 1;
                    continue;
                }

                // Retry budget exhausted. The message is given up to
                // keep the partition moving; the offset is committed so
                // it is not redelivered forever.
                error!(
                    worker = self.id,
                    partition = message.partition,
                    offset = message.offset,
                    attempts = attempt,
                    correlation_id = payload.correlation_id.as_deref().unwrap_or(""),
                    detail = %detail,
                    "Retry attempts exhausted, skipping message"
                );
                self.acknowledge(message);
                return;
            }

            self.finish(message, Some(payload), &outcome).await;
            return;
        }
    }

    /// Act on a terminal outcome: record metrics, publish the failure
    /// envelope when required, and acknowledge.
    async fn finish(
        &self,
        message: &InboundMessage,
        payload: Option<&ImportRequestPayload>,
        outcome: &Outcome,
    ) {
        let decision = decide(outcome);

        match outcome {
            Outcome::Success { already_exists } => {
                if *already_exists {
                    self.metrics.import_already_exists();
                    debug!(
                        worker = self.id,
                        offset = message.offset,
                        "Index already exists"
                    );
                } else {
                    self.metrics.import_succeeded();
                    debug!(worker = self.id, offset = message.offset, "Index imported");
                }
            }
            Outcome::PermanentFailure {
                category,
                message: failure_message,
                detail,
            } => {
                self.metrics.import_failed(*category, detail);
                error!(
                    worker = self.id,
                    partition = message.partition,
                    offset = message.offset,
                    category = %category,
                    detail = %detail,
                    correlation_id = payload
                        .and_then(|p| p.correlation_id.as_deref())
                        .unwrap_or(""),
                    "Import failed permanently"
                );

                if decision.publish_failure {
                    let correlation_id = payload.and_then(|p| p.correlation_id.as_deref());
                    let envelope =
                        FailureEnvelope::build(payload, Some(failure_message), correlation_id);

                    // Best-effort: the message is acknowledged either
                    // way, a lost notification is the only consequence.
                    match self.failure_sink.publish(&envelope).await {
                        Ok(()) => self.metrics.failure_published(),
                        Err(err) => {
                            error!(
                                worker = self.id,
                                id_indice = envelope.id_indice,
                                error = %err,
                                "Failed to publish failure envelope"
                            );
                        }
                    }
                }
            }
            Outcome::TransientFailure { .. } => {
                // Handled by the retry loop; never a terminal act here.
            }
        }

        if decision.acknowledge {
            self.acknowledge(message);
        }
    }

    fn acknowledge(&self, message: &InboundMessage) {
        if let Err(err) =
            self.acknowledger
                .acknowledge(&message.topic, message.partition, message.offset)
        {
            error!(
                worker = self.id,
                partition = message.partition,
                offset = message.offset,
                error = %err,
                "Failed to commit offset"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use import_relay_gateway::{
        GatewayError, ImportacaoStatus, ImportarIndiceRequest, ImportarIndiceResponse,
    };

    use crate::errors::IngestError;
    use crate::metrics::RelayMetrics;

    /// Gateway fake returning a scripted sequence of results.
    struct ScriptedGateway {
        calls: AtomicUsize,
        script: Mutex<Vec<Result<ImportarIndiceResponse, GatewayError>>>,
    }

    impl ScriptedGateway {
        fn new(script: Vec<Result<ImportarIndiceResponse, GatewayError>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                script: Mutex::new(script),
            }
        }

        fn always(result: Result<ImportarIndiceResponse, GatewayError>) -> Self {
            let mut script = Vec::new();
            for _ in 0..16 {
                script.push(match &result {
                    Ok(r) => Ok(r.clone()),
                    Err(e) => Err(GatewayError::call(e.to_string())),
                });
            }
            Self::new(script)
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImportGateway for ScriptedGateway {
        async fn importar_indice(
            &self,
            _request: ImportarIndiceRequest,
        ) -> Result<ImportarIndiceResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script.lock().unwrap().remove(0)
        }
    }

    /// Failure sink fake capturing published envelopes.
    #[derive(Default)]
    struct RecordingSink {
        envelopes: Mutex<Vec<FailureEnvelope>>,
        fail: bool,
    }

    impl RecordingSink {
        fn failing() -> Self {
            Self {
                envelopes: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn published(&self) -> Vec<FailureEnvelope> {
            self.envelopes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FailureSink for RecordingSink {
        async fn publish(&self, envelope: &FailureEnvelope) -> Result<(), IngestError> {
            self.envelopes.lock().unwrap().push(envelope.clone());
            if self.fail {
                Err(IngestError::publish("broker down"))
            } else {
                Ok(())
            }
        }
    }

    /// Acknowledger fake counting commits.
    #[derive(Default)]
    struct CountingAck {
        commits: Mutex<Vec<(String, i32, i64)>>,
    }

    impl CountingAck {
        fn commits(&self) -> Vec<(String, i32, i64)> {
            self.commits.lock().unwrap().clone()
        }
    }

    impl Acknowledger for CountingAck {
        fn acknowledge(&self, topic: &str, partition: i32, offset: i64) -> Result<(), IngestError> {
            self.commits
                .lock()
                .unwrap()
                .push((topic.to_string(), partition, offset));
            Ok(())
        }
    }

    fn response(status: ImportacaoStatus, mensagem: &str) -> ImportarIndiceResponse {
        ImportarIndiceResponse {
            status: status as i32,
            mensagem: mensagem.to_string(),
        }
    }

    fn message(payload: &[u8]) -> InboundMessage {
        InboundMessage {
            topic: "importacao.solicitacoes".to_string(),
            partition: 0,
            offset: 7,
            payload: payload.to_vec(),
        }
    }

    struct Harness {
        gateway: Arc<ScriptedGateway>,
        sink: Arc<RecordingSink>,
        metrics: Arc<RelayMetrics>,
        ack: Arc<CountingAck>,
        worker: RelayWorker,
    }

    fn harness(gateway: ScriptedGateway, sink: RecordingSink, max_attempts: u32) -> Harness {
        let gateway = Arc::new(gateway);
        let sink = Arc::new(sink);
        let metrics = Arc::new(RelayMetrics::new());
        let ack = Arc::new(CountingAck::default());

        let worker = RelayWorker::new(
            0,
            gateway.clone(),
            sink.clone(),
            metrics.clone(),
            ack.clone(),
            WorkerConfig {
                max_attempts,
                retry_backoff: Duration::from_millis(1),
            },
        );

        Harness {
            gateway,
            sink,
            metrics,
            ack,
            worker,
        }
    }

    #[tokio::test]
    async fn test_imported_acks_without_failure() {
        let h = harness(
            ScriptedGateway::new(vec![Ok(response(ImportacaoStatus::Importado, ""))]),
            RecordingSink::default(),
            3,
        );

        h.worker.process(message(br#"{"clienteId": 1}"#)).await;

        assert_eq!(h.ack.commits(), vec![("importacao.solicitacoes".to_string(), 0, 7)]);
        assert!(h.sink.published().is_empty());

        let snapshot = h.metrics.snapshot();
        assert_eq!(snapshot.succeeded, 1);
        assert_eq!(snapshot.processed, 1);
        assert_eq!(snapshot.in_flight, 0);
    }

    #[tokio::test]
    async fn test_already_exists_is_success() {
        let h = harness(
            ScriptedGateway::new(vec![Ok(response(ImportacaoStatus::JaExiste, ""))]),
            RecordingSink::default(),
            3,
        );

        h.worker.process(message(br#"{}"#)).await;

        assert_eq!(h.ack.commits().len(), 1);
        assert!(h.sink.published().is_empty());
        assert_eq!(h.metrics.snapshot().already_exists, 1);
    }

    #[tokio::test]
    async fn test_decode_failure_publishes_and_acks_once() {
        let h = harness(
            ScriptedGateway::new(vec![]),
            RecordingSink::default(),
            3,
        );

        h.worker.process(message(b"{not json")).await;

        assert_eq!(h.gateway.call_count(), 0);
        assert_eq!(h.ack.commits().len(), 1);

        let published = h.sink.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].id_indice, 0);
        assert!(published[0].falha.starts_with("Payload invalido: "));
        assert_eq!(published[0].correlation_id, None);

        let snapshot = h.metrics.snapshot();
        assert_eq!(snapshot.invalid, 1);
        assert_eq!(snapshot.failures_published, 1);
    }

    #[tokio::test]
    async fn test_business_error_publishes_envelope_with_context() {
        let h = harness(
            ScriptedGateway::new(vec![Ok(response(
                ImportacaoStatus::Erro,
                "campo obrigatório ausente",
            ))]),
            RecordingSink::default(),
            3,
        );

        h.worker
            .process(message(
                br#"{"legacy": {"idIndice": 42}, "correlationId": "abc"}"#,
            ))
            .await;

        assert_eq!(h.ack.commits().len(), 1);

        let published = h.sink.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].falha, "campo obrigatório ausente");
        assert_eq!(published[0].id_indice, 42);
        assert_eq!(published[0].correlation_id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_transient_failure_retries_then_succeeds() {
        let h = harness(
            ScriptedGateway::new(vec![
                Err(GatewayError::call("unavailable")),
                Ok(response(ImportacaoStatus::Importado, "")),
            ]),
            RecordingSink::default(),
            3,
        );

        h.worker.process(message(br#"{}"#)).await;

        assert_eq!(h.gateway.call_count(), 2);
        assert_eq!(h.ack.commits().len(), 1);
        assert!(h.sink.published().is_empty());
        assert_eq!(h.metrics.snapshot().succeeded, 1);
    }

    #[tokio::test]
    async fn test_transient_failure_exhausts_attempts() {
        let h = harness(
            ScriptedGateway::always(Err(GatewayError::call("unavailable"))),
            RecordingSink::default(),
            3,
        );

        h.worker.process(message(br#"{}"#)).await;

        // One call per attempt, then the message is given up.
        assert_eq!(h.gateway.call_count(), 3);
        assert_eq!(h.ack.commits().len(), 1);
        assert!(h.sink.published().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_is_swallowed() {
        let h = harness(
            ScriptedGateway::new(vec![Ok(response(ImportacaoStatus::Erro, "rejected"))]),
            RecordingSink::failing(),
            3,
        );

        h.worker.process(message(br#"{}"#)).await;

        // Acknowledged despite the sink error, and not double-published.
        assert_eq!(h.ack.commits().len(), 1);
        assert_eq!(h.sink.published().len(), 1);
        assert_eq!(h.metrics.snapshot().failures_published, 0);
    }
}
