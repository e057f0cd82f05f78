//! Failure envelope published to the failure topic.

use serde::Serialize;

use crate::payload::ImportRequestPayload;

/// Fallback message when a failure carries no description.
pub const UNSPECIFIED_FAILURE_MESSAGE: &str = "Erro nao informado";

/// A structured failure record for the failure topic.
///
/// Serialized as `{"falha": ..., "idIndice": ..., "correlationId": ...}`
/// with the correlation key omitted entirely when absent. One envelope is
/// built per failed message, published, then discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureEnvelope {
    pub falha: String,
    #[serde(rename = "idIndice")]
    pub id_indice: i64,
    #[serde(rename = "correlationId", skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl FailureEnvelope {
    /// Build an envelope for a failed message.
    ///
    /// The index id is taken from `payload.legacy.idIndice` when available,
    /// else 0 (e.g. when the payload never decoded).
    pub fn build(
        payload: Option<&ImportRequestPayload>,
        message: Option<&str>,
        correlation_id: Option<&str>,
    ) -> Self {
        Self {
            falha: message
                .filter(|m| !m.is_empty())
                .unwrap_or(UNSPECIFIED_FAILURE_MESSAGE)
                .to_string(),
            id_indice: payload.map(ImportRequestPayload::index_id).unwrap_or(0),
            correlation_id: correlation_id.map(str::to_string),
        }
    }

    /// Partitioning key for the failure topic.
    pub fn key(&self) -> String {
        self.id_indice.to_string()
    }
}
