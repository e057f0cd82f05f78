//! Inbound import-request payload types.
//!
//! These mirror the JSON published on the import-request topic. Every field
//! is optional at decode time; validation belongs to the remote import
//! service. Unknown fields are ignored for forward compatibility.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A single import request as delivered on the request topic.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequestPayload {
    /// Legacy index record carried over from the old archive system.
    pub legacy: Option<LegacyIndexPayload>,
    pub cliente_id: Option<i64>,
    pub departamento_id: Option<i64>,
    pub projeto_id: Option<i64>,
    pub formulario_id: Option<i64>,
    pub lote_id: Option<i64>,
    pub usuario_id: Option<i64>,
    /// Ordered form fields. Entries may be null on the wire.
    pub form_data: Option<Vec<Option<FormFieldPayload>>>,
    pub base_mount_path: Option<String>,
    pub correlation_id: Option<String>,
}

impl ImportRequestPayload {
    /// The legacy index id, or 0 when the payload carries none.
    pub fn index_id(&self) -> i64 {
        self.legacy
            .as_ref()
            .and_then(|legacy| legacy.id_indice)
            .unwrap_or(0)
    }
}

/// Legacy index sub-record of an import request.
///
/// Absence of a field means "do not set" on the outbound request,
/// never "set to zero/empty".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyIndexPayload {
    pub id_indice: Option<i64>,
    pub id_projeto: Option<i64>,
    pub campos: Option<BTreeMap<String, String>>,
    pub arquivo: Option<String>,
    pub npaginas: Option<i32>,
    pub tamanho: Option<f64>,
    pub id_usuario_create: Option<i32>,
    pub ocr: Option<String>,
    pub lote: Option<String>,
    pub data_publicacao: Option<String>,
    pub hora_publicacao: Option<String>,
    pub ext: Option<String>,
    pub ocr_status: Option<i32>,
    pub storage: Option<String>,
}

/// One form field of an import request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldPayload {
    pub campo_id: Option<i64>,
    pub valor: Option<String>,
}
