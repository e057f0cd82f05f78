//! Wire messages for the `ImportarIndice` RPC.
//!
//! Hand-written prost types matching the remote service's protobuf
//! contract. Optional scalar fields use explicit presence so that an
//! absent payload field stays absent on the wire instead of collapsing
//! to zero/empty. The `campos` map is a `BTreeMap` so encoding the same
//! request twice is byte-identical.

use std::collections::BTreeMap;

/// Request for the remote index import.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ImportarIndiceRequest {
    #[prost(message, optional, tag = "1")]
    pub legacy: Option<LegacyIndice>,
    #[prost(int64, optional, tag = "2")]
    pub cliente_id: Option<i64>,
    #[prost(int64, optional, tag = "3")]
    pub departamento_id: Option<i64>,
    #[prost(int64, optional, tag = "4")]
    pub projeto_id: Option<i64>,
    #[prost(int64, optional, tag = "5")]
    pub formulario_id: Option<i64>,
    #[prost(int64, optional, tag = "6")]
    pub lote_id: Option<i64>,
    #[prost(int64, optional, tag = "7")]
    pub usuario_id: Option<i64>,
    #[prost(message, repeated, tag = "8")]
    pub form_data: Vec<FormDataItem>,
    #[prost(string, optional, tag = "9")]
    pub base_mount_path: Option<String>,
    #[prost(string, optional, tag = "10")]
    pub correlation_id: Option<String>,
}

/// Legacy index record carried on the import request.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LegacyIndice {
    #[prost(int64, optional, tag = "1")]
    pub id_indice: Option<i64>,
    #[prost(int64, optional, tag = "2")]
    pub id_projeto: Option<i64>,
    #[prost(btree_map = "string, string", tag = "3")]
    pub campos: BTreeMap<String, String>,
    #[prost(string, optional, tag = "4")]
    pub arquivo: Option<String>,
    #[prost(int32, optional, tag = "5")]
    pub npaginas: Option<i32>,
    #[prost(double, optional, tag = "6")]
    pub tamanho: Option<f64>,
    #[prost(int32, optional, tag = "7")]
    pub id_usuario_create: Option<i32>,
    #[prost(string, optional, tag = "8")]
    pub ocr: Option<String>,
    #[prost(string, optional, tag = "9")]
    pub lote: Option<String>,
    #[prost(string, optional, tag = "10")]
    pub data_publicacao: Option<String>,
    #[prost(string, optional, tag = "11")]
    pub hora_publicacao: Option<String>,
    #[prost(string, optional, tag = "12")]
    pub ext: Option<String>,
    #[prost(int32, optional, tag = "13")]
    pub ocr_status: Option<i32>,
    #[prost(string, optional, tag = "14")]
    pub storage: Option<String>,
}

/// One form field on the import request.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FormDataItem {
    #[prost(int64, tag = "1")]
    pub campo_id: i64,
    #[prost(string, tag = "2")]
    pub valor: String,
}

/// Response of the remote index import.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ImportarIndiceResponse {
    #[prost(enumeration = "ImportacaoStatus", tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub mensagem: String,
}

/// Outcome reported by the remote import service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ImportacaoStatus {
    /// Wire default; never sent by a healthy service.
    NaoInformado = 0,
    /// The index was imported.
    Importado = 1,
    /// The index already exists; idempotent replay, not an error.
    JaExiste = 2,
    /// The service rejected the import (business failure).
    Erro = 3,
}
