//! Request mapper for the import relay.
//!
//! Converts a decoded payload into the outbound RPC request. A field is
//! included only if present in the payload; string fields additionally
//! require non-blank content. Mapping is deterministic and
//! side-effect-free.

use import_relay_gateway::{FormDataItem, ImportarIndiceRequest, LegacyIndice};
use import_relay_shared::{ImportRequestPayload, LegacyIndexPayload};

/// Build the outbound import request from a decoded payload.
pub fn map_request(payload: &ImportRequestPayload) -> ImportarIndiceRequest {
    let mut form_data = Vec::new();
    if let Some(items) = &payload.form_data {
        for item in items.iter().flatten() {
            // A field without an identifier cannot be addressed remotely.
            let Some(campo_id) = item.campo_id else {
                continue;
            };
            form_data.push(FormDataItem {
                campo_id,
                valor: item.valor.clone().unwrap_or_default(),
            });
        }
    }

    ImportarIndiceRequest {
        legacy: payload.legacy.as_ref().map(map_legacy),
        cliente_id: payload.cliente_id,
        departamento_id: payload.departamento_id,
        projeto_id: payload.projeto_id,
        formulario_id: payload.formulario_id,
        lote_id: payload.lote_id,
        usuario_id: payload.usuario_id,
        form_data,
        base_mount_path: non_blank(&payload.base_mount_path),
        correlation_id: non_blank(&payload.correlation_id),
    }
}

fn map_legacy(legacy: &LegacyIndexPayload) -> LegacyIndice {
    LegacyIndice {
        id_indice: legacy.id_indice,
        id_projeto: legacy.id_projeto,
        campos: legacy.campos.clone().unwrap_or_default(),
        arquivo: non_blank(&legacy.arquivo),
        npaginas: legacy.npaginas,
        tamanho: legacy.tamanho,
        id_usuario_create: legacy.id_usuario_create,
        ocr: non_blank(&legacy.ocr),
        lote: non_blank(&legacy.lote),
        data_publicacao: non_blank(&legacy.data_publicacao),
        hora_publicacao: non_blank(&legacy.hora_publicacao),
        ext: non_blank(&legacy.ext),
        ocr_status: legacy.ocr_status,
        storage: non_blank(&legacy.storage),
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .filter(|s| !s.trim().is_empty())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use import_relay_shared::FormFieldPayload;
    use prost::Message;

    fn sample_payload() -> ImportRequestPayload {
        serde_json::from_str(
            r#"{
                "legacy": {"idIndice": 42, "arquivo": "doc.pdf", "campos": {"a": "1"}},
                "clienteId": 1,
                "projetoId": 3,
                "formData": [
                    {"campoId": 10, "valor": "abc"},
                    {"campoId": 11},
                    {"valor": "orphan"},
                    null
                ],
                "baseMountPath": "/mnt/ged",
                "correlationId": "corr-1"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_maps_present_fields() {
        let request = map_request(&sample_payload());

        assert_eq!(request.cliente_id, Some(1));
        assert_eq!(request.projeto_id, Some(3));
        assert_eq!(request.base_mount_path.as_deref(), Some("/mnt/ged"));
        assert_eq!(request.correlation_id.as_deref(), Some("corr-1"));

        let legacy = request.legacy.unwrap();
        assert_eq!(legacy.id_indice, Some(42));
        assert_eq!(legacy.arquivo.as_deref(), Some("doc.pdf"));
        assert_eq!(legacy.campos.get("a").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let payload = ImportRequestPayload {
            cliente_id: Some(1),
            ..Default::default()
        };
        let request = map_request(&payload);

        assert_eq!(request.departamento_id, None);
        assert_eq!(request.legacy, None);
        assert!(request.form_data.is_empty());
    }

    #[test]
    fn test_blank_strings_are_omitted() {
        let payload = ImportRequestPayload {
            base_mount_path: Some("   ".to_string()),
            correlation_id: Some(String::new()),
            ..Default::default()
        };
        let request = map_request(&payload);

        assert_eq!(request.base_mount_path, None);
        assert_eq!(request.correlation_id, None);
    }

    #[test]
    fn test_form_field_without_id_is_skipped() {
        let request = map_request(&sample_payload());
        assert_eq!(request.form_data.len(), 2);
        assert_eq!(request.form_data[0].campo_id, 10);
        assert_eq!(request.form_data[0].valor, "abc");
    }

    #[test]
    fn test_form_field_null_value_becomes_empty_string() {
        let payload = ImportRequestPayload {
            form_data: Some(vec![Some(FormFieldPayload {
                campo_id: Some(11),
                valor: None,
            })]),
            ..Default::default()
        };
        let request = map_request(&payload);

        assert_eq!(request.form_data.len(), 1);
        assert_eq!(request.form_data[0].valor, "");
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let payload = sample_payload();
        let first = map_request(&payload).encode_to_vec();
        let second = map_request(&payload).encode_to_vec();
        assert_eq!(first, second);
    }
}
