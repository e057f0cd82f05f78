//! Payload decoder for inbound import requests.

use import_relay_shared::ImportRequestPayload;

use crate::errors::IngestError;

/// Decode raw message bytes into an import-request payload.
///
/// Decoding either fully succeeds or fails; there is no partial-success
/// mode. Unknown top-level fields are ignored for forward compatibility.
pub fn decode(raw: &[u8]) -> Result<ImportRequestPayload, IngestError> {
    serde_json::from_slice(raw).map_err(|e| IngestError::decode(e.to_string()))
}
