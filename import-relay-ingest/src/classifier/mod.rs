//! Response classifier and acknowledgment policy.
//!
//! Pure functions mapping the result of one message's dispatch to a
//! terminal outcome and the ack/publish/retry decision. Neither touches
//! the broker, so both are testable in isolation.

use std::fmt;

use import_relay_gateway::{GatewayError, ImportacaoStatus, ImportarIndiceResponse};
use import_relay_shared::UNSPECIFIED_FAILURE_MESSAGE;

/// Maximum length of a failure detail used as a metric label.
pub const DETAIL_MAX_CHARS: usize = 64;

/// Placeholder when no failure detail is available.
pub const DETAIL_PLACEHOLDER: &str = "unknown";

/// Prefix for failure messages caused by undecodable input.
pub const INVALID_PAYLOAD_PREFIX: &str = "Payload invalido: ";

/// Bounded failure category for metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// The inbound message could not be decoded.
    Deserialization,
    /// The remote service rejected the import.
    Business,
    /// Infrastructure-level failure of the gateway call.
    Technical,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deserialization => "deserialization",
            Self::Business => "business",
            Self::Technical => "technical",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The raw result of running one message through decode and dispatch.
#[derive(Debug)]
pub enum DispatchResult {
    /// Structural decoding failed with the given reason.
    DecodeFailed(String),
    /// The gateway returned a business response.
    Completed(ImportarIndiceResponse),
    /// The gateway call itself raised.
    CallFailed(GatewayError),
}

/// Terminal classification of one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The import succeeded. `already_exists` marks the idempotent
    /// replay case, which is equally a success.
    Success { already_exists: bool },
    /// An outcome that will not change on retry.
    PermanentFailure {
        category: FailureCategory,
        message: String,
        detail: String,
    },
    /// An outcome that may succeed if retried.
    TransientFailure { detail: String },
}

/// What to do with the message after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Commit the offset so the message is not redelivered.
    pub acknowledge: bool,
    /// Emit a failure envelope to the failure topic.
    pub publish_failure: bool,
    /// Surface the error so the broker layer retries with backoff.
    pub propagate: bool,
}

/// Classify a dispatch result into a terminal outcome.
///
/// The failure category and the bounded metric detail are computed here,
/// exactly once per message.
pub fn classify(result: &DispatchResult) -> Outcome {
    match result {
        DispatchResult::DecodeFailed(reason) => Outcome::PermanentFailure {
            category: FailureCategory::Deserialization,
            message: format!("{INVALID_PAYLOAD_PREFIX}{reason}"),
            detail: sanitize_detail(Some(reason)),
        },
        DispatchResult::Completed(response) => match response.status() {
            ImportacaoStatus::Importado => Outcome::Success {
                already_exists: false,
            },
            ImportacaoStatus::JaExiste => Outcome::Success {
                already_exists: true,
            },
            ImportacaoStatus::Erro | ImportacaoStatus::NaoInformado => {
                let message = if response.mensagem.is_empty() {
                    UNSPECIFIED_FAILURE_MESSAGE.to_string()
                } else {
                    response.mensagem.clone()
                };
                Outcome::PermanentFailure {
                    category: FailureCategory::Business,
                    detail: sanitize_detail(Some(&response.mensagem)),
                    message,
                }
            }
        },
        DispatchResult::CallFailed(err) => Outcome::TransientFailure {
            detail: sanitize_detail(Some(&err.to_string())),
        },
    }
}

/// Map a terminal outcome to the acknowledgment decision.
pub fn decide(outcome: &Outcome) -> Decision {
    match outcome {
        Outcome::Success { .. } => Decision {
            acknowledge: true,
            publish_failure: false,
            propagate: false,
        },
        Outcome::PermanentFailure { .. } => Decision {
            acknowledge: true,
            publish_failure: true,
            propagate: false,
        },
        Outcome::TransientFailure { .. } => Decision {
            acknowledge: false,
            publish_failure: false,
            propagate: true,
        },
    }
}

/// Bound a failure detail for use as a metric label.
///
/// Truncates to [`DETAIL_MAX_CHARS`] characters and substitutes
/// [`DETAIL_PLACEHOLDER`] when no detail is available.
pub fn sanitize_detail(detail: Option<&str>) -> String {
    match detail {
        Some(d) if !d.trim().is_empty() => d.chars().take(DETAIL_MAX_CHARS).collect(),
        _ => DETAIL_PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: ImportacaoStatus, mensagem: &str) -> ImportarIndiceResponse {
        ImportarIndiceResponse {
            status: status as i32,
            mensagem: mensagem.to_string(),
        }
    }

    #[test]
    fn test_decode_failure_is_permanent() {
        let outcome = classify(&DispatchResult::DecodeFailed("expected value".to_string()));

        match outcome {
            Outcome::PermanentFailure {
                category,
                message,
                detail,
            } => {
                assert_eq!(category, FailureCategory::Deserialization);
                assert_eq!(message, "Payload invalido: expected value");
                assert_eq!(detail, "expected value");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_imported_is_success() {
        let outcome = classify(&DispatchResult::Completed(response(
            ImportacaoStatus::Importado,
            "",
        )));
        assert_eq!(
            outcome,
            Outcome::Success {
                already_exists: false
            }
        );
    }

    #[test]
    fn test_already_exists_is_success() {
        let outcome = classify(&DispatchResult::Completed(response(
            ImportacaoStatus::JaExiste,
            "",
        )));
        assert_eq!(
            outcome,
            Outcome::Success {
                already_exists: true
            }
        );
    }

    #[test]
    fn test_remote_error_is_permanent_business_failure() {
        let outcome = classify(&DispatchResult::Completed(response(
            ImportacaoStatus::Erro,
            "campo obrigatório ausente",
        )));

        match outcome {
            Outcome::PermanentFailure {
                category, message, ..
            } => {
                assert_eq!(category, FailureCategory::Business);
                assert_eq!(message, "campo obrigatório ausente");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_remote_error_without_message_uses_fallback() {
        let outcome = classify(&DispatchResult::Completed(response(
            ImportacaoStatus::Erro,
            "",
        )));

        match outcome {
            Outcome::PermanentFailure {
                message, detail, ..
            } => {
                assert_eq!(message, UNSPECIFIED_FAILURE_MESSAGE);
                assert_eq!(detail, DETAIL_PLACEHOLDER);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_gateway_failure_is_transient() {
        let outcome = classify(&DispatchResult::CallFailed(GatewayError::call(
            "connection refused",
        )));
        assert!(matches!(outcome, Outcome::TransientFailure { .. }));
    }

    #[test]
    fn test_decision_table() {
        let success = decide(&Outcome::Success {
            already_exists: false,
        });
        assert!(success.acknowledge);
        assert!(!success.publish_failure);
        assert!(!success.propagate);

        let permanent = decide(&Outcome::PermanentFailure {
            category: FailureCategory::Business,
            message: "m".to_string(),
            detail: "m".to_string(),
        });
        assert!(permanent.acknowledge);
        assert!(permanent.publish_failure);
        assert!(!permanent.propagate);

        let transient = decide(&Outcome::TransientFailure {
            detail: "d".to_string(),
        });
        assert!(!transient.acknowledge);
        assert!(!transient.publish_failure);
        assert!(transient.propagate);
    }

    #[test]
    fn test_sanitize_detail_truncates() {
        let long = "x".repeat(200);
        let detail = sanitize_detail(Some(&long));
        assert_eq!(detail.chars().count(), DETAIL_MAX_CHARS);
    }

    #[test]
    fn test_sanitize_detail_respects_char_boundaries() {
        let long = "é".repeat(100);
        let detail = sanitize_detail(Some(&long));
        assert_eq!(detail.chars().count(), DETAIL_MAX_CHARS);
        assert!(detail.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_sanitize_detail_placeholder() {
        assert_eq!(sanitize_detail(None), DETAIL_PLACEHOLDER);
        assert_eq!(sanitize_detail(Some("   ")), DETAIL_PLACEHOLDER);
    }

    #[test]
    fn test_short_detail_is_unchanged() {
        assert_eq!(sanitize_detail(Some("timeout")), "timeout");
    }
}
