//! Import gateway trait definition.

use async_trait::async_trait;

use crate::errors::GatewayError;
use crate::proto::{ImportarIndiceRequest, ImportarIndiceResponse};

/// Abstract interface to the remote index-import service.
///
/// The call is synchronous from the caller's perspective: the worker
/// blocks on it until the remote service answers or the call fails.
/// Implementations can be swapped for fakes in tests.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async
/// tasks.
///
/// # Error Handling
///
/// An `Err` means the call itself failed (network unreachable, timeout,
/// transport error) and is always retryable. A response with
/// `ImportacaoStatus::Erro` is a business-level rejection reported by
/// the service and returns as `Ok`.
#[async_trait]
pub trait ImportGateway: Send + Sync {
    /// Import one index on the remote service.
    async fn importar_indice(
        &self,
        request: ImportarIndiceRequest,
    ) -> Result<ImportarIndiceResponse, GatewayError>;
}
