//! gRPC client for the remote import service.

use std::time::Duration;

use async_trait::async_trait;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tracing::info;

use crate::config::GatewayConfig;
use crate::errors::GatewayError;
use crate::interfaces::ImportGateway;
use crate::proto::{ImportarIndiceRequest, ImportarIndiceResponse};

/// Full method path of the `ImportarIndice` RPC.
const IMPORTAR_INDICE_PATH: &str =
    "/br.com.arquivototal.gedtotalapi.grpc.ImportacaoGedService/ImportarIndice";

/// gRPC-backed implementation of [`ImportGateway`].
///
/// The channel connects lazily, so construction succeeds even while the
/// remote service is down; the first call surfaces the connection error.
pub struct GrpcImportGateway {
    inner: Grpc<Channel>,
}

impl GrpcImportGateway {
    /// Create a new gateway against the configured endpoint.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let endpoint = Endpoint::from_shared(config.endpoint.clone())
            .map_err(|e| GatewayError::connection(e.to_string()))?
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .http2_keep_alive_interval(Duration::from_secs(config.keepalive_interval_secs))
            .keep_alive_timeout(Duration::from_secs(config.keepalive_timeout_secs))
            .keep_alive_while_idle(true);

        let channel = endpoint.connect_lazy();

        info!(endpoint = %config.endpoint, "Created import gateway channel");

        Ok(Self {
            inner: Grpc::new(channel),
        })
    }
}

#[async_trait]
impl ImportGateway for GrpcImportGateway {
    async fn importar_indice(
        &self,
        request: ImportarIndiceRequest,
    ) -> Result<ImportarIndiceResponse, GatewayError> {
        let mut grpc = self.inner.clone();
        grpc.ready().await?;

        let codec: ProstCodec<ImportarIndiceRequest, ImportarIndiceResponse> =
            ProstCodec::default();
        let path = PathAndQuery::from_static(IMPORTAR_INDICE_PATH);

        let response = grpc
            .unary(tonic::Request::new(request), path, codec)
            .await?;

        Ok(response.into_inner())
    }
}
