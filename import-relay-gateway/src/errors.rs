//! Gateway error types.
//!
//! Any error raised by the gateway call itself is infrastructure-level:
//! the remote service never answered with a business response. Business
//! failures travel in-band as `ImportacaoStatus::Erro`.

use thiserror::Error;

/// Errors raised by the import gateway call.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Failed to establish or use the channel to the remote service.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The RPC itself failed (timeout, unavailable, transport error).
    #[error("Call error: {0}")]
    CallError(String),
}

impl GatewayError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a call error.
    pub fn call(msg: impl Into<String>) -> Self {
        Self::CallError(msg.into())
    }
}

impl From<tonic::Status> for GatewayError {
    fn from(status: tonic::Status) -> Self {
        Self::CallError(format!("{}: {}", status.code(), status.message()))
    }
}

impl From<tonic::transport::Error> for GatewayError {
    fn from(err: tonic::transport::Error) -> Self {
        Self::ConnectionError(err.to_string())
    }
}
