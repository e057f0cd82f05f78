//! # Import Relay Gateway
//!
//! The boundary to the remote import-index service. This crate defines
//! the wire messages for the `ImportarIndice` RPC, the abstract
//! [`ImportGateway`] trait consumed by the relay pipeline, and a
//! tonic-backed gRPC implementation.

pub mod config;
pub mod errors;
pub mod grpc;
pub mod interfaces;
pub mod proto;

pub use config::GatewayConfig;
pub use errors::GatewayError;
pub use grpc::GrpcImportGateway;
pub use interfaces::ImportGateway;
pub use proto::{
    FormDataItem, ImportacaoStatus, ImportarIndiceRequest, ImportarIndiceResponse, LegacyIndice,
};
