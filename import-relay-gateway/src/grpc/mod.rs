//! gRPC implementation of the import gateway.

mod client;

pub use client::GrpcImportGateway;
