//! Abstract interfaces for the remote import service.

mod import_gateway;

pub use import_gateway::ImportGateway;
