//! # Import Relay Ingest
//!
//! This crate provides the ingest components for consuming import
//! requests from Kafka and relaying them to the remote import service.
//!
//! ## Architecture
//!
//! The ingest follows a strictly forward flow:
//!
//! 1. **Consumer**: receives raw messages from Kafka and routes them to
//!    workers by partition
//! 2. **Decoder** and **Mapper**: parse the JSON payload and build the
//!    outbound RPC request
//! 3. **Classifier**: turns the dispatch result into a terminal outcome
//!    and the ack/publish/retry decision
//! 4. **Publisher**: emits failure envelopes to the failure topic
//! 5. **Orchestrator**: wires the consumer to a fixed pool of workers

pub mod classifier;
pub mod consumer;
pub mod decoder;
pub mod errors;
pub mod mapper;
pub mod metrics;
pub mod orchestrator;
pub mod publisher;
pub mod worker;

pub use errors::IngestError;
