//! # Import Relay Shared
//!
//! Wire-facing data types shared across the import relay crates:
//! the inbound import-request payload consumed from Kafka and the
//! failure envelope published to the failure topic.

pub mod envelope;
pub mod payload;

pub use envelope::{FailureEnvelope, UNSPECIFIED_FAILURE_MESSAGE};
pub use payload::{FormFieldPayload, ImportRequestPayload, LegacyIndexPayload};
