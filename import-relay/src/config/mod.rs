//! Configuration and dependency wiring for the import relay.

mod dependencies;

pub use dependencies::Dependencies;
