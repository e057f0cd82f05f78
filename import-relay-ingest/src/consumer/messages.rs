//! Message types for the consumer.

/// A single raw message pulled from the request topic.
///
/// Owned by exactly one worker for the duration of its processing; no
/// cross-message sharing.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub payload: Vec<u8>,
}
