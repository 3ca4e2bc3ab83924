//! Envelope error types.

/// Errors raised while building or reading a pack.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    /// The resource could not be serialized to JSON.
    #[error("failed to encode resource: {0}")]
    Encode(String),

    /// The pack itself is not valid JSON or misses required fields.
    #[error("failed to decode pack: {0}")]
    Decode(String),

    /// The pack decoded but its `resource` string is not JSON.
    #[error("resource is not JSON: {0}")]
    ResourceNotJson(String),
}
