//! Client-side error types.
//!
//! This module provides [`ClientError`], the error type that flows through
//! the request pipeline. Every variant carries owned data so the error is
//! `Clone` and can be handed to interceptor failure handlers by value.

use std::time::Duration;

use fetchpipe_core::EnvelopeError;

/// Errors produced by a request pipeline.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The network call could not complete (connection refused, reset, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded per the declared response type.
    #[error("decode error: {0}")]
    Decode(String),

    /// A request or response transform failed.
    #[error("transform error: {0}")]
    Transform(String),

    /// Invalid configuration: unknown method or response type, bad header,
    /// unbuildable request.
    #[error("config error: {0}")]
    Config(String),

    /// The configured timeout elapsed before the response arrived.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// An interceptor refused the value flowing through it.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The request or response pack could not be built or read.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

impl ClientError {
    /// Create a rejection, for use inside interceptor handlers.
    pub fn rejected<S: Into<String>>(message: S) -> Self {
        ClientError::Rejected(message.into())
    }

    /// Whether the network call itself failed (including timeouts).
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Timeout(_))
    }

    /// Get the error message, if the variant carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ClientError::Transport(msg)
            | ClientError::Decode(msg)
            | ClientError::Transform(msg)
            | ClientError::Config(msg)
            | ClientError::Rejected(msg) => Some(msg),
            ClientError::Timeout(_) | ClientError::Envelope(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ClientError::Transport("connection refused".into()).to_string(),
            "transport error: connection refused"
        );
        assert_eq!(
            ClientError::Timeout(Duration::from_millis(50)).to_string(),
            "request timed out after 50ms"
        );
    }

    #[test]
    fn test_is_transport() {
        assert!(ClientError::Transport("reset".into()).is_transport());
        assert!(ClientError::Timeout(Duration::from_secs(1)).is_transport());
        assert!(!ClientError::Decode("bad json".into()).is_transport());
        assert!(!ClientError::rejected("nope").is_transport());
    }

    #[test]
    fn test_from_envelope_error() {
        let err: ClientError = EnvelopeError::ResourceNotJson("x".into()).into();
        assert!(matches!(err, ClientError::Envelope(EnvelopeError::ResourceNotJson(_))));
        assert!(err.message().is_none());
        assert_eq!(err.to_string(), "resource is not JSON: x");
    }

    #[test]
    fn test_message() {
        assert_eq!(ClientError::Config("bad".into()).message(), Some("bad"));
        assert_eq!(ClientError::rejected("stop").message(), Some("stop"));
    }
}
