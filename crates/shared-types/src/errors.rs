//! # Error Types
//!
//! Errors raised while turning a [`Value`](crate::Value) into bytes and back.

use thiserror::Error;

/// Errors from the value serializer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// NaN and infinities have no canonical encoding.
    #[error("Non-finite float cannot be serialized")]
    NonFiniteFloat,

    /// Value nests deeper than the configured limit.
    #[error("Nesting depth exceeds maximum of {max}")]
    DepthExceeded { max: usize },

    /// Encoded form is larger than the configured limit.
    #[error("Encoded size exceeds limit of {limit} bytes")]
    SizeLimitExceeded { limit: u64 },

    /// Low-level encoder failure.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Low-level decoder failure.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Token stream ended inside a sequence or mapping.
    #[error("Token stream truncated")]
    Truncated,

    /// Token stream continues after the root value, or is out of shape.
    #[error("Unexpected token at position {position}")]
    UnexpectedToken { position: usize },
}
