//! Error types for the signed envelope codec

use shared_crypto::CryptoError;
use shared_types::SerializationError;
use thiserror::Error;

/// Why an envelope could not even be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("envelope is {len} chars, shorter than the {min}-char fingerprint")]
    TooShort { len: usize, min: usize },

    #[error("envelope is {len} chars, longer than the {max}-char limit")]
    TooLong { len: usize, max: usize },

    #[error("payload is not valid text encoding")]
    InvalidEncoding,
}

/// Errors returned by seal and open.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Envelope is structurally impossible to parse.
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(MalformedReason),

    /// Envelope parsed but its fingerprint does not match, or its payload
    /// could not be decoded into a value.
    #[error("Untrusted envelope")]
    UntrustedEnvelope,

    /// Value (or salt) cannot be represented by the serializer.
    #[error("Unsupported value: {0}")]
    UnsupportedValue(SerializationError),

    /// Fingerprint primitive failed.
    #[error("Fingerprint error: {0}")]
    Crypto(#[from] CryptoError),

    /// Codec configuration rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EnvelopeError {
    /// True for the tamper/corruption outcome.
    pub fn is_untrusted(&self) -> bool {
        matches!(self, EnvelopeError::UntrustedEnvelope)
    }

    /// True when the envelope could not be parsed at all.
    pub fn is_malformed(&self) -> bool {
        matches!(self, EnvelopeError::MalformedEnvelope(_))
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_envelope_len {limit} must exceed the {min}-char fingerprint")]
    EnvelopeLimitTooSmall { limit: usize, min: usize },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}
