//! Crypto error types.

use thiserror::Error;

/// Errors from fingerprinting and text encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Text is not valid base64 for the expected alphabet and padding.
    #[error("Invalid text encoding: {0}")]
    InvalidEncoding(String),

    /// URL-friendly form is missing its prefix or padding digit.
    #[error("Invalid URL-safe form: {0}")]
    InvalidUrlForm(String),

    /// Fingerprint algorithm name not recognised.
    #[error("Unknown fingerprint algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Key material rejected by the MAC.
    #[error("Invalid key length: {0}")]
    InvalidKeyLength(usize),
}
