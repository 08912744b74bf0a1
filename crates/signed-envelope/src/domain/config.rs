//! Codec configuration and validation
//!
//! The untrusted-data policy lives here, on the codec instance, rather than
//! in process-wide state. Two codecs with different policies can run side by
//! side on different threads.
//!
//! # Example
//!
//! ```ignore
//! use signed_envelope::domain::EnvelopeConfigBuilder;
//!
//! let config = EnvelopeConfigBuilder::new()
//!     .algorithm(FingerprintAlgorithm::Sha256)
//!     .allow_untrusted_data(true)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};
use shared_crypto::FingerprintAlgorithm;
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::ConfigError;

/// Default upper bound on accepted envelope length (2 MiB of text).
pub const DEFAULT_MAX_ENVELOPE_LEN: usize = 2 * 1024 * 1024;

/// How salts enter the fingerprint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintMode {
    /// `digest(prefix_text || payload_text || suffix_text)`.
    #[default]
    Salted,
    /// `hmac(key = prefix_text "." suffix_text, message = payload_text)`.
    Hmac,
}

impl fmt::Display for FingerprintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FingerprintMode::Salted => f.write_str("salted"),
            FingerprintMode::Hmac => f.write_str("hmac"),
        }
    }
}

impl FromStr for FingerprintMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "salted" => Ok(FingerprintMode::Salted),
            "hmac" => Ok(FingerprintMode::Hmac),
            _ => Err(ConfigError::InvalidValue {
                key: "mode".into(),
                value: s.to_string(),
            }),
        }
    }
}

/// Envelope codec configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Fingerprint algorithm. Fixes the split point of every envelope.
    pub algorithm: FingerprintAlgorithm,
    /// How salts are combined with the payload.
    pub mode: FingerprintMode,
    /// Return `trusted = false` instead of failing on a mismatch.
    pub allow_untrusted_data: bool,
    /// Longest envelope `open` will look at.
    pub max_envelope_len: usize,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            algorithm: FingerprintAlgorithm::Sha1,
            mode: FingerprintMode::Salted,
            allow_untrusted_data: false,
            max_envelope_len: DEFAULT_MAX_ENVELOPE_LEN,
        }
    }
}

impl EnvelopeConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = self.algorithm.text_len();
        if self.max_envelope_len <= min {
            return Err(ConfigError::EnvelopeLimitTooSmall {
                limit: self.max_envelope_len,
                min,
            });
        }
        Ok(())
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ENVELOPE_ALGORITHM`: md5, sha1, sha256, sha384, sha512, blake3 (default: sha1)
    /// - `ENVELOPE_MODE`: salted or hmac (default: salted)
    /// - `ENVELOPE_ALLOW_UNTRUSTED`: true/1 to return untrusted data (default: false)
    /// - `ENVELOPE_MAX_LEN`: maximum envelope length in chars (default: 2 MiB)
    ///
    /// Unparsable values are logged and replaced by the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            algorithm: parse_env("ENVELOPE_ALGORITHM").unwrap_or(defaults.algorithm),
            mode: parse_env("ENVELOPE_MODE").unwrap_or(defaults.mode),
            allow_untrusted_data: env::var("ENVELOPE_ALLOW_UNTRUSTED")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.allow_untrusted_data),
            max_envelope_len: parse_env("ENVELOPE_MAX_LEN").unwrap_or(defaults.max_envelope_len),
        }
    }

    /// Builder-style method to set the algorithm
    pub fn with_algorithm(mut self, algorithm: FingerprintAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Builder-style method to set the mode
    pub fn with_mode(mut self, mode: FingerprintMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder-style method to set the untrusted-data policy
    pub fn with_allow_untrusted_data(mut self, allow: bool) -> Self {
        self.allow_untrusted_data = allow;
        self
    }
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment value");
            None
        }
    }
}

/// Builder for EnvelopeConfig with validation
#[derive(Clone, Debug, Default)]
pub struct EnvelopeConfigBuilder {
    config: EnvelopeConfig,
}

impl EnvelopeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn algorithm(mut self, algorithm: FingerprintAlgorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    pub fn mode(mut self, mode: FingerprintMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn allow_untrusted_data(mut self, allow: bool) -> Self {
        self.config.allow_untrusted_data = allow;
        self
    }

    pub fn max_envelope_len(mut self, len: usize) -> Self {
        self.config.max_envelope_len = len;
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<EnvelopeConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
