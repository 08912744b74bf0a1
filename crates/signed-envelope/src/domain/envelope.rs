//! Envelope, salt pair and open result
//!
//! An envelope is `fingerprint_text || payload_text`. The fingerprint segment
//! has a fixed length per algorithm, so no delimiter is stored.

use serde::{Deserialize, Serialize};
use shared_crypto::{text, CryptoError};
use shared_types::Value;
use std::fmt;

/// Opaque sealed string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope(String);

impl Envelope {
    pub(crate) fn from_parts(fingerprint_text: String, payload_text: &str) -> Self {
        let mut inner = fingerprint_text;
        inner.push_str(payload_text);
        Self(inner)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Length in characters (the envelope alphabet is ASCII).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fingerprint and payload segments for a given fingerprint length.
    pub fn parts(&self, fingerprint_len: usize) -> Option<(&str, &str)> {
        split(&self.0, fingerprint_len)
    }

    /// URL-friendly form for query strings and paths.
    pub fn to_url_safe(&self) -> String {
        text::to_url_safe(&self.0)
    }

    /// Parse the URL-friendly form back into an envelope.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidUrlForm` if `url` was not produced by
    /// [`Envelope::to_url_safe`].
    pub fn from_url_safe(url: &str) -> Result<Self, CryptoError> {
        text::from_url_safe(url).map(Self)
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Envelope {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Envelope {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Envelope {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Envelopes nest as plain text.
impl From<Envelope> for Value {
    fn from(envelope: Envelope) -> Self {
        Value::Str(envelope.0)
    }
}

/// Split at the fixed fingerprint length.
///
/// `None` when the text is shorter than the fingerprint or the split point
/// is not a character boundary (only possible for non-ASCII input, which no
/// sealed envelope contains).
pub fn split(envelope: &str, fingerprint_len: usize) -> Option<(&str, &str)> {
    if envelope.len() < fingerprint_len || !envelope.is_char_boundary(fingerprint_len) {
        return None;
    }
    Some(envelope.split_at(fingerprint_len))
}

/// Salt pair mixed into the fingerprint. Never stored in the envelope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Salts {
    /// Inserted before the payload.
    pub prefix: Value,
    /// Inserted after the payload.
    pub suffix: Value,
}

impl Salts {
    pub fn new(prefix: impl Into<Value>, suffix: impl Into<Value>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Both salts null.
    pub fn none() -> Self {
        Self::default()
    }

    /// Same salts with prefix and suffix exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            prefix: self.suffix.clone(),
            suffix: self.prefix.clone(),
        }
    }
}

/// Result of opening an envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct Opened {
    /// Recovered value.
    pub value: Value,
    /// Whether the recomputed envelope matched the received one.
    pub trusted: bool,
}

impl Opened {
    /// The value, only if trusted.
    pub fn into_trusted(self) -> Option<Value> {
        self.trusted.then_some(self.value)
    }
}
