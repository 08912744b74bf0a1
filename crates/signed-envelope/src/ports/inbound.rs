//! Inbound Ports (Driving Ports)
//!
//! The API that callers use to seal values into envelopes and to open
//! envelopes received from untrusted parties.

use shared_types::Value;

use crate::domain::{Envelope, Opened, Salts};
use crate::error::EnvelopeError;

/// Primary envelope codec API (Driving Port)
pub trait EnvelopeCodecApi: Send + Sync {
    /// Seal a value under a salt pair
    ///
    /// # Returns
    /// `fingerprint_text || payload_text`. Deterministic for a given value,
    /// salt pair and configuration.
    ///
    /// # Errors
    /// `UnsupportedValue` when the value or a salt cannot be serialized, or
    /// when the envelope would exceed the configured maximum length.
    fn seal(&self, value: &Value, salts: &Salts) -> Result<Envelope, EnvelopeError>;

    /// Open an envelope under a salt pair
    ///
    /// # Errors
    /// - `MalformedEnvelope` if the envelope is too short, too long, or its
    ///   payload segment is not valid text encoding
    /// - `UntrustedEnvelope` if the fingerprint does not match or the payload
    ///   cannot be decoded into a value, and the codec is strict. A permissive
    ///   codec returns `trusted: false` instead, with `Value::Null` for an
    ///   undecodable payload.
    fn open(&self, envelope: &str, salts: &Salts) -> Result<Opened, EnvelopeError>;

    /// Fixed length of the fingerprint segment
    fn fingerprint_text_len(&self) -> usize;
}
