//! # Signed Envelope
//!
//! Tamper-evident envelopes for values that round-trip through an untrusted
//! party: cookies, URL parameters, hidden form fields, header values.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `Envelope`: Opaque `fingerprint_text || payload_text` string
//!   - `Salts`: Caller-held prefix/suffix mixed into the fingerprint
//!   - `EnvelopeConfig`: Algorithm, mode and trust policy with validation
//!   - `EnvelopeConfigBuilder`: Fluent builder for configuration
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `EnvelopeCodecApi`: Driving port (inbound API)
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `SignedEnvelopeCodec`: Implements `EnvelopeCodecApi`
//!
//! - **Facade** (`signed_data`): `SignedData` keeps salts plus the last
//!   sealed or opened data
//!
//! ## Wire Format
//!
//! ```text
//! envelope     = fingerprint_text payload_text
//! payload_text = base64(serialize(value))
//! fingerprint  = digest(base64(serialize(prefix)) payload_text base64(serialize(suffix)))
//! ```
//!
//! The fingerprint segment has a fixed length per algorithm (27 chars for
//! SHA-1), so the payload is located without a delimiter or a scan.
//!
//! ## Invariants
//!
//! - **Round-trip**: `open(seal(v, p, s), p, s) == (v, trusted)`
//! - **Tamper detection**: any changed character fails the trust check
//! - **No oracle**: an undecodable payload and a forged fingerprint report
//!   the same `UntrustedEnvelope` error
//!
//! ## Usage Example
//!
//! ```ignore
//! use signed_envelope::{EnvelopeCodecApi, EnvelopeConfig, Salts, SignedEnvelopeCodec};
//! use shared_types::Value;
//!
//! let codec = SignedEnvelopeCodec::new(EnvelopeConfig::default())?;
//! let salts = Salts::new("A", "B");
//!
//! let envelope = codec.seal(&Value::Int(10), &salts)?;
//! let opened = codec.open(envelope.as_str(), &salts)?;
//! assert_eq!(opened.value, Value::Int(10));
//! assert!(opened.trusted);
//! ```

#![warn(clippy::all)]

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod signed_data;

// Re-exports
pub use domain::{
    Envelope, EnvelopeConfig, EnvelopeConfigBuilder, FingerprintMode, Opened, Salts,
    DEFAULT_MAX_ENVELOPE_LEN,
};
pub use error::{ConfigError, EnvelopeError, MalformedReason};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics, OpenOutcome};
pub use ports::EnvelopeCodecApi;
pub use service::SignedEnvelopeCodec;
pub use signed_data::SignedData;

pub use shared_crypto::FingerprintAlgorithm;
pub use shared_types::Value;
