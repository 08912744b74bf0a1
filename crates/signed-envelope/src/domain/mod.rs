//! Domain Layer - Pure envelope logic
//!
//! This layer contains:
//! - Envelope, salt pair and open result types
//! - Fingerprint composition (salted digest or keyed MAC)
//! - Codec configuration
//!
//! RULES:
//! - No I/O operations
//! - No shared mutable state

pub mod config;
pub mod envelope;
pub mod fingerprint;

pub use config::{EnvelopeConfig, EnvelopeConfigBuilder, FingerprintMode, DEFAULT_MAX_ENVELOPE_LEN};
pub use envelope::{Envelope, Opened, Salts};
pub use fingerprint::SaltText;
