//! Service Layer
//!
//! Contains the codec service that orchestrates domain logic and
//! implements the inbound port.

pub mod codec;

pub use codec::SignedEnvelopeCodec;
