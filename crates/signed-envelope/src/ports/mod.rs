//! Ports Layer
//!
//! Defines the driving port callers use to seal and open envelopes. The
//! serializer and metrics sinks the service depends on are traits from
//! `shared-types` and [`crate::metrics`].

pub mod inbound;

pub use inbound::EnvelopeCodecApi;
