//! # Shared Types Crate
//!
//! The value domain carried inside signed envelopes and the serializer that
//! turns it into bytes.
//!
//! ## Design Principles
//!
//! - **Closed Domain**: `Value` is a tagged enum (null, bool, int, float,
//!   string, sequence, mapping). Nothing else crosses the serializer boundary.
//! - **Determinism**: one logical value always serializes to the same bytes,
//!   which is what lets a receiver recompute a fingerprint and compare.
//! - **Ordered Mappings**: key order is part of a value's identity.

pub mod errors;
pub mod serializer;
pub mod value;

pub use errors::SerializationError;
pub use serializer::{TokenSerializer, ValueSerializer, DEFAULT_MAX_BYTES, DEFAULT_MAX_DEPTH};
pub use value::{Value, ValueKind};
