//! # Shared Crypto - Fingerprint Primitives
//!
//! ## Components
//!
//! | Module | Provides | Use Case |
//! |--------|----------|----------|
//! | `hashing` | MD5, SHA-1, SHA-2, BLAKE3, HMAC | Fingerprints + text length registry |
//! | `text` | Base64 (padded / unpadded / URL-friendly) | Byte <-> text transport |
//! | `compare` | `subtle` equality | Envelope comparison |
//! | `random` | Hex salts | Fresh salt material |
//!
//! ## Security Properties
//!
//! - **Fixed split point**: every algorithm's text length is a constant,
//!   so payload boundaries are found without scanning.
//! - **Constant-time comparison**: trust checks do not leak mismatch offsets.
//! - **Keyed mode**: salts can be used as HMAC / BLAKE3 key material instead
//!   of being concatenated into the hashed input.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compare;
pub mod errors;
pub mod hashing;
pub mod random;
pub mod text;

// Re-exports
pub use compare::constant_time_eq;
pub use errors::CryptoError;
pub use hashing::{
    FingerprintAlgorithm, B64_BLAKE3_LEN, B64_MD5_LEN, B64_SHA1_LEN, B64_SHA256_LEN,
    B64_SHA384_LEN, B64_SHA512_LEN,
};
pub use random::random_salt_hex;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
