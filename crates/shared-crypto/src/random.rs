//! # Random Salts
//!
//! Salt material for callers that need a fresh prefix or suffix.

use rand::RngCore;

/// Generate `n` random bytes rendered as `2n` upper-case hex characters.
pub fn random_salt_hex(n: usize) -> String {
    let mut bytes = vec![0u8; n];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode_upper(bytes)
}
