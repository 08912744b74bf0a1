//! Constant-time comparison for fingerprints and envelopes.

use subtle::ConstantTimeEq;

/// Compare two strings without leaking the position of the first mismatch.
///
/// Only the length is allowed to short-circuit; it is public anyway, since
/// an envelope's length follows from its payload.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
