//! # Text Encoding
//!
//! Byte <-> printable text codec used for envelope payloads and fingerprints.
//!
//! - Standard base64 alphabet, canonical `=` padding, strict decoding.
//! - Fixed expansion: `n` bytes always encode to `4 * ceil(n / 3)` characters.
//!
//! ## URL-friendly form
//!
//! `+` and `/` are swapped for `-` and `_`, the trailing padding is dropped
//! and its length is appended as a single digit, and the whole string is
//! tagged with a `B64_` prefix:
//!
//! ```text
//! "This+isn/t+valid+B64=="  <->  "B64_This-isn_t-valid-B642"
//! ```

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;

use crate::CryptoError;

/// Prefix that marks the URL-friendly form.
pub const URL_SAFE_PREFIX: &str = "B64_";

/// Encode bytes as padded base64.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Encode bytes as base64 without padding.
pub fn encode_unpadded(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes)
}

/// Decode padded base64.
///
/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` for characters outside the
/// alphabet, missing or non-canonical padding, or non-zero trailing bits.
pub fn decode(text: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(text)
        .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))
}

/// Length of the padded encoding of `n` bytes.
pub const fn encoded_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}

/// Length of the unpadded encoding of `n` bytes: `ceil(4n / 3)`.
pub const fn unpadded_len(n: usize) -> usize {
    (4 * n).div_ceil(3)
}

/// Convert padded base64 into its URL-friendly form.
///
/// At most two trailing `=` count as padding; anything before them stays in
/// the body, so every input survives [`from_url_safe`] unchanged.
pub fn to_url_safe(b64: &str) -> String {
    let padding = b64.bytes().rev().take(2).take_while(|&c| c == b'=').count();
    let trimmed = &b64[..b64.len() - padding];

    let mut out = String::with_capacity(URL_SAFE_PREFIX.len() + trimmed.len() + 1);
    out.push_str(URL_SAFE_PREFIX);
    out.extend(trimmed.chars().map(|c| match c {
        '+' => '-',
        '/' => '_',
        other => other,
    }));
    out.push(char::from(b'0' + padding as u8));
    out
}

/// Convert the URL-friendly form back into padded base64.
///
/// # Errors
///
/// Returns `CryptoError::InvalidUrlForm` when the prefix is missing, the
/// padding digit is absent or out of range, or the body contains characters
/// that cannot come from [`to_url_safe`].
pub fn from_url_safe(url: &str) -> Result<String, CryptoError> {
    let body = url
        .strip_prefix(URL_SAFE_PREFIX)
        .ok_or_else(|| CryptoError::InvalidUrlForm(format!("missing {URL_SAFE_PREFIX} prefix")))?;

    let (body, digit) = match body.char_indices().last() {
        Some((idx, c)) => (&body[..idx], c),
        None => return Err(CryptoError::InvalidUrlForm("missing padding digit".into())),
    };
    let padding = match digit.to_digit(10) {
        Some(p) if p <= 2 => p as usize,
        _ => {
            return Err(CryptoError::InvalidUrlForm(format!(
                "invalid padding digit {digit:?}"
            )))
        }
    };
    if body.contains(['+', '/']) {
        return Err(CryptoError::InvalidUrlForm(
            "body contains characters outside the URL alphabet".into(),
        ));
    }

    let mut out = String::with_capacity(body.len() + padding);
    out.extend(body.chars().map(|c| match c {
        '-' => '+',
        '_' => '/',
        other => other,
    }));
    out.push_str(&"=".repeat(padding));
    Ok(out)
}
