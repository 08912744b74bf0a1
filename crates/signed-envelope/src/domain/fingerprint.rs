//! Fingerprint composition
//!
//! Combines the text-encoded salts and payload into a fixed-length
//! fingerprint. Inputs are already text-encoded, so the characters fed to the
//! digest are exactly the characters that travel in the envelope.

use shared_crypto::{CryptoError, FingerprintAlgorithm};
use zeroize::Zeroizing;

use super::config::FingerprintMode;

/// Separates prefix and suffix inside an HMAC key. Never part of the base64
/// alphabet, so `("ab", "c")` and `("a", "bc")` yield different keys.
pub const KEY_SEPARATOR: char = '.';

/// Text-encoded salt pair, computed once per seal/open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltText {
    pub prefix: String,
    pub suffix: String,
}

/// Fingerprint text for `payload_text` under `salts`.
///
/// The result is always `algorithm.text_len()` characters.
pub fn compute(
    algorithm: FingerprintAlgorithm,
    mode: FingerprintMode,
    salts: &SaltText,
    payload_text: &str,
) -> Result<String, CryptoError> {
    match mode {
        FingerprintMode::Salted => {
            let mut input =
                String::with_capacity(salts.prefix.len() + payload_text.len() + salts.suffix.len());
            input.push_str(&salts.prefix);
            input.push_str(payload_text);
            input.push_str(&salts.suffix);
            Ok(algorithm.fingerprint_text(input.as_bytes()))
        }
        FingerprintMode::Hmac => {
            let mut key = Zeroizing::new(String::with_capacity(
                salts.prefix.len() + 1 + salts.suffix.len(),
            ));
            key.push_str(&salts.prefix);
            key.push(KEY_SEPARATOR);
            key.push_str(&salts.suffix);
            algorithm.keyed_fingerprint_text(key.as_bytes(), payload_text.as_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salts(prefix: &str, suffix: &str) -> SaltText {
        SaltText {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    #[test]
    fn test_salted_is_plain_concatenation() {
        let fp = compute(
            FingerprintAlgorithm::Sha1,
            FingerprintMode::Salted,
            &salts("QQ==", "Qg=="),
            "AAAA",
        )
        .unwrap();
        assert_eq!(fp, FingerprintAlgorithm::Sha1.fingerprint_text(b"QQ==AAAAQg=="));
    }

    #[test]
    fn test_fixed_length_every_mode() {
        for alg in FingerprintAlgorithm::ALL {
            for mode in [FingerprintMode::Salted, FingerprintMode::Hmac] {
                let fp = compute(alg, mode, &salts("x", "y"), "payload").unwrap();
                assert_eq!(fp.len(), alg.text_len(), "{alg}/{mode}");
            }
        }
    }

    #[test]
    fn test_hmac_key_boundary_matters() {
        let a = compute(
            FingerprintAlgorithm::Sha256,
            FingerprintMode::Hmac,
            &salts("ab", "c"),
            "p",
        )
        .unwrap();
        let b = compute(
            FingerprintAlgorithm::Sha256,
            FingerprintMode::Hmac,
            &salts("a", "bc"),
            "p",
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_modes_differ() {
        let s = salts("QQ==", "Qg==");
        let salted = compute(FingerprintAlgorithm::Sha1, FingerprintMode::Salted, &s, "AAAA").unwrap();
        let keyed = compute(FingerprintAlgorithm::Sha1, FingerprintMode::Hmac, &s, "AAAA").unwrap();
        assert_ne!(salted, keyed);
    }
}
