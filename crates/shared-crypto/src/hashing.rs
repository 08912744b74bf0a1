//! # Fingerprints
//!
//! Digest functions used as tamper-evidence tags, plus the registry of their
//! text-encoded lengths.
//!
//! ## Text Length Registry
//!
//! A fingerprint travels as unpadded base64 at the front of an envelope. The
//! receiver has to find where the payload starts *before* computing any
//! digest, so every algorithm carries its text length as a constant:
//!
//! | Algorithm | Digest bytes | Text chars |
//! |-----------|--------------|------------|
//! | MD5       | 16           | 22         |
//! | SHA-1     | 20           | 27         |
//! | SHA-256   | 32           | 43         |
//! | SHA-384   | 48           | 64         |
//! | SHA-512   | 64           | 86         |
//! | BLAKE3    | 32           | 43         |

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

use crate::text;
use crate::CryptoError;

/// Text length of an MD5 fingerprint.
pub const B64_MD5_LEN: usize = 22;

/// Text length of a SHA-1 fingerprint.
pub const B64_SHA1_LEN: usize = 27;

/// Text length of a SHA-256 fingerprint.
pub const B64_SHA256_LEN: usize = 43;

/// Text length of a SHA-384 fingerprint.
pub const B64_SHA384_LEN: usize = 64;

/// Text length of a SHA-512 fingerprint.
pub const B64_SHA512_LEN: usize = 86;

/// Text length of a BLAKE3 fingerprint.
pub const B64_BLAKE3_LEN: usize = 43;

/// Context string for deriving BLAKE3 keys from salt material.
const BLAKE3_KEY_CONTEXT: &str = "signed-envelope 2013-07-28 fingerprint key";

/// Supported fingerprint algorithms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintAlgorithm {
    /// MD5 (128-bit). Legacy only.
    Md5,
    /// SHA-1 (160-bit).
    #[default]
    Sha1,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// BLAKE3 (256-bit output).
    Blake3,
}

impl FingerprintAlgorithm {
    /// All algorithms, weakest first.
    pub const ALL: [FingerprintAlgorithm; 6] = [
        FingerprintAlgorithm::Md5,
        FingerprintAlgorithm::Sha1,
        FingerprintAlgorithm::Sha256,
        FingerprintAlgorithm::Sha384,
        FingerprintAlgorithm::Sha512,
        FingerprintAlgorithm::Blake3,
    ];

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            FingerprintAlgorithm::Md5 => "md5",
            FingerprintAlgorithm::Sha1 => "sha1",
            FingerprintAlgorithm::Sha256 => "sha256",
            FingerprintAlgorithm::Sha384 => "sha384",
            FingerprintAlgorithm::Sha512 => "sha512",
            FingerprintAlgorithm::Blake3 => "blake3",
        }
    }

    /// Raw digest length in bytes.
    pub const fn digest_len(self) -> usize {
        match self {
            FingerprintAlgorithm::Md5 => 16,
            FingerprintAlgorithm::Sha1 => 20,
            FingerprintAlgorithm::Sha256 => 32,
            FingerprintAlgorithm::Sha384 => 48,
            FingerprintAlgorithm::Sha512 => 64,
            FingerprintAlgorithm::Blake3 => 32,
        }
    }

    /// Length of the text fingerprint. Known without hashing anything.
    pub const fn text_len(self) -> usize {
        match self {
            FingerprintAlgorithm::Md5 => B64_MD5_LEN,
            FingerprintAlgorithm::Sha1 => B64_SHA1_LEN,
            FingerprintAlgorithm::Sha256 => B64_SHA256_LEN,
            FingerprintAlgorithm::Sha384 => B64_SHA384_LEN,
            FingerprintAlgorithm::Sha512 => B64_SHA512_LEN,
            FingerprintAlgorithm::Blake3 => B64_BLAKE3_LEN,
        }
    }

    /// Raw digest of `input`.
    pub fn digest(self, input: &[u8]) -> Vec<u8> {
        match self {
            FingerprintAlgorithm::Md5 => Md5::digest(input).to_vec(),
            FingerprintAlgorithm::Sha1 => Sha1::digest(input).to_vec(),
            FingerprintAlgorithm::Sha256 => Sha256::digest(input).to_vec(),
            FingerprintAlgorithm::Sha384 => Sha384::digest(input).to_vec(),
            FingerprintAlgorithm::Sha512 => Sha512::digest(input).to_vec(),
            FingerprintAlgorithm::Blake3 => blake3::hash(input).as_bytes().to_vec(),
        }
    }

    /// Keyed digest of `input`.
    ///
    /// HMAC for the MD5/SHA family. BLAKE3 uses its native keyed mode with a
    /// 32-byte key derived from `key`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` if the MAC rejects the key.
    pub fn keyed_digest(self, key: &[u8], input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            FingerprintAlgorithm::Md5 => hmac_digest::<Hmac<Md5>>(key, input),
            FingerprintAlgorithm::Sha1 => hmac_digest::<Hmac<Sha1>>(key, input),
            FingerprintAlgorithm::Sha256 => hmac_digest::<Hmac<Sha256>>(key, input),
            FingerprintAlgorithm::Sha384 => hmac_digest::<Hmac<Sha384>>(key, input),
            FingerprintAlgorithm::Sha512 => hmac_digest::<Hmac<Sha512>>(key, input),
            FingerprintAlgorithm::Blake3 => {
                let derived = Zeroizing::new(blake3::derive_key(BLAKE3_KEY_CONTEXT, key));
                Ok(blake3::keyed_hash(&derived, input).as_bytes().to_vec())
            }
        }
    }

    /// Text fingerprint of `input`, exactly [`text_len`](Self::text_len) long.
    pub fn fingerprint_text(self, input: &[u8]) -> String {
        self.to_text(&self.digest(input))
    }

    /// Keyed text fingerprint of `input`, exactly [`text_len`](Self::text_len) long.
    ///
    /// # Errors
    ///
    /// See [`keyed_digest`](Self::keyed_digest).
    pub fn keyed_fingerprint_text(self, key: &[u8], input: &[u8]) -> Result<String, CryptoError> {
        Ok(self.to_text(&self.keyed_digest(key, input)?))
    }

    fn to_text(self, digest: &[u8]) -> String {
        let mut out = text::encode_unpadded(digest);
        out.truncate(self.text_len());
        out
    }
}

impl fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FingerprintAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "");
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == wanted)
            .ok_or_else(|| CryptoError::UnknownAlgorithm(s.to_string()))
    }
}

fn hmac_digest<M>(key: &[u8], input: &[u8]) -> Result<Vec<u8>, CryptoError>
where
    M: Mac + KeyInit,
{
    let mut mac =
        <M as KeyInit>::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
    mac.update(input);
    Ok(mac.finalize().into_bytes().to_vec())
}
