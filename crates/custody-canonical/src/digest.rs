use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};

use crate::validation::ValidationError;

/// Supported digest algorithms for custody records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestAlg {
    /// SHA-256 (the only algorithm currently emitted).
    #[serde(rename = "sha-256")]
    Sha256,
}

/// Algorithm + bytes digest, encoded as base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    /// Digest algorithm (currently always `sha-256`).
    pub alg: DigestAlg,
    /// Base64URL (no padding) digest bytes.
    #[serde(rename = "b64")]
    pub b64: String,
}

impl Digest {
    /// Constructs a validated digest from its encoded form.
    pub fn new(alg: DigestAlg, b64: impl Into<String>) -> Result<Self, ValidationError> {
        let b64 = b64.into();
        let re = Regex::new(r"^[A-Za-z0-9_-]{43,44}$").expect("invalid regex");
        if !re.is_match(&b64) {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value: b64,
            });
        }
        Ok(Digest { alg, b64 })
    }

    /// Decodes the digest back into raw bytes (used for master aggregation).
    pub fn decode(&self) -> Result<Vec<u8>, ValidationError> {
        URL_SAFE_NO_PAD
            .decode(&self.b64)
            .map_err(|_| ValidationError::UndecodableDigest {
                value: self.b64.clone(),
            })
    }

    fn from_hash_bytes(bytes: &[u8]) -> Self {
        Digest {
            alg: DigestAlg::Sha256,
            b64: URL_SAFE_NO_PAD.encode(bytes),
        }
    }
}

/// Hashes `payload` under a domain separator.
///
/// Formula: `sha256(domain || payload)`. Separators keep the content and
/// forensic hash families disjoint even over identical input bytes.
pub fn sha256_with_domain(domain: &[u8], payload: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(payload);
    Digest::from_hash_bytes(&hasher.finalize())
}

/// Hashes an ordered sequence of byte strings under a domain separator.
///
/// Each part is length-prefixed with its big-endian `u32` byte count, so
/// the concatenated stream is prefix-free: no two distinct sequences can
/// produce the same input, which makes the result order- and
/// membership-sensitive.
pub fn sha256_chain<'a, I>(domain: &[u8], parts: I) -> Digest
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut hasher = Sha256::new();
    hasher.update(domain);
    for part in parts {
        hasher.update((part.len() as u32).to_be_bytes());
        hasher.update(part);
    }
    Digest::from_hash_bytes(&hasher.finalize())
}
