//! Content digests for addressing and deduplication.
//!
//! A [`Digest`] is a deterministic SHA-256 hash of a serialized value,
//! rendered as 64 lowercase hex characters. Identical content always
//! produces the identical digest, so storing the same object twice never
//! duplicates it, and any reference can be verified against the content it
//! points at.
//!
//! JSON content is canonicalized by serde_json's default map representation:
//! object keys serialize in sorted order, so two semantically-equal values
//! hash identically regardless of construction order.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};

const DIGEST_HEX_LEN: usize = 64;

/// A content digest: opaque to callers, deterministic over content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Digest a JSON value.
    ///
    /// Pure and deterministic: the same value always yields the same digest.
    pub fn of_json(value: &serde_json::Value) -> Self {
        // serde_json's Value map is key-ordered, so this serialization is
        // canonical for equal values.
        let bytes = serde_json::to_vec(value).expect("JSON value serialization cannot fail");
        Self::of_bytes(&bytes)
    }

    /// Digest raw bytes (file content).
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Digest(hex::encode(hasher.finalize()))
    }

    /// Parse a digest string, validating shape.
    ///
    /// Accepts exactly 64 lowercase hex characters; anything else fails
    /// with [`Error::Format`].
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(Error::Format(format!(
                "digest must be {} hex chars, got {}",
                DIGEST_HEX_LEN,
                s.len()
            )));
        }
        if !s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
            return Err(Error::Format(format!(
                "digest contains non-hex characters: {}",
                s
            )));
        }
        Ok(Digest(s.to_string()))
    }

    /// The hex string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
