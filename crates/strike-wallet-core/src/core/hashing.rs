// crates/strike-wallet-core/src/core/hashing.rs
// ============================================================================
// Module: Strike Wallet Canonical Hashing
// Description: RFC 8785 JSON canonicalization and content hashing utilities.
// Purpose: Provide deterministic hashes for operation params, snapshots, and signatures.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Strike Wallet hashes all canonical JSON using RFC 8785 (JCS) so that the
//! params hash an approver signs is identical on every host. Binary payloads
//! are hashed directly over raw bytes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Hash Algorithm
// ============================================================================

/// Supported hash algorithms for Strike Wallet records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256 hashing.
    Sha256,
}

/// Default hash algorithm for Strike Wallet.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

// ============================================================================
// SECTION: Hash Digest
// ============================================================================

/// Deterministic content hash representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDigest {
    /// Hash algorithm identifier.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex-encoded digest bytes.
    pub value: String,
}

impl HashDigest {
    /// Creates a new digest from raw bytes.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            value: hex_encode(bytes),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when computing canonical hashes.
#[derive(Debug, Error)]
pub enum HashError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
    /// Canonical JSON exceeded the caller's size limit.
    #[error("canonical json exceeds size limit: {actual} bytes (max {limit})")]
    SizeLimitExceeded {
        /// Maximum allowed bytes.
        limit: usize,
        /// Actual canonical size in bytes.
        actual: usize,
    },
}

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Returns canonical JSON bytes for a serializable value using RFC 8785.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

/// Returns canonical JSON bytes, failing when the output exceeds `max_bytes`.
///
/// # Errors
///
/// Returns [`HashError`] when serialization fails or the limit is exceeded.
pub fn canonical_json_bytes_with_limit<T: Serialize + ?Sized>(
    value: &T,
    max_bytes: usize,
) -> Result<Vec<u8>, HashError> {
    let bytes = canonical_json_bytes(value)?;
    if bytes.len() > max_bytes {
        return Err(HashError::SizeLimitExceeded {
            limit: max_bytes,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

/// Hashes canonical JSON using the provided algorithm.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn hash_canonical_json<T: Serialize + ?Sized>(
    algorithm: HashAlgorithm,
    value: &T,
) -> Result<HashDigest, HashError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(hash_bytes(algorithm, &bytes))
}

/// Hashes raw bytes using the provided algorithm.
#[must_use]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> HashDigest {
    match algorithm {
        HashAlgorithm::Sha256 => HashDigest::new(HashAlgorithm::Sha256, &sha256(&[bytes])),
    }
}

/// Returns the raw SHA-256 digest over the concatenation of `parts`.
#[must_use]
pub fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Returns the raw SHA-256 digest of a value's canonical JSON.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn sha256_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<[u8; 32], HashError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(sha256(&[&bytes]))
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

/// Decodes a hex string (either case) into exactly `N` bytes.
///
/// Returns `None` when the input has the wrong length or a non-hex digit.
#[must_use]
pub fn hex_decode_array<const N: usize>(text: &str) -> Option<[u8; N]> {
    let raw = text.as_bytes();
    if raw.len() != N * 2 {
        return None;
    }
    let mut out = [0u8; N];
    for (index, pair) in raw.chunks_exact(2).enumerate() {
        let high = hex_value(pair[0])?;
        let low = hex_value(pair[1])?;
        out[index] = (high << 4) | low;
    }
    Some(out)
}

/// Returns the numeric value of a single hex digit.
const fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::*;

    #[test]
    fn hex_roundtrip_preserves_bytes() {
        let bytes: [u8; 4] = [0x00, 0x7f, 0xab, 0xff];
        let encoded = hex_encode(&bytes);
        assert_eq!(encoded, "007fabff");
        assert_eq!(hex_decode_array::<4>(&encoded), Some(bytes));
        assert_eq!(hex_decode_array::<4>("007FABFF"), Some(bytes));
    }

    #[test]
    fn hex_decode_rejects_bad_input() {
        assert_eq!(hex_decode_array::<2>("abc"), None);
        assert_eq!(hex_decode_array::<2>("zz00"), None);
        assert_eq!(hex_decode_array::<2>("000000"), None);
    }

    #[test]
    fn canonical_hash_ignores_key_order() {
        let a = serde_json::json!({"b": 1, "a": [1, 2]});
        let b = serde_json::json!({"a": [1, 2], "b": 1});
        assert_eq!(
            hash_canonical_json(DEFAULT_HASH_ALGORITHM, &a).unwrap(),
            hash_canonical_json(DEFAULT_HASH_ALGORITHM, &b).unwrap()
        );
    }

    #[test]
    fn size_limit_is_enforced() {
        let value = serde_json::json!({"payload": "x".repeat(64)});
        let err = canonical_json_bytes_with_limit(&value, 16).unwrap_err();
        assert!(matches!(err, HashError::SizeLimitExceeded { limit: 16, .. }));
    }
}
