// crates/strike-wallet-core/src/core/encoding.rs
// ============================================================================
// Module: Strike Wallet Encoding Helpers
// Description: Base64 helpers for binary payloads embedded in JSON.
// Purpose: Keep dApp instruction data and signatures readable in JSON records.
// Dependencies: base64, serde
// ============================================================================

//! ## Overview
//! Binary fields (dApp instruction data, ed25519 signatures, key files) use
//! standard base64 with padding.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Encodes bytes as standard base64.
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes standard base64 text.
///
/// # Errors
///
/// Returns [`base64::DecodeError`] when the input is not valid base64.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(text.trim())
}

/// Serializes a byte vector as a base64 string.
pub mod base64_bytes {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    /// Serializes bytes as base64.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode_base64(value))
    }

    /// Deserializes base64 into bytes.
    ///
    /// # Errors
    ///
    /// Returns a custom error when the text is not valid base64.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::decode_base64(&text).map_err(serde::de::Error::custom)
    }
}
