// crates/strike-wallet-core/src/core/identifiers.rs
// ============================================================================
// Module: Strike Wallet Identifiers
// Description: Addresses, 32-byte hash newtypes, and operation identifiers.
// Purpose: Provide strongly typed, serializable IDs with stable hex or string forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every 32-byte value in Strike Wallet (addresses, guid hashes, name hashes,
//! params hashes) is a distinct newtype that serializes as lowercase hex.
//! Keeping them distinct prevents a name hash from being passed where a guid
//! hash is expected. [`OperationId`] is an opaque string naming a pending
//! multisig operation record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use thiserror::Error;

use crate::core::hashing::hex_decode_array;
use crate::core::hashing::hex_encode;

// ============================================================================
// SECTION: Parse Errors
// ============================================================================

/// Errors raised when parsing a 32-byte identifier from hex.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} must be 64 hex characters")]
pub struct IdentifierParseError {
    /// Name of the identifier type that failed to parse.
    pub kind: &'static str,
}

// ============================================================================
// SECTION: 32-Byte Newtypes
// ============================================================================

/// Declares a 32-byte newtype with hex display and serde support.
macro_rules! bytes32_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name([u8; 32]);

        impl $name {
            /// Length of the value in bytes.
            pub const LEN: usize = 32;

            /// Creates a value from raw bytes.
            #[must_use]
            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Returns the all-zero value.
            #[must_use]
            pub const fn zero() -> Self {
                Self([0; 32])
            }

            /// Returns true when every byte is zero.
            #[must_use]
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|byte| *byte == 0)
            }

            /// Returns the raw bytes.
            #[must_use]
            pub const fn to_bytes(self) -> [u8; 32] {
                self.0
            }

            /// Returns a reference to the raw bytes.
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex_encode(&self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex_encode(&self.0))
            }
        }

        impl FromStr for $name {
            type Err = IdentifierParseError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                hex_decode_array::<32>(text.trim()).map(Self).ok_or(IdentifierParseError {
                    kind: stringify!($name),
                })
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&hex_encode(&self.0))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

bytes32_newtype! {
    /// Ledger address: an ed25519 verifying key or a derived account address.
    Address
}

bytes32_newtype! {
    /// Hash of the wallet guid assigned at wallet creation.
    WalletGuidHash
}

bytes32_newtype! {
    /// Hash of a balance account guid. Unique within a wallet.
    BalanceAccountGuidHash
}

bytes32_newtype! {
    /// Hash of a balance account display name.
    BalanceAccountNameHash
}

bytes32_newtype! {
    /// Hash of an address book entry display name.
    AddressBookEntryNameHash
}

bytes32_newtype! {
    /// Hash of a dApp book entry display name.
    DAppBookEntryNameHash
}

bytes32_newtype! {
    /// SHA-256 of the canonical JSON of a multisig operation's params.
    ParamsHash
}

// ============================================================================
// SECTION: Operation Identifier
// ============================================================================

/// Identifier of a pending multisig operation record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    /// Creates a new operation identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for OperationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for OperationId {
    fn from(value: String) -> Self {
        Self::new(value)
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
    fn address_serializes_as_hex() {
        let address = Address::new([0xab; 32]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }

    #[test]
    fn parse_rejects_short_hex() {
        let err = "abcd".parse::<ParamsHash>().unwrap_err();
        assert_eq!(err.kind, "ParamsHash");
    }

    #[test]
    fn zero_name_hash_is_empty() {
        assert!(BalanceAccountNameHash::zero().is_zero());
        assert!(!BalanceAccountNameHash::new([1; 32]).is_zero());
    }
}
