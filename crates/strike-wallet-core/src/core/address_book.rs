// crates/strike-wallet-core/src/core/address_book.rs
// ============================================================================
// Module: Strike Wallet Address Books
// Description: Signers, address book entries, and dApp book entries.
// Purpose: Define the entries stored in the wallet's slot tables.
// Dependencies: serde, crate::core::identifiers
// ============================================================================

//! ## Overview
//! Slot table entries. Entries compare by value, so a `(slot, entry)` pair in
//! an update names exactly one stored entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::Address;
use crate::core::identifiers::AddressBookEntryNameHash;
use crate::core::identifiers::DAppBookEntryNameHash;

// ============================================================================
// SECTION: Entries
// ============================================================================

/// Key that may initiate or approve wallet operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signer {
    /// Signer's ed25519 verifying key.
    pub key: Address,
}

impl Signer {
    /// Creates a signer from its key.
    #[must_use]
    pub const fn new(key: Address) -> Self {
        Self {
            key,
        }
    }
}

/// Named transfer destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressBookEntry {
    /// Destination address.
    pub address: Address,
    /// Hash of the destination's display name.
    pub name_hash: AddressBookEntryNameHash,
}

/// Named dApp program the wallet may interact with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DAppBookEntry {
    /// dApp program address.
    pub address: Address,
    /// Hash of the dApp's display name.
    pub name_hash: DAppBookEntryNameHash,
}
