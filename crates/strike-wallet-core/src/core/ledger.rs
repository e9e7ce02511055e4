// crates/strike-wallet-core/src/core/ledger.rs
// ============================================================================
// Module: Strike Wallet Ledger Records
// Description: Balance keys, balance changes, and ledger change sets.
// Purpose: Describe the writes one processed transaction makes to the ledger.
// Dependencies: serde, crate::core::{identifiers, multisig_op, wallet}
// ============================================================================

//! ## Overview
//! A [`LedgerChangeSet`] collects every write produced by one instruction.
//! Stores apply it atomically. Balances are keyed by owner address and an
//! optional token mint; `None` is the native balance.
//!
//! The change set also carries a [`LedgerReadSet`]: every store value the
//! instruction observed. Stores refuse to apply a change set whose reads no
//! longer match, so two instructions staged from the same snapshot cannot
//! both commit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::Address;
use crate::core::identifiers::OperationId;
use crate::core::multisig_op::DAppMultisigData;
use crate::core::multisig_op::MultisigOp;
use crate::core::wallet::Wallet;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Mint of the wrapped-native token used by wrap and unwrap.
pub const WRAPPED_NATIVE_MINT: Address = Address::new([
    6, 155, 136, 87, 254, 171, 129, 132, 251, 104, 127, 99, 70, 24, 192, 53, 218, 196, 57, 220, 26,
    235, 59, 85, 152, 160, 240, 0, 0, 0, 0, 1,
]);

// ============================================================================
// SECTION: Balances
// ============================================================================

/// Ledger balance key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BalanceKey {
    /// Balance owner address.
    pub owner: Address,
    /// Token mint; `None` for the native balance.
    pub mint: Option<Address>,
}

impl BalanceKey {
    /// Returns the native balance key for `owner`.
    #[must_use]
    pub const fn native(owner: Address) -> Self {
        Self {
            owner,
            mint: None,
        }
    }

    /// Returns the token balance key for `owner` and `mint`.
    #[must_use]
    pub const fn token(owner: Address, mint: Address) -> Self {
        Self {
            owner,
            mint: Some(mint),
        }
    }
}

/// Direction of a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceDirection {
    /// Balance grew.
    Increase,
    /// Balance shrank.
    Decrease,
}

/// Net change of one balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    /// Balance owner.
    pub owner: Address,
    /// Token mint; `None` for the native balance.
    pub mint: Option<Address>,
    /// Change direction.
    pub direction: BalanceDirection,
    /// Absolute change amount.
    pub amount: u64,
}

impl BalanceChange {
    /// Computes the change from `before` to `after`, or `None` when equal.
    #[must_use]
    pub const fn between(key: BalanceKey, before: u64, after: u64) -> Option<Self> {
        let (direction, amount) = if after > before {
            (BalanceDirection::Increase, after - before)
        } else if after < before {
            (BalanceDirection::Decrease, before - after)
        } else {
            return None;
        };
        Some(Self {
            owner: key.owner,
            mint: key.mint,
            direction,
            amount,
        })
    }
}

// ============================================================================
// SECTION: Change Set
// ============================================================================

/// Staged write for a keyed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordChange<T> {
    /// Insert or replace the record.
    Upsert(T),
    /// Remove the record.
    Delete,
}

impl<T> RecordChange<T> {
    /// Returns the staged record, or `None` when deleted.
    #[must_use]
    pub const fn as_record(&self) -> Option<&T> {
        match self {
            Self::Upsert(record) => Some(record),
            Self::Delete => None,
        }
    }
}

/// Store values observed while staging, keyed like the writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerReadSet {
    /// Wallets read, `None` when absent.
    pub wallets: BTreeMap<Address, Option<Wallet>>,
    /// Operation records read, `None` when absent.
    pub operations: BTreeMap<OperationId, Option<MultisigOp>>,
    /// Closed-operation checks made against the store.
    pub closed_operations: BTreeMap<OperationId, bool>,
    /// dApp transaction data read, `None` when absent.
    pub dapp_data: BTreeMap<OperationId, Option<DAppMultisigData>>,
    /// Balances read, zero when absent.
    pub balances: BTreeMap<BalanceKey, u64>,
}

impl LedgerReadSet {
    /// Returns true when nothing was read from the store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
            && self.operations.is_empty()
            && self.closed_operations.is_empty()
            && self.dapp_data.is_empty()
            && self.balances.is_empty()
    }
}

/// Writes produced by one processed instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerChangeSet {
    /// Wallet upserts keyed by wallet address.
    pub wallets: BTreeMap<Address, Wallet>,
    /// Operation upserts and deletions.
    pub operations: BTreeMap<OperationId, RecordChange<MultisigOp>>,
    /// dApp transaction data upserts and deletions.
    pub dapp_data: BTreeMap<OperationId, RecordChange<DAppMultisigData>>,
    /// Final balances keyed by owner and mint.
    pub balances: BTreeMap<BalanceKey, u64>,
    /// Store values the writes were computed from.
    pub reads: LedgerReadSet,
}

impl LedgerChangeSet {
    /// Returns true when the change set has no writes; reads are ignored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
            && self.operations.is_empty()
            && self.dapp_data.is_empty()
            && self.balances.is_empty()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
