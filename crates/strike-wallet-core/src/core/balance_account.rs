// crates/strike-wallet-core/src/core/balance_account.rs
// ============================================================================
// Module: Strike Wallet Balance Accounts
// Description: Balance account policy records and address derivation.
// Purpose: Hold per-account transfer policy, whitelist, and dApp settings.
// Dependencies: serde, crate::core::{identifiers, slots, time}
// ============================================================================

//! ## Overview
//! A balance account holds funds at an address derived from the wallet
//! address and the account guid hash. Transfers out of it follow the
//! account's own approver set, threshold, and timeout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::core::address_book::AddressBookEntry;
use crate::core::address_book::Signer;
use crate::core::hashing::sha256;
use crate::core::identifiers::Address;
use crate::core::identifiers::BalanceAccountGuidHash;
use crate::core::identifiers::BalanceAccountNameHash;
use crate::core::slots::SlotFlags;
use crate::core::time::duration_seconds;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Domain separator for balance account address derivation.
const BALANCE_ACCOUNT_ADDRESS_DOMAIN: &[u8] = b"strike-wallet/balance-account/v1";

// ============================================================================
// SECTION: Settings
// ============================================================================

/// On/off account setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanSetting {
    /// Setting disabled.
    #[default]
    Off,
    /// Setting enabled.
    On,
}

impl BooleanSetting {
    /// Returns true when the setting is on.
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

// ============================================================================
// SECTION: Balance Account
// ============================================================================

/// Balance account policy record.
///
/// # Invariants
/// - Every transfer approver and allowed destination references a filled
///   slot of the owning wallet.
/// - `1 <= approvals_required_for_transfer <= transfer_approvers.count_enabled()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAccount {
    /// Guid hash; unique within the wallet.
    pub guid_hash: BalanceAccountGuidHash,
    /// Display name hash.
    pub name_hash: BalanceAccountNameHash,
    /// Transfer approvals required.
    pub approvals_required_for_transfer: u8,
    /// Transfer approval window.
    #[serde(with = "duration_seconds")]
    pub approval_timeout_for_transfer: Duration,
    /// Signer slots allowed to approve transfers.
    pub transfer_approvers: SlotFlags<Signer>,
    /// Address book slots this account may transfer to.
    pub allowed_destinations: SlotFlags<AddressBookEntry>,
    /// Whether transfers are restricted to allowed destinations.
    pub whitelist_enabled: BooleanSetting,
    /// Whether dApp transactions are permitted.
    pub dapps_enabled: BooleanSetting,
    /// Set while a policy update for this account is pending.
    pub policy_update_locked: bool,
}

impl BalanceAccount {
    /// Returns true when the account restricts transfers to its whitelist.
    #[must_use]
    pub const fn is_whitelist_enabled(&self) -> bool {
        self.whitelist_enabled.is_on()
    }

    /// Returns true when dApp transactions are enabled.
    #[must_use]
    pub const fn are_dapps_enabled(&self) -> bool {
        self.dapps_enabled.is_on()
    }
}

/// Derives the ledger address holding a balance account's funds.
#[must_use]
pub fn derive_balance_account_address(
    wallet_address: &Address,
    guid_hash: &BalanceAccountGuidHash,
) -> Address {
    Address::new(sha256(&[
        BALANCE_ACCOUNT_ADDRESS_DOMAIN,
        wallet_address.as_bytes(),
        guid_hash.as_bytes(),
    ]))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
