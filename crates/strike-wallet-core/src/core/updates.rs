// crates/strike-wallet-core/src/core/updates.rs
// ============================================================================
// Module: Strike Wallet Update Payloads
// Description: Proposal payloads carried by instructions and multisig params.
// Purpose: Describe wallet and balance account changes awaiting approval.
// Dependencies: serde, crate::core::{address_book, balance_account, slots, time}
// ============================================================================

//! ## Overview
//! Update payloads appear twice: in the `Init*` instruction that proposes a
//! change and in the `Finalize*` instruction that applies it. Their canonical
//! JSON is part of the operation params hash, so field order and naming are
//! stable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::core::address_book::AddressBookEntry;
use crate::core::address_book::DAppBookEntry;
use crate::core::address_book::Signer;
use crate::core::balance_account::BooleanSetting;
use crate::core::identifiers::BalanceAccountGuidHash;
use crate::core::identifiers::BalanceAccountNameHash;
use crate::core::slots::SlotId;
use crate::core::time::duration_seconds;
use crate::core::time::duration_seconds_option;

// ============================================================================
// SECTION: Slot Entries
// ============================================================================

/// Signer slot and the signer expected in it.
pub type SignerSlot = (SlotId<Signer>, Signer);

/// Address book slot and the entry expected in it.
pub type AddressBookSlot = (SlotId<AddressBookEntry>, AddressBookEntry);

/// dApp book slot and the entry expected in it.
pub type DAppBookSlot = (SlotId<DAppBookEntry>, DAppBookEntry);

// ============================================================================
// SECTION: Wallet Updates
// ============================================================================

/// Configuration supplied when a wallet is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialWalletConfig {
    /// Config approvals required.
    pub approvals_required_for_config: u8,
    /// Config approval window.
    #[serde(with = "duration_seconds")]
    pub approval_timeout_for_config: Duration,
    /// Initial signers.
    pub signers: Vec<SignerSlot>,
    /// Signers enabled as config approvers.
    pub config_approvers: Vec<SignerSlot>,
    /// Initial address book.
    #[serde(default)]
    pub address_book: Vec<AddressBookSlot>,
}

/// Change to the wallet-level approval policy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WalletConfigPolicyUpdate {
    /// New config threshold, if changing.
    #[serde(default)]
    pub approvals_required_for_config: Option<u8>,
    /// New config approval window, if changing.
    #[serde(default, with = "duration_seconds_option")]
    pub approval_timeout_for_config: Option<Duration>,
    /// Signers to enable as config approvers.
    #[serde(default)]
    pub add_config_approvers: Vec<SignerSlot>,
    /// Signers to disable as config approvers.
    #[serde(default)]
    pub remove_config_approvers: Vec<SignerSlot>,
}

/// Kind of signer slot change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotUpdateType {
    /// Fill an empty slot.
    SetIfEmpty,
    /// Clear a filled slot.
    Clear,
}

/// Per-account whitelist change bundled with an address book update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAccountWhitelistUpdate {
    /// Balance account being changed.
    pub account_guid_hash: BalanceAccountGuidHash,
    /// Entries to allow as destinations.
    #[serde(default)]
    pub add_allowed_destinations: Vec<AddressBookSlot>,
    /// Entries to disallow as destinations.
    #[serde(default)]
    pub remove_allowed_destinations: Vec<AddressBookSlot>,
}

/// Change to the wallet address book and account whitelists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressBookUpdate {
    /// Entries to add.
    #[serde(default)]
    pub add_address_book_entries: Vec<AddressBookSlot>,
    /// Entries to remove.
    #[serde(default)]
    pub remove_address_book_entries: Vec<AddressBookSlot>,
    /// Whitelist changes applied alongside.
    #[serde(default)]
    pub balance_account_whitelist_updates: Vec<BalanceAccountWhitelistUpdate>,
}

/// Change to the wallet dApp book.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DAppBookUpdate {
    /// dApps to add.
    #[serde(default)]
    pub add_dapps: Vec<DAppBookSlot>,
    /// dApps to remove.
    #[serde(default)]
    pub remove_dapps: Vec<DAppBookSlot>,
}

// ============================================================================
// SECTION: Balance Account Updates
// ============================================================================

/// Parameters for a new balance account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAccountCreation {
    /// Display name hash.
    pub name_hash: BalanceAccountNameHash,
    /// Transfer approvals required.
    pub approvals_required_for_transfer: u8,
    /// Transfer approval window.
    #[serde(with = "duration_seconds")]
    pub approval_timeout_for_transfer: Duration,
    /// Signers enabled as transfer approvers.
    pub transfer_approvers: Vec<SignerSlot>,
    /// Whitelist setting.
    #[serde(default)]
    pub whitelist_enabled: BooleanSetting,
    /// dApp setting.
    #[serde(default)]
    pub dapps_enabled: BooleanSetting,
}

/// Change to a balance account's transfer policy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceAccountPolicyUpdate {
    /// New transfer threshold, if changing.
    #[serde(default)]
    pub approvals_required_for_transfer: Option<u8>,
    /// New transfer approval window, if changing.
    #[serde(default, with = "duration_seconds_option")]
    pub approval_timeout_for_transfer: Option<Duration>,
    /// Signers to enable as transfer approvers.
    #[serde(default)]
    pub add_transfer_approvers: Vec<SignerSlot>,
    /// Signers to disable as transfer approvers.
    #[serde(default)]
    pub remove_transfer_approvers: Vec<SignerSlot>,
}

/// Direction of a wrap or unwrap of the native balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapDirection {
    /// Native balance to wrapped-native token balance.
    Wrap,
    /// Wrapped-native token balance to native balance.
    Unwrap,
}
