// crates/strike-wallet-core/src/core/wallet.rs
// ============================================================================
// Module: Strike Wallet State
// Description: Wallet record, policy checks, and policy mutation.
// Purpose: Enforce wallet invariants for every proposed and finalized change.
// Dependencies: serde, crate::core::{address_book, balance_account, slots, updates}
// ============================================================================

//! ## Overview
//! [`Wallet`] is the root record of a program-based wallet: its signers, the
//! config approval policy, the address and dApp books, and its balance
//! accounts. Every mutating method has a `validate_*` twin that applies the
//! change to a clone, so a proposal is rejected at init time when it could
//! never be finalized.
//!
//! Security posture: approver sets reference signer slots and whitelists
//! reference address book slots; a slot cannot be cleared while referenced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::core::address_book::AddressBookEntry;
use crate::core::address_book::DAppBookEntry;
use crate::core::address_book::Signer;
use crate::core::balance_account::BalanceAccount;
use crate::core::balance_account::BooleanSetting;
use crate::core::error::WalletError;
use crate::core::identifiers::Address;
use crate::core::identifiers::AddressBookEntryNameHash;
use crate::core::identifiers::BalanceAccountGuidHash;
use crate::core::identifiers::BalanceAccountNameHash;
use crate::core::identifiers::WalletGuidHash;
use crate::core::slots::SlotFlags;
use crate::core::slots::SlotId;
use crate::core::slots::Slots;
use crate::core::time::duration_seconds;
use crate::core::time::is_valid_approval_timeout;
use crate::core::updates::AddressBookSlot;
use crate::core::updates::AddressBookUpdate;
use crate::core::updates::BalanceAccountCreation;
use crate::core::updates::BalanceAccountPolicyUpdate;
use crate::core::updates::DAppBookUpdate;
use crate::core::updates::InitialWalletConfig;
use crate::core::updates::SignerSlot;
use crate::core::updates::SlotUpdateType;
use crate::core::updates::WalletConfigPolicyUpdate;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Current wallet record version.
pub const WALLET_VERSION: u32 = 1;

/// Signer slot table.
pub type Signers = Slots<Signer, { Wallet::MAX_SIGNERS }>;

/// Address book slot table.
pub type AddressBook = Slots<AddressBookEntry, { Wallet::MAX_ADDRESS_BOOK_ENTRIES }>;

/// dApp book slot table.
pub type DAppBook = Slots<DAppBookEntry, { Wallet::MAX_DAPP_BOOK_ENTRIES }>;

/// Program-based multi-approver wallet.
///
/// # Invariants
/// - Config and transfer approvers reference filled signer slots.
/// - Allowed destinations reference filled address book slots.
/// - Approval thresholds lie in `1..=approver count`; timeouts lie within
///   the allowed approval window.
/// - Balance account guid hashes are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Set once the wallet has been created.
    pub is_initialized: bool,
    /// Record version.
    pub version: u32,
    /// Address credited when the wallet record is closed.
    pub rent_return: Address,
    /// Wallet guid hash.
    pub wallet_guid_hash: WalletGuidHash,
    /// Signer slots.
    pub signers: Signers,
    /// Non-approving key allowed to initiate proposals.
    pub assistant: Signer,
    /// Address book slots.
    pub address_book: AddressBook,
    /// Config approvals required.
    pub approvals_required_for_config: u8,
    /// Config approval window.
    #[serde(with = "duration_seconds")]
    pub approval_timeout_for_config: Duration,
    /// Signer slots allowed to approve config changes.
    pub config_approvers: SlotFlags<Signer>,
    /// Balance accounts.
    pub balance_accounts: Vec<BalanceAccount>,
    /// Set while a config policy update is pending.
    pub config_policy_update_locked: bool,
    /// dApp book slots.
    pub dapp_book: DAppBook,
}

impl Wallet {
    /// Maximum signers per wallet.
    pub const MAX_SIGNERS: usize = 24;
    /// Maximum address book entries per wallet.
    pub const MAX_ADDRESS_BOOK_ENTRIES: usize = 128;
    /// Maximum balance accounts per wallet.
    pub const MAX_BALANCE_ACCOUNTS: usize = 10;
    /// Maximum dApp book entries per wallet.
    pub const MAX_DAPP_BOOK_ENTRIES: usize = 32;

    /// Creates an initialized wallet from its initial configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the configuration violates a wallet
    /// invariant.
    pub fn initialize(
        wallet_guid_hash: WalletGuidHash,
        assistant: Signer,
        rent_return: Address,
        config: &InitialWalletConfig,
    ) -> Result<Self, WalletError> {
        let mut wallet = Self {
            is_initialized: true,
            version: WALLET_VERSION,
            rent_return,
            wallet_guid_hash,
            signers: Signers::new(),
            assistant,
            address_book: AddressBook::new(),
            approvals_required_for_config: config.approvals_required_for_config,
            approval_timeout_for_config: config.approval_timeout_for_config,
            config_approvers: SlotFlags::new(),
            balance_accounts: Vec::new(),
            config_policy_update_locked: false,
            dapp_book: DAppBook::new(),
        };
        wallet.signers.insert_many(&config.signers)?;
        wallet.address_book.insert_many(&config.address_book)?;
        for entry in &config.config_approvers {
            let id = wallet.signer_slot(entry)?;
            wallet.config_approvers.enable(id);
        }
        wallet.check_config_policy()?;
        Ok(wallet)
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    /// Returns keys of the enabled config approvers.
    #[must_use]
    pub fn get_config_approvers_keys(&self) -> Vec<Address> {
        self.approver_keys(&self.config_approvers)
    }

    /// Returns keys of the enabled transfer approvers of an account.
    #[must_use]
    pub fn get_transfer_approvers_keys(&self, account: &BalanceAccount) -> Vec<Address> {
        self.approver_keys(&account.transfer_approvers)
    }

    /// Resolves approver flags to signer keys.
    fn approver_keys(&self, flags: &SlotFlags<Signer>) -> Vec<Address> {
        flags.iter_enabled().filter_map(|id| self.signers.get(id)).map(|signer| signer.key).collect()
    }

    /// Returns the balance account with the given guid hash.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::BalanceAccountNotFound`] when absent.
    pub fn get_balance_account(
        &self,
        guid_hash: &BalanceAccountGuidHash,
    ) -> Result<&BalanceAccount, WalletError> {
        self.balance_accounts
            .iter()
            .find(|account| account.guid_hash == *guid_hash)
            .ok_or(WalletError::BalanceAccountNotFound)
    }

    /// Returns a mutable balance account with the given guid hash.
    fn balance_account_mut(
        &mut self,
        guid_hash: &BalanceAccountGuidHash,
    ) -> Result<&mut BalanceAccount, WalletError> {
        self.balance_accounts
            .iter_mut()
            .find(|account| account.guid_hash == *guid_hash)
            .ok_or(WalletError::BalanceAccountNotFound)
    }

    /// Checks that a `(slot, signer)` pair names a filled signer slot.
    fn signer_slot(&self, (id, signer): &SignerSlot) -> Result<SlotId<Signer>, WalletError> {
        if self.signers.holds(*id, signer) { Ok(*id) } else { Err(WalletError::UnknownSigner) }
    }

    /// Checks that a `(slot, entry)` pair names a filled address book slot.
    fn address_book_slot(
        &self,
        (id, entry): &AddressBookSlot,
    ) -> Result<SlotId<AddressBookEntry>, WalletError> {
        if self.address_book.holds(*id, entry) {
            Ok(*id)
        } else {
            Err(WalletError::UnknownAddressBookEntry)
        }
    }

    // ------------------------------------------------------------------------
    // Authorization
    // ------------------------------------------------------------------------

    /// Checks that `initiator` may propose config changes.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::UnauthorizedInitiator`] otherwise.
    pub fn validate_config_initiator(&self, initiator: &Address) -> Result<(), WalletError> {
        self.validate_initiator(initiator, &self.get_config_approvers_keys())
    }

    /// Checks that `initiator` may propose transfers from `account`.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::UnauthorizedInitiator`] otherwise.
    pub fn validate_transfer_initiator(
        &self,
        account: &BalanceAccount,
        initiator: &Address,
    ) -> Result<(), WalletError> {
        self.validate_initiator(initiator, &self.get_transfer_approvers_keys(account))
    }

    /// Accepts the assistant or any listed approver.
    fn validate_initiator(
        &self,
        initiator: &Address,
        approvers: &[Address],
    ) -> Result<(), WalletError> {
        if *initiator == self.assistant.key || approvers.contains(initiator) {
            Ok(())
        } else {
            Err(WalletError::UnauthorizedInitiator)
        }
    }

    /// Returns true when `account` may transfer to the named destination.
    #[must_use]
    pub fn destination_allowed(
        &self,
        account: &BalanceAccount,
        address: &Address,
        name_hash: &AddressBookEntryNameHash,
    ) -> bool {
        let entry = AddressBookEntry {
            address: *address,
            name_hash: *name_hash,
        };
        self.address_book.find_id(&entry).is_some_and(|id| account.allowed_destinations.is_enabled(id))
    }

    /// Returns true when the dApp is in the dApp book.
    #[must_use]
    pub fn dapp_allowed(&self, dapp: &DAppBookEntry) -> bool {
        self.dapp_book.contains(dapp)
    }

    // ------------------------------------------------------------------------
    // Locks
    // ------------------------------------------------------------------------

    /// Marks a config policy update as pending.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::ConcurrentOperationsNotAllowed`] when one is
    /// already pending.
    pub fn lock_config_policy_updates(&mut self) -> Result<(), WalletError> {
        if self.config_policy_update_locked {
            return Err(WalletError::ConcurrentOperationsNotAllowed);
        }
        self.config_policy_update_locked = true;
        Ok(())
    }

    /// Clears the pending config policy update marker.
    pub const fn unlock_config_policy_updates(&mut self) {
        self.config_policy_update_locked = false;
    }

    /// Marks a policy update for a balance account as pending.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the account is missing or already locked.
    pub fn lock_balance_account_policy_updates(
        &mut self,
        guid_hash: &BalanceAccountGuidHash,
    ) -> Result<(), WalletError> {
        let account = self.balance_account_mut(guid_hash)?;
        if account.policy_update_locked {
            return Err(WalletError::ConcurrentOperationsNotAllowed);
        }
        account.policy_update_locked = true;
        Ok(())
    }

    /// Clears the pending policy update marker for a balance account.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::BalanceAccountNotFound`] when absent.
    pub fn unlock_balance_account_policy_updates(
        &mut self,
        guid_hash: &BalanceAccountGuidHash,
    ) -> Result<(), WalletError> {
        self.balance_account_mut(guid_hash)?.policy_update_locked = false;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Config Policy
    // ------------------------------------------------------------------------

    /// Checks that a config policy update could be applied.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the update would violate an invariant.
    pub fn validate_config_policy_update(
        &self,
        update: &WalletConfigPolicyUpdate,
    ) -> Result<(), WalletError> {
        self.clone().update_config_policy(update)
    }

    /// Applies a config policy update.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the update would violate an invariant.
    pub fn update_config_policy(
        &mut self,
        update: &WalletConfigPolicyUpdate,
    ) -> Result<(), WalletError> {
        for entry in &update.remove_config_approvers {
            let id = self.signer_slot(entry)?;
            self.config_approvers.disable(id);
        }
        for entry in &update.add_config_approvers {
            let id = self.signer_slot(entry)?;
            self.config_approvers.enable(id);
        }
        if let Some(required) = update.approvals_required_for_config {
            self.approvals_required_for_config = required;
        }
        if let Some(timeout) = update.approval_timeout_for_config {
            self.approval_timeout_for_config = timeout;
        }
        self.check_config_policy()
    }

    /// Checks config threshold and timeout bounds.
    fn check_config_policy(&self) -> Result<(), WalletError> {
        check_approvals(self.approvals_required_for_config, self.config_approvers.count_enabled())?;
        check_timeout(self.approval_timeout_for_config)
    }

    // ------------------------------------------------------------------------
    // Signers
    // ------------------------------------------------------------------------

    /// Checks that a signer slot update could be applied.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the update would violate an invariant.
    pub fn validate_signer_update(
        &self,
        slot_update_type: SlotUpdateType,
        slot_id: SlotId<Signer>,
        signer: Signer,
    ) -> Result<(), WalletError> {
        self.clone().update_signers(slot_update_type, slot_id, signer)
    }

    /// Fills or clears a signer slot.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the slot cannot change, or when a cleared
    /// signer is still a config or transfer approver.
    pub fn update_signers(
        &mut self,
        slot_update_type: SlotUpdateType,
        slot_id: SlotId<Signer>,
        signer: Signer,
    ) -> Result<(), WalletError> {
        let entries = [(slot_id, signer)];
        match slot_update_type {
            SlotUpdateType::SetIfEmpty => self.signers.insert_many(&entries),
            SlotUpdateType::Clear => {
                if !self.signers.can_be_removed(&entries) {
                    return Err(WalletError::SlotCannotBeRemoved);
                }
                if self.config_approvers.is_enabled(slot_id) {
                    return Err(WalletError::SignerIsConfigApprover);
                }
                if self
                    .balance_accounts
                    .iter()
                    .any(|account| account.transfer_approvers.is_enabled(slot_id))
                {
                    return Err(WalletError::SignerIsTransferApprover);
                }
                self.signers.remove_many(&entries)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Address Book
    // ------------------------------------------------------------------------

    /// Checks that an address book update could be applied.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the update would violate an invariant.
    pub fn validate_address_book_update(
        &self,
        update: &AddressBookUpdate,
    ) -> Result<(), WalletError> {
        self.clone().update_address_book(update)
    }

    /// Applies an address book update.
    ///
    /// Order: whitelist removals, entry removals, entry additions, whitelist
    /// additions. An entry can therefore be dropped from whitelists and the
    /// book in one update, and a new entry can be whitelisted as it is added.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the update would violate an invariant.
    pub fn update_address_book(&mut self, update: &AddressBookUpdate) -> Result<(), WalletError> {
        for whitelist in &update.balance_account_whitelist_updates {
            let ids = whitelist
                .remove_allowed_destinations
                .iter()
                .map(|entry| self.address_book_slot(entry))
                .collect::<Result<Vec<_>, _>>()?;
            let account = self.balance_account_mut(&whitelist.account_guid_hash)?;
            for id in ids {
                account.allowed_destinations.disable(id);
            }
        }

        if !self.address_book.can_be_removed(&update.remove_address_book_entries) {
            return Err(WalletError::SlotCannotBeRemoved);
        }
        for (id, _) in &update.remove_address_book_entries {
            if self.balance_accounts.iter().any(|account| account.allowed_destinations.is_enabled(*id))
            {
                return Err(WalletError::AddressBookEntryInUse);
            }
        }
        self.address_book.remove_many(&update.remove_address_book_entries)?;
        self.address_book.insert_many(&update.add_address_book_entries)?;

        for whitelist in &update.balance_account_whitelist_updates {
            let ids = whitelist
                .add_allowed_destinations
                .iter()
                .map(|entry| self.address_book_slot(entry))
                .collect::<Result<Vec<_>, _>>()?;
            let account = self.balance_account_mut(&whitelist.account_guid_hash)?;
            for id in ids {
                account.allowed_destinations.enable(id);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // dApp Book
    // ------------------------------------------------------------------------

    /// Checks that a dApp book update could be applied.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when a slot cannot change.
    pub fn validate_dapp_book_update(&self, update: &DAppBookUpdate) -> Result<(), WalletError> {
        self.clone().update_dapp_book(update)
    }

    /// Removes then adds dApp book entries.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when a slot cannot change.
    pub fn update_dapp_book(&mut self, update: &DAppBookUpdate) -> Result<(), WalletError> {
        self.dapp_book.remove_many(&update.remove_dapps)?;
        self.dapp_book.insert_many(&update.add_dapps)
    }

    // ------------------------------------------------------------------------
    // Balance Accounts
    // ------------------------------------------------------------------------

    /// Checks that a balance account could be created.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when creation would violate an invariant.
    pub fn validate_add_balance_account(
        &self,
        guid_hash: &BalanceAccountGuidHash,
        creation: &BalanceAccountCreation,
    ) -> Result<(), WalletError> {
        self.clone().add_balance_account(guid_hash, creation)
    }

    /// Creates a balance account.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the guid is taken, the wallet is full, or
    /// the policy is out of bounds.
    pub fn add_balance_account(
        &mut self,
        guid_hash: &BalanceAccountGuidHash,
        creation: &BalanceAccountCreation,
    ) -> Result<(), WalletError> {
        if self.balance_accounts.iter().any(|account| account.guid_hash == *guid_hash) {
            return Err(WalletError::BalanceAccountAlreadyExists);
        }
        if self.balance_accounts.len() >= Self::MAX_BALANCE_ACCOUNTS {
            return Err(WalletError::TooManyBalanceAccounts);
        }
        let mut transfer_approvers = SlotFlags::new();
        for entry in &creation.transfer_approvers {
            transfer_approvers.enable(self.signer_slot(entry)?);
        }
        check_approvals(creation.approvals_required_for_transfer, transfer_approvers.count_enabled())?;
        check_timeout(creation.approval_timeout_for_transfer)?;
        self.balance_accounts.push(BalanceAccount {
            guid_hash: *guid_hash,
            name_hash: creation.name_hash,
            approvals_required_for_transfer: creation.approvals_required_for_transfer,
            approval_timeout_for_transfer: creation.approval_timeout_for_transfer,
            transfer_approvers,
            allowed_destinations: SlotFlags::new(),
            whitelist_enabled: creation.whitelist_enabled,
            dapps_enabled: creation.dapps_enabled,
            policy_update_locked: false,
        });
        Ok(())
    }

    /// Renames a balance account.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::BalanceAccountNotFound`] when absent.
    pub fn update_balance_account_name(
        &mut self,
        guid_hash: &BalanceAccountGuidHash,
        name_hash: BalanceAccountNameHash,
    ) -> Result<(), WalletError> {
        self.balance_account_mut(guid_hash)?.name_hash = name_hash;
        Ok(())
    }

    /// Checks that a balance account policy update could be applied.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the update would violate an invariant.
    pub fn validate_balance_account_policy_update(
        &self,
        guid_hash: &BalanceAccountGuidHash,
        update: &BalanceAccountPolicyUpdate,
    ) -> Result<(), WalletError> {
        self.clone().update_balance_account_policy(guid_hash, update)
    }

    /// Applies a balance account policy update.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the update would violate an invariant.
    pub fn update_balance_account_policy(
        &mut self,
        guid_hash: &BalanceAccountGuidHash,
        update: &BalanceAccountPolicyUpdate,
    ) -> Result<(), WalletError> {
        let removed = update
            .remove_transfer_approvers
            .iter()
            .map(|entry| self.signer_slot(entry))
            .collect::<Result<Vec<_>, _>>()?;
        let added = update
            .add_transfer_approvers
            .iter()
            .map(|entry| self.signer_slot(entry))
            .collect::<Result<Vec<_>, _>>()?;
        let account = self.balance_account_mut(guid_hash)?;
        for id in removed {
            account.transfer_approvers.disable(id);
        }
        for id in added {
            account.transfer_approvers.enable(id);
        }
        if let Some(required) = update.approvals_required_for_transfer {
            account.approvals_required_for_transfer = required;
        }
        if let Some(timeout) = update.approval_timeout_for_transfer {
            account.approval_timeout_for_transfer = timeout;
        }
        check_approvals(
            account.approvals_required_for_transfer,
            account.transfer_approvers.count_enabled(),
        )?;
        check_timeout(account.approval_timeout_for_transfer)
    }

    /// Changes balance account settings; `None` leaves a setting unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::BalanceAccountNotFound`] when absent.
    pub fn update_balance_account_settings(
        &mut self,
        guid_hash: &BalanceAccountGuidHash,
        whitelist_enabled: Option<BooleanSetting>,
        dapps_enabled: Option<BooleanSetting>,
    ) -> Result<(), WalletError> {
        let account = self.balance_account_mut(guid_hash)?;
        if let Some(setting) = whitelist_enabled {
            account.whitelist_enabled = setting;
        }
        if let Some(setting) = dapps_enabled {
            account.dapps_enabled = setting;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Policy Checks
// ============================================================================

/// Checks `1 <= required <= approvers`.
fn check_approvals(required: u8, approvers: usize) -> Result<(), WalletError> {
    if required == 0 || usize::from(required) > approvers {
        return Err(WalletError::InvalidApproverCount);
    }
    Ok(())
}

/// Checks that an approval timeout lies within the allowed window.
fn check_timeout(timeout: Duration) -> Result<(), WalletError> {
    if is_valid_approval_timeout(timeout) { Ok(()) } else { Err(WalletError::InvalidApprovalTimeout) }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::*;
    use crate::core::updates::BalanceAccountWhitelistUpdate;

    fn signer(seed: u8) -> Signer {
        Signer::new(Address::new([seed; 32]))
    }

    fn entry(seed: u8) -> AddressBookEntry {
        AddressBookEntry {
            address: Address::new([seed; 32]),
            name_hash: AddressBookEntryNameHash::new([seed.wrapping_add(100); 32]),
        }
    }

    fn guid(seed: u8) -> BalanceAccountGuidHash {
        BalanceAccountGuidHash::new([seed; 32])
    }

    fn wallet() -> Wallet {
        let config = InitialWalletConfig {
            approvals_required_for_config: 2,
            approval_timeout_for_config: Duration::from_secs(3600),
            signers: vec![
                (SlotId::new(0), signer(1)),
                (SlotId::new(1), signer(2)),
                (SlotId::new(2), signer(3)),
            ],
            config_approvers: vec![(SlotId::new(0), signer(1)), (SlotId::new(1), signer(2))],
            address_book: vec![(SlotId::new(0), entry(50))],
        };
        let mut wallet =
            Wallet::initialize(WalletGuidHash::new([9; 32]), signer(99), Address::new([99; 32]), &config)
                .unwrap();
        wallet
            .add_balance_account(
                &guid(1),
                &BalanceAccountCreation {
                    name_hash: BalanceAccountNameHash::new([7; 32]),
                    approvals_required_for_transfer: 1,
                    approval_timeout_for_transfer: Duration::from_secs(600),
                    transfer_approvers: vec![(SlotId::new(2), signer(3))],
                    whitelist_enabled: BooleanSetting::On,
                    dapps_enabled: BooleanSetting::Off,
                },
            )
            .unwrap();
        wallet
    }

    #[test]
    fn initialize_rejects_threshold_above_approvers() {
        let config = InitialWalletConfig {
            approvals_required_for_config: 2,
            approval_timeout_for_config: Duration::from_secs(60),
            signers: vec![(SlotId::new(0), signer(1))],
            config_approvers: vec![(SlotId::new(0), signer(1))],
            address_book: Vec::new(),
        };
        let err = Wallet::initialize(WalletGuidHash::zero(), signer(9), Address::zero(), &config)
            .unwrap_err();
        assert_eq!(err, WalletError::InvalidApproverCount);
    }

    #[test]
    fn config_approver_must_be_a_signer() {
        let wallet = wallet();
        let update = WalletConfigPolicyUpdate {
            add_config_approvers: vec![(SlotId::new(5), signer(1))],
            ..WalletConfigPolicyUpdate::default()
        };
        assert_eq!(wallet.validate_config_policy_update(&update), Err(WalletError::UnknownSigner));
    }

    #[test]
    fn config_policy_rejects_zero_timeout() {
        let wallet = wallet();
        let update = WalletConfigPolicyUpdate {
            approval_timeout_for_config: Some(Duration::ZERO),
            ..WalletConfigPolicyUpdate::default()
        };
        assert_eq!(
            wallet.validate_config_policy_update(&update),
            Err(WalletError::InvalidApprovalTimeout)
        );
    }

    #[test]
    fn approver_signers_cannot_be_cleared() {
        let wallet = wallet();
        assert_eq!(
            wallet.validate_signer_update(SlotUpdateType::Clear, SlotId::new(0), signer(1)),
            Err(WalletError::SignerIsConfigApprover)
        );
        assert_eq!(
            wallet.validate_signer_update(SlotUpdateType::Clear, SlotId::new(2), signer(3)),
            Err(WalletError::SignerIsTransferApprover)
        );
    }

    #[test]
    fn whitelisted_entry_removal_requires_whitelist_removal() {
        let mut wallet = wallet();
        wallet
            .update_address_book(&AddressBookUpdate {
                balance_account_whitelist_updates: vec![
                    BalanceAccountWhitelistUpdate {
                        account_guid_hash: guid(1),
                        add_allowed_destinations: vec![(SlotId::new(0), entry(50))],
                        remove_allowed_destinations: Vec::new(),
                    },
                ],
                ..AddressBookUpdate::default()
            })
            .unwrap();
        let account = wallet.get_balance_account(&guid(1)).unwrap();
        assert!(wallet.destination_allowed(account, &entry(50).address, &entry(50).name_hash));

        let remove_only = AddressBookUpdate {
            remove_address_book_entries: vec![(SlotId::new(0), entry(50))],
            ..AddressBookUpdate::default()
        };
        assert_eq!(
            wallet.validate_address_book_update(&remove_only),
            Err(WalletError::AddressBookEntryInUse)
        );

        let remove_both = AddressBookUpdate {
            remove_address_book_entries: vec![(SlotId::new(0), entry(50))],
            balance_account_whitelist_updates: vec![
                BalanceAccountWhitelistUpdate {
                    account_guid_hash: guid(1),
                    add_allowed_destinations: Vec::new(),
                    remove_allowed_destinations: vec![(SlotId::new(0), entry(50))],
                },
            ],
            ..AddressBookUpdate::default()
        };
        wallet.update_address_book(&remove_both).unwrap();
        assert!(wallet.address_book.is_empty());
    }

    #[test]
    fn balance_account_guid_is_unique() {
        let wallet = wallet();
        let creation = BalanceAccountCreation {
            name_hash: BalanceAccountNameHash::zero(),
            approvals_required_for_transfer: 1,
            approval_timeout_for_transfer: Duration::from_secs(60),
            transfer_approvers: vec![(SlotId::new(0), signer(1))],
            whitelist_enabled: BooleanSetting::Off,
            dapps_enabled: BooleanSetting::Off,
        };
        assert_eq!(
            wallet.validate_add_balance_account(&guid(1), &creation),
            Err(WalletError::BalanceAccountAlreadyExists)
        );
        assert!(wallet.validate_add_balance_account(&guid(2), &creation).is_ok());
    }

    #[test]
    fn balance_account_count_is_capped() {
        let mut wallet = wallet();
        let creation = BalanceAccountCreation {
            name_hash: BalanceAccountNameHash::zero(),
            approvals_required_for_transfer: 1,
            approval_timeout_for_transfer: Duration::from_secs(60),
            transfer_approvers: vec![(SlotId::new(0), signer(1))],
            whitelist_enabled: BooleanSetting::Off,
            dapps_enabled: BooleanSetting::Off,
        };
        for seed in 2..=10 {
            wallet.add_balance_account(&guid(seed), &creation).unwrap();
        }
        assert_eq!(
            wallet.add_balance_account(&guid(11), &creation),
            Err(WalletError::TooManyBalanceAccounts)
        );
    }

    #[test]
    fn policy_lock_is_exclusive() {
        let mut wallet = wallet();
        wallet.lock_balance_account_policy_updates(&guid(1)).unwrap();
        assert_eq!(
            wallet.lock_balance_account_policy_updates(&guid(1)),
            Err(WalletError::ConcurrentOperationsNotAllowed)
        );
        wallet.unlock_balance_account_policy_updates(&guid(1)).unwrap();
        wallet.lock_balance_account_policy_updates(&guid(1)).unwrap();
    }

    #[test]
    fn serde_roundtrip_preserves_wallet() {
        let wallet = wallet();
        let json = serde_json::to_string(&wallet).unwrap();
        let back: Wallet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, wallet);
    }
}
