// crates/strike-wallet-core/src/runtime/handlers/mod.rs
// ============================================================================
// Module: Strike Wallet Instruction Handlers
// Description: One handler module per instruction pair plus dispatch.
// Purpose: Route a verified instruction to the code that validates and applies it.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Handlers read and write through the [`StagedLedger`] held by the
//! [`HandlerContext`]. An `Init*` handler validates the proposal against a
//! copy of the wallet and opens a [`crate::core::MultisigOp`]; the matching
//! `Finalize*` handler recomputes the params, applies the change when the
//! operation is approved, and closes the operation record.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod address_book_update;
mod approval_disposition;
mod balance_account_creation;
mod balance_account_name_update;
mod balance_account_policy_update;
mod balance_account_settings_update;
mod dapp_book_update;
mod dapp_transaction;
mod init_wallet;
mod transfer;
mod update_signer;
mod utils;
mod wallet_config_policy_update;
mod wrap_unwrap;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::error::WalletError;
use crate::core::identifiers::Address;
use crate::core::identifiers::OperationId;
use crate::core::identifiers::ParamsHash;
use crate::core::instruction::ProgramInstruction;
use crate::core::multisig_op::OperationDisposition;
use crate::core::time::Timestamp;
use crate::core::wallet::Wallet;
use crate::interfaces::DAppRuntime;
use crate::runtime::processor::ProcessorLimits;
use crate::runtime::staged::StagedLedger;

// ============================================================================
// SECTION: Context
// ============================================================================

/// State shared by every handler for one transaction.
pub struct HandlerContext<'a, 's> {
    /// Ledger overlay receiving the instruction's writes.
    pub ledger: &'a mut StagedLedger<'s>,
    /// Target wallet address.
    pub wallet_address: Address,
    /// Operation record id from the transaction.
    pub operation_id: Option<OperationId>,
    /// Verified initiating key.
    pub initiator: Address,
    /// Every key whose signature verified, initiator included.
    pub signers: &'a BTreeSet<Address>,
    /// Host-supplied processing time.
    pub now: Timestamp,
    /// Runtime executing dApp instructions.
    pub runtime: &'a dyn DAppRuntime,
    /// Processing limits.
    pub limits: ProcessorLimits,
}

impl HandlerContext<'_, '_> {
    /// Returns the operation id the instruction acts on.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidInstruction`] when the transaction has none.
    pub fn operation_id(&self) -> Result<OperationId, WalletError> {
        self.operation_id
            .clone()
            .ok_or_else(|| WalletError::InvalidInstruction("operation_id is required".to_string()))
    }

    /// Returns true when `key` signed the transaction.
    #[must_use]
    pub fn is_signed_by(&self, key: &Address) -> bool {
        self.signers.contains(key)
    }

    /// Loads the target wallet.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::WalletNotInitialized`] when absent.
    pub fn wallet(&self) -> Result<Wallet, WalletError> {
        self.ledger.require_wallet(&self.wallet_address)
    }

    /// Stages a write of the target wallet.
    pub fn put_wallet(&mut self, wallet: Wallet) {
        self.ledger.put_wallet(self.wallet_address, wallet);
    }
}

/// What a handler reports back to the processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerOutcome {
    /// Params hash of the operation touched, when known.
    pub params_hash: Option<ParamsHash>,
    /// Operation disposition after the instruction, when an operation was touched.
    pub operation_disposition: Option<OperationDisposition>,
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Runs `instruction` against the context.
///
/// # Errors
///
/// Returns [`WalletError`] when the instruction is rejected.
pub fn dispatch(
    ctx: &mut HandlerContext<'_, '_>,
    instruction: &ProgramInstruction,
) -> Result<HandlerOutcome, WalletError> {
    match instruction {
        ProgramInstruction::InitWallet {
            wallet_guid_hash,
            initial_config,
        } => init_wallet::handle(ctx, wallet_guid_hash, initial_config),
        ProgramInstruction::InitWalletConfigPolicyUpdate {
            update,
        } => wallet_config_policy_update::init(ctx, update),
        ProgramInstruction::FinalizeWalletConfigPolicyUpdate {
            update,
        } => wallet_config_policy_update::finalize(ctx, update),
        ProgramInstruction::InitUpdateSigner {
            slot_update_type,
            slot_id,
            signer,
        } => update_signer::init(ctx, *slot_update_type, *slot_id, *signer),
        ProgramInstruction::FinalizeUpdateSigner {
            slot_update_type,
            slot_id,
            signer,
        } => update_signer::finalize(ctx, *slot_update_type, *slot_id, *signer),
        ProgramInstruction::InitAddressBookUpdate {
            update,
        } => address_book_update::init(ctx, update),
        ProgramInstruction::FinalizeAddressBookUpdate {
            update,
        } => address_book_update::finalize(ctx, update),
        ProgramInstruction::InitDAppBookUpdate {
            update,
        } => dapp_book_update::init(ctx, update),
        ProgramInstruction::FinalizeDAppBookUpdate {
            update,
        } => dapp_book_update::finalize(ctx, update),
        ProgramInstruction::InitBalanceAccountCreation {
            account_guid_hash,
            creation_params,
        } => balance_account_creation::init(ctx, account_guid_hash, creation_params),
        ProgramInstruction::FinalizeBalanceAccountCreation {
            account_guid_hash,
            creation_params,
        } => balance_account_creation::finalize(ctx, account_guid_hash, creation_params),
        ProgramInstruction::InitBalanceAccountNameUpdate {
            account_guid_hash,
            account_name_hash,
        } => balance_account_name_update::init(ctx, account_guid_hash, *account_name_hash),
        ProgramInstruction::FinalizeBalanceAccountNameUpdate {
            account_guid_hash,
            account_name_hash,
        } => balance_account_name_update::finalize(ctx, account_guid_hash, *account_name_hash),
        ProgramInstruction::InitBalanceAccountPolicyUpdate {
            account_guid_hash,
            update,
        } => balance_account_policy_update::init(ctx, account_guid_hash, update),
        ProgramInstruction::FinalizeBalanceAccountPolicyUpdate {
            account_guid_hash,
            update,
        } => balance_account_policy_update::finalize(ctx, account_guid_hash, update),
        ProgramInstruction::InitAccountSettingsUpdate {
            account_guid_hash,
            whitelist_enabled,
            dapps_enabled,
        } => balance_account_settings_update::init(
            ctx,
            account_guid_hash,
            *whitelist_enabled,
            *dapps_enabled,
        ),
        ProgramInstruction::FinalizeAccountSettingsUpdate {
            account_guid_hash,
            whitelist_enabled,
            dapps_enabled,
        } => balance_account_settings_update::finalize(
            ctx,
            account_guid_hash,
            *whitelist_enabled,
            *dapps_enabled,
        ),
        ProgramInstruction::InitTransfer {
            account_guid_hash,
            amount,
            destination,
            destination_name_hash,
            token_mint,
        } => transfer::init(
            ctx,
            account_guid_hash,
            transfer::TransferRequest {
                destination: *destination,
                amount: *amount,
                token_mint: *token_mint,
            },
            destination_name_hash,
        ),
        ProgramInstruction::FinalizeTransfer {
            account_guid_hash,
            amount,
            destination,
            token_mint,
        } => transfer::finalize(
            ctx,
            account_guid_hash,
            transfer::TransferRequest {
                destination: *destination,
                amount: *amount,
                token_mint: *token_mint,
            },
        ),
        ProgramInstruction::InitWrapUnwrap {
            account_guid_hash,
            amount,
            direction,
        } => wrap_unwrap::init(ctx, account_guid_hash, *amount, *direction),
        ProgramInstruction::FinalizeWrapUnwrap {
            account_guid_hash,
            amount,
            direction,
        } => wrap_unwrap::finalize(ctx, account_guid_hash, *amount, *direction),
        ProgramInstruction::SetApprovalDisposition {
            disposition,
            params_hash,
        } => approval_disposition::handle(ctx, *disposition, params_hash),
        ProgramInstruction::InitDAppTransaction {
            account_guid_hash,
            dapp,
            instruction_count,
        } => dapp_transaction::init(ctx, account_guid_hash, *dapp, *instruction_count),
        ProgramInstruction::SupplyDAppTransactionInstructions {
            starting_index,
            instructions,
        } => dapp_transaction::supply_instructions(ctx, *starting_index, instructions),
        ProgramInstruction::FinalizeDAppTransaction {
            account_guid_hash,
            params_hash,
        } => dapp_transaction::finalize(ctx, account_guid_hash, params_hash),
    }
}
