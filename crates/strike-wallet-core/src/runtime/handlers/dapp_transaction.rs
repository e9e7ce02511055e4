// crates/strike-wallet-core/src/runtime/handlers/dapp_transaction.rs
// ============================================================================
// Module: dApp Transaction Handler
// Description: Opens, fills, simulates, and executes dApp transactions.
// Purpose: Let a balance account sign dApp instructions once approved.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! A dApp transaction is opened without a params hash. The initiator then
//! supplies the instructions, possibly across several transactions; once
//! every slot is filled the params hash is fixed and approvers can record
//! dispositions. Finalizing a pending operation runs the instructions on a
//! forked ledger and reports the balance changes as
//! [`WalletError::SimulationFinished`] without persisting anything.
//!
//! Security posture: instruction payloads are untrusted and execute with the
//! balance account as signer only after approval.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::HandlerContext;
use super::HandlerOutcome;
use super::utils::require_wallet_operation;
use super::utils::start_multisig_transfer_op;
use crate::core::address_book::DAppBookEntry;
use crate::core::balance_account::derive_balance_account_address;
use crate::core::error::WalletError;
use crate::core::identifiers::Address;
use crate::core::identifiers::BalanceAccountGuidHash;
use crate::core::identifiers::ParamsHash;
use crate::core::multisig_op::DAppInstruction;
use crate::core::multisig_op::DAppMultisigData;
use crate::core::multisig_op::MultisigOpParams;
use crate::interfaces::DAppRuntime;
use crate::runtime::staged::StagedLedger;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Opens a dApp transaction.
///
/// # Errors
///
/// Returns [`WalletError`] when dApps are disabled, the dApp is not allowed,
/// the instruction count is out of range, or the initiator is not authorized.
pub fn init(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    dapp: DAppBookEntry,
    instruction_count: u8,
) -> Result<HandlerOutcome, WalletError> {
    let wallet = ctx.wallet()?;
    let account = wallet.get_balance_account(account_guid_hash)?;
    wallet.validate_transfer_initiator(account, &ctx.initiator)?;
    if !account.are_dapps_enabled() {
        return Err(WalletError::DAppsDisabled);
    }
    if account.is_whitelist_enabled() && !wallet.dapp_allowed(&dapp) {
        return Err(WalletError::DAppNotAllowed);
    }
    if instruction_count == 0 || usize::from(instruction_count) > ctx.limits.max_dapp_instructions
    {
        return Err(WalletError::InvalidInstruction(format!(
            "dapp instruction count must be within 1..={}",
            ctx.limits.max_dapp_instructions
        )));
    }
    let id = ctx.operation_id()?;
    if ctx.ledger.dapp_data(&id)?.is_some() {
        return Err(WalletError::OperationAlreadyExists);
    }
    let outcome = start_multisig_transfer_op(ctx, &wallet, account, None)?;
    let data =
        DAppMultisigData::new(ctx.wallet_address, *account_guid_hash, dapp, instruction_count);
    ctx.ledger.put_dapp_data(id, data);
    Ok(outcome)
}

/// Stores instructions starting at `starting_index`.
///
/// # Errors
///
/// Returns [`WalletError`] when the initiator did not open the operation, the
/// operation expired, or an instruction slot is out of range or taken.
pub fn supply_instructions(
    ctx: &mut HandlerContext<'_, '_>,
    starting_index: u8,
    instructions: &[DAppInstruction],
) -> Result<HandlerOutcome, WalletError> {
    let id = ctx.operation_id()?;
    let mut op = require_wallet_operation(ctx, &id)?;
    if op.initiator != ctx.initiator {
        return Err(WalletError::UnauthorizedInitiator);
    }
    if ctx.now > op.expires_at {
        return Err(WalletError::OperationExpired);
    }
    let mut data = ctx.ledger.dapp_data(&id)?.ok_or(WalletError::OperationNotFound)?;
    if data.wallet_address != ctx.wallet_address {
        return Err(WalletError::OperationParamsMismatch);
    }
    for (offset, instruction) in instructions.iter().enumerate() {
        let index = usize::from(starting_index)
            .checked_add(offset)
            .ok_or(WalletError::DAppInstructionOverflow)?;
        data.add_instruction(index, instruction.clone())?;
    }
    if op.params_hash.is_none()
        && let Some(params) = data.params()
    {
        op.params_hash = Some(params.hash()?);
    }
    let outcome = HandlerOutcome {
        params_hash: op.params_hash,
        operation_disposition: Some(op.operation_disposition),
    };
    ctx.ledger.put_operation(id.clone(), op);
    ctx.ledger.put_dapp_data(id, data);
    Ok(outcome)
}

/// Executes, simulates, or closes a dApp transaction.
///
/// # Errors
///
/// Returns [`WalletError::SimulationFinished`] with the simulated balance
/// changes while the operation is pending, [`WalletError::InvalidSignature`]
/// when `params_hash` does not cover the stored instructions, and
/// [`WalletError`] when an instruction fails.
pub fn finalize(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    params_hash: &ParamsHash,
) -> Result<HandlerOutcome, WalletError> {
    let wallet = ctx.wallet()?;
    wallet.get_balance_account(account_guid_hash)?;
    let id = ctx.operation_id()?;
    let op = require_wallet_operation(ctx, &id)?;
    let data = ctx.ledger.dapp_data(&id)?.ok_or(WalletError::OperationNotFound)?;
    let instructions = data.all_instructions().ok_or(WalletError::OperationNotInitialized)?;
    let expected = MultisigOpParams::DAppTransaction {
        wallet_address: ctx.wallet_address,
        account_guid_hash: *account_guid_hash,
        dapp: data.dapp,
        instructions: instructions.clone(),
    };
    let expected_hash = expected.hash()?;
    if expected_hash != *params_hash {
        return Err(WalletError::InvalidSignature);
    }
    let signer = derive_balance_account_address(&ctx.wallet_address, account_guid_hash);
    match op.approved(&expected_hash, ctx.now) {
        Ok(approved) => {
            if approved {
                execute(ctx.runtime, ctx.ledger, &instructions, &signer)?;
            }
            ctx.ledger.delete_operation(id.clone());
            ctx.ledger.delete_dapp_data(id);
            Ok(HandlerOutcome {
                params_hash: Some(expected_hash),
                operation_disposition: Some(op.disposition_at(ctx.now)),
            })
        }
        Err(WalletError::TransferDispositionNotFinal) => {
            let mut simulation = ctx.ledger.fork();
            execute(ctx.runtime, &mut simulation, &instructions, &signer)?;
            Err(WalletError::SimulationFinished {
                changes: simulation.balance_changes()?,
            })
        }
        Err(error) => Err(error),
    }
}

/// Runs every instruction with the balance account as program signer.
fn execute(
    runtime: &dyn DAppRuntime,
    ledger: &mut StagedLedger<'_>,
    instructions: &[DAppInstruction],
    signer: &Address,
) -> Result<(), WalletError> {
    for instruction in instructions {
        runtime.invoke(ledger, instruction, signer)?;
    }
    Ok(())
}
