// crates/strike-wallet-core/src/runtime/handlers/utils.rs
// ============================================================================
// Module: Strike Wallet Handler Utilities
// Description: Shared steps for opening and closing multisig operations.
// Purpose: Keep every Init/Finalize pair on the same approval path.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! Config operations are approved by the wallet's config approvers; transfer
//! operations by the balance account's transfer approvers. Finalizing always
//! deletes the operation record, whether or not the change was applied, and
//! the store keeps its id closed so the same signed transactions cannot
//! open and run it again. An operation is only visible to instructions
//! addressed to the wallet it was opened against.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use super::HandlerContext;
use super::HandlerOutcome;
use crate::core::balance_account::BalanceAccount;
use crate::core::error::WalletError;
use crate::core::identifiers::Address;
use crate::core::identifiers::OperationId;
use crate::core::identifiers::ParamsHash;
use crate::core::multisig_op::MultisigOp;
use crate::core::multisig_op::MultisigOpParams;
use crate::core::time::Timestamp;
use crate::core::wallet::Wallet;
use crate::runtime::staged::StagedLedger;

// ============================================================================
// SECTION: Start
// ============================================================================

/// Computes the expiry of an operation started at `start`.
///
/// # Errors
///
/// Returns [`WalletError::InvalidApprovalTimeout`] on overflow.
pub fn calculate_expires(start: Timestamp, timeout: Duration) -> Result<Timestamp, WalletError> {
    start.checked_add(timeout).ok_or(WalletError::InvalidApprovalTimeout)
}

/// Opens an operation approved by the wallet's config approvers.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation cannot be created.
pub fn start_multisig_config_op(
    ctx: &mut HandlerContext<'_, '_>,
    wallet: &Wallet,
    params: &MultisigOpParams,
) -> Result<HandlerOutcome, WalletError> {
    start_multisig_op(
        ctx,
        wallet.get_config_approvers_keys(),
        wallet.approvals_required_for_config,
        wallet.approval_timeout_for_config,
        Some(params.hash()?),
    )
}

/// Opens an operation approved by a balance account's transfer approvers.
///
/// `params` is `None` while a dApp transaction is still collecting its
/// instructions.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation cannot be created.
pub fn start_multisig_transfer_op(
    ctx: &mut HandlerContext<'_, '_>,
    wallet: &Wallet,
    account: &BalanceAccount,
    params: Option<&MultisigOpParams>,
) -> Result<HandlerOutcome, WalletError> {
    let params_hash = params.map(MultisigOpParams::hash).transpose()?;
    start_multisig_op(
        ctx,
        wallet.get_transfer_approvers_keys(account),
        account.approvals_required_for_transfer,
        account.approval_timeout_for_transfer,
        params_hash,
    )
}

/// Initializes the operation record named by the transaction.
fn start_multisig_op(
    ctx: &mut HandlerContext<'_, '_>,
    approvers: Vec<Address>,
    dispositions_required: u8,
    timeout: Duration,
    params_hash: Option<ParamsHash>,
) -> Result<HandlerOutcome, WalletError> {
    let id = ctx.operation_id()?;
    if ctx.ledger.is_operation_closed(&id)? {
        return Err(WalletError::OperationAlreadyExists);
    }
    let mut op = ctx.ledger.operation(&id)?.unwrap_or_default();
    let expires_at = calculate_expires(ctx.now, timeout)?;
    op.init(approvers, dispositions_required, ctx.initiator, ctx.now, expires_at, params_hash)?;
    op.wallet_address = ctx.wallet_address;
    let outcome = HandlerOutcome {
        params_hash,
        operation_disposition: Some(op.operation_disposition),
    };
    ctx.ledger.put_operation(id, op);
    Ok(outcome)
}

// ============================================================================
// SECTION: Lookup
// ============================================================================

/// Loads an initialized operation opened against the context's wallet.
///
/// # Errors
///
/// Returns [`WalletError::OperationNotFound`] when the record is absent or
/// belongs to another wallet.
pub fn require_wallet_operation(
    ctx: &HandlerContext<'_, '_>,
    id: &OperationId,
) -> Result<MultisigOp, WalletError> {
    let op = ctx.ledger.require_operation(id)?;
    if op.wallet_address != ctx.wallet_address {
        return Err(WalletError::OperationNotFound);
    }
    Ok(op)
}

// ============================================================================
// SECTION: Finalize
// ============================================================================

/// Closes an operation, running `on_op_approved` first when it was approved.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation is missing, still pending, or
/// its params differ from `expected_params`, or when `on_op_approved` fails.
pub fn finalize_multisig_op<F>(
    ctx: &mut HandlerContext<'_, '_>,
    expected_params: &MultisigOpParams,
    on_op_approved: F,
) -> Result<HandlerOutcome, WalletError>
where
    F: FnOnce(&mut StagedLedger<'_>) -> Result<(), WalletError>,
{
    let id = ctx.operation_id()?;
    let op = require_wallet_operation(ctx, &id)?;
    let params_hash = expected_params.hash()?;
    if op.approved(&params_hash, ctx.now)? {
        on_op_approved(&mut *ctx.ledger)?;
    }
    ctx.ledger.delete_operation(id);
    Ok(HandlerOutcome {
        params_hash: Some(params_hash),
        operation_disposition: Some(op.disposition_at(ctx.now)),
    })
}
