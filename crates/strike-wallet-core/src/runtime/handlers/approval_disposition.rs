// crates/strike-wallet-core/src/runtime/handlers/approval_disposition.rs
// ============================================================================
// Module: Approval Disposition Handler
// Description: Records an approver's disposition on a pending operation.
// Purpose: Collect approvals and denials bound to an operation's params hash.
// Dependencies: crate::core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::HandlerContext;
use super::HandlerOutcome;
use super::utils::require_wallet_operation;
use crate::core::error::WalletError;
use crate::core::identifiers::ParamsHash;
use crate::core::multisig_op::ApprovalDisposition;

// ============================================================================
// SECTION: Handler
// ============================================================================

/// Records the initiator's disposition.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation is missing or was opened
/// against another wallet, is final or expired, or the initiator is not one
/// of its approvers.
pub fn handle(
    ctx: &mut HandlerContext<'_, '_>,
    disposition: ApprovalDisposition,
    params_hash: &ParamsHash,
) -> Result<HandlerOutcome, WalletError> {
    let id = ctx.operation_id()?;
    let mut op = require_wallet_operation(ctx, &id)?;
    op.validate_and_record_disposition(&ctx.initiator, disposition, params_hash, ctx.now)?;
    let outcome = HandlerOutcome {
        params_hash: Some(*params_hash),
        operation_disposition: Some(op.operation_disposition),
    };
    ctx.ledger.put_operation(id, op);
    Ok(outcome)
}
