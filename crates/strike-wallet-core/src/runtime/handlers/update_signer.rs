// crates/strike-wallet-core/src/runtime/handlers/update_signer.rs
// ============================================================================
// Module: Update Signer Handler
// Description: Proposes and applies signer slot changes.
// Purpose: Add or recover signers under config approval.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! A signer can only be cleared once it is neither a config approver nor a
//! transfer approver of any balance account.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::HandlerContext;
use super::HandlerOutcome;
use super::utils::finalize_multisig_op;
use super::utils::start_multisig_config_op;
use crate::core::address_book::Signer;
use crate::core::error::WalletError;
use crate::core::multisig_op::MultisigOpParams;
use crate::core::slots::SlotId;
use crate::core::updates::SlotUpdateType;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Proposes a signer slot update.
///
/// # Errors
///
/// Returns [`WalletError`] when the initiator is not authorized or the update
/// is invalid.
pub fn init(
    ctx: &mut HandlerContext<'_, '_>,
    slot_update_type: SlotUpdateType,
    slot_id: SlotId<Signer>,
    signer: Signer,
) -> Result<HandlerOutcome, WalletError> {
    let wallet = ctx.wallet()?;
    wallet.validate_config_initiator(&ctx.initiator)?;
    wallet.validate_signer_update(slot_update_type, slot_id, signer)?;
    let params = params(ctx, slot_update_type, slot_id, signer);
    start_multisig_config_op(ctx, &wallet, &params)
}

/// Applies an approved signer slot update.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation is pending, mismatched, or the
/// update no longer applies.
pub fn finalize(
    ctx: &mut HandlerContext<'_, '_>,
    slot_update_type: SlotUpdateType,
    slot_id: SlotId<Signer>,
    signer: Signer,
) -> Result<HandlerOutcome, WalletError> {
    let mut wallet = ctx.wallet()?;
    let params = params(ctx, slot_update_type, slot_id, signer);
    let outcome = finalize_multisig_op(ctx, &params, |_| {
        wallet.update_signers(slot_update_type, slot_id, signer)
    })?;
    ctx.put_wallet(wallet);
    Ok(outcome)
}

/// Builds the operation params.
const fn params(
    ctx: &HandlerContext<'_, '_>,
    slot_update_type: SlotUpdateType,
    slot_id: SlotId<Signer>,
    signer: Signer,
) -> MultisigOpParams {
    MultisigOpParams::UpdateSigner {
        wallet_address: ctx.wallet_address,
        slot_update_type,
        slot_id,
        signer,
    }
}
