// crates/strike-wallet-core/src/runtime/handlers/dapp_book_update.rs
// ============================================================================
// Module: dApp Book Update Handler
// Description: Proposes and applies dApp book changes.
// Purpose: Manage the dApps whitelisted balance accounts may call.
// Dependencies: crate::core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::HandlerContext;
use super::HandlerOutcome;
use super::utils::finalize_multisig_op;
use super::utils::start_multisig_config_op;
use crate::core::error::WalletError;
use crate::core::multisig_op::MultisigOpParams;
use crate::core::updates::DAppBookUpdate;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Proposes a dApp book update.
///
/// # Errors
///
/// Returns [`WalletError`] when the initiator is not authorized or the update
/// is invalid.
pub fn init(
    ctx: &mut HandlerContext<'_, '_>,
    update: &DAppBookUpdate,
) -> Result<HandlerOutcome, WalletError> {
    let wallet = ctx.wallet()?;
    wallet.validate_config_initiator(&ctx.initiator)?;
    wallet.validate_dapp_book_update(update)?;
    let params = params(ctx, update);
    start_multisig_config_op(ctx, &wallet, &params)
}

/// Applies an approved dApp book update.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation is pending, mismatched, or the
/// update no longer applies.
pub fn finalize(
    ctx: &mut HandlerContext<'_, '_>,
    update: &DAppBookUpdate,
) -> Result<HandlerOutcome, WalletError> {
    let mut wallet = ctx.wallet()?;
    let params = params(ctx, update);
    let outcome = finalize_multisig_op(ctx, &params, |_| wallet.update_dapp_book(update))?;
    ctx.put_wallet(wallet);
    Ok(outcome)
}

/// Builds the operation params.
fn params(ctx: &HandlerContext<'_, '_>, update: &DAppBookUpdate) -> MultisigOpParams {
    MultisigOpParams::DAppBookUpdate {
        wallet_address: ctx.wallet_address,
        update: update.clone(),
    }
}
