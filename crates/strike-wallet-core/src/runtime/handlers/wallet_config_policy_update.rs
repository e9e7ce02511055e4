// crates/strike-wallet-core/src/runtime/handlers/wallet_config_policy_update.rs
// ============================================================================
// Module: Wallet Config Policy Update Handler
// Description: Proposes and applies changes to the config approval policy.
// Purpose: Change config thresholds, timeouts, and approvers under approval.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Only one config policy update may be pending per wallet. The lock is
//! taken at init and released at finalize whatever the outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::HandlerContext;
use super::HandlerOutcome;
use super::utils::finalize_multisig_op;
use super::utils::start_multisig_config_op;
use crate::core::error::WalletError;
use crate::core::multisig_op::MultisigOpParams;
use crate::core::updates::WalletConfigPolicyUpdate;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Proposes a config policy update.
///
/// # Errors
///
/// Returns [`WalletError`] when the initiator is not authorized, an update is
/// already pending, or the update is invalid.
pub fn init(
    ctx: &mut HandlerContext<'_, '_>,
    update: &WalletConfigPolicyUpdate,
) -> Result<HandlerOutcome, WalletError> {
    let mut wallet = ctx.wallet()?;
    wallet.validate_config_initiator(&ctx.initiator)?;
    wallet.lock_config_policy_updates()?;
    wallet.validate_config_policy_update(update)?;
    let params = params(ctx, update);
    let outcome = start_multisig_config_op(ctx, &wallet, &params)?;
    ctx.put_wallet(wallet);
    Ok(outcome)
}

/// Applies an approved config policy update and releases the lock.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation is pending, mismatched, or the
/// update no longer applies.
pub fn finalize(
    ctx: &mut HandlerContext<'_, '_>,
    update: &WalletConfigPolicyUpdate,
) -> Result<HandlerOutcome, WalletError> {
    let mut wallet = ctx.wallet()?;
    let params = params(ctx, update);
    let outcome = finalize_multisig_op(ctx, &params, |_| wallet.update_config_policy(update))?;
    wallet.unlock_config_policy_updates();
    ctx.put_wallet(wallet);
    Ok(outcome)
}

/// Builds the operation params.
fn params(ctx: &HandlerContext<'_, '_>, update: &WalletConfigPolicyUpdate) -> MultisigOpParams {
    MultisigOpParams::UpdateWalletConfigPolicy {
        wallet_address: ctx.wallet_address,
        update: update.clone(),
    }
}
