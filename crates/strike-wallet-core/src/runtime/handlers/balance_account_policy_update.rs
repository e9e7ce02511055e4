// crates/strike-wallet-core/src/runtime/handlers/balance_account_policy_update.rs
// ============================================================================
// Module: Balance Account Policy Update Handler
// Description: Proposes and applies balance account transfer policy changes.
// Purpose: Change transfer thresholds, timeouts, and approvers under config approval.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Only one policy update may be pending per balance account. The account
//! lock is taken at init and released at finalize whatever the outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::HandlerContext;
use super::HandlerOutcome;
use super::utils::finalize_multisig_op;
use super::utils::start_multisig_config_op;
use crate::core::error::WalletError;
use crate::core::identifiers::BalanceAccountGuidHash;
use crate::core::multisig_op::MultisigOpParams;
use crate::core::updates::BalanceAccountPolicyUpdate;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Proposes a policy update.
///
/// # Errors
///
/// Returns [`WalletError`] when the initiator is not authorized, an update is
/// already pending, or the update is invalid.
pub fn init(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    update: &BalanceAccountPolicyUpdate,
) -> Result<HandlerOutcome, WalletError> {
    let mut wallet = ctx.wallet()?;
    wallet.validate_config_initiator(&ctx.initiator)?;
    wallet.lock_balance_account_policy_updates(account_guid_hash)?;
    wallet.validate_balance_account_policy_update(account_guid_hash, update)?;
    let params = params(ctx, account_guid_hash, update);
    let outcome = start_multisig_config_op(ctx, &wallet, &params)?;
    ctx.put_wallet(wallet);
    Ok(outcome)
}

/// Applies an approved policy update and releases the account lock.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation is pending, mismatched, or the
/// update no longer applies.
pub fn finalize(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    update: &BalanceAccountPolicyUpdate,
) -> Result<HandlerOutcome, WalletError> {
    let mut wallet = ctx.wallet()?;
    let params = params(ctx, account_guid_hash, update);
    let outcome = finalize_multisig_op(ctx, &params, |_| {
        wallet.update_balance_account_policy(account_guid_hash, update)
    })?;
    wallet.unlock_balance_account_policy_updates(account_guid_hash)?;
    ctx.put_wallet(wallet);
    Ok(outcome)
}

/// Builds the operation params.
fn params(
    ctx: &HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    update: &BalanceAccountPolicyUpdate,
) -> MultisigOpParams {
    MultisigOpParams::UpdateBalanceAccountPolicy {
        wallet_address: ctx.wallet_address,
        account_guid_hash: *account_guid_hash,
        update: update.clone(),
    }
}
