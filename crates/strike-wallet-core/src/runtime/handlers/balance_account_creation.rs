// crates/strike-wallet-core/src/runtime/handlers/balance_account_creation.rs
// ============================================================================
// Module: Balance Account Creation Handler
// Description: Proposes and creates balance accounts.
// Purpose: Add balance accounts with their own transfer policy under config approval.
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
use crate::core::identifiers::BalanceAccountGuidHash;
use crate::core::multisig_op::MultisigOpParams;
use crate::core::updates::BalanceAccountCreation;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Proposes a balance account.
///
/// # Errors
///
/// Returns [`WalletError`] when the initiator is not authorized or the
/// account could not be created.
pub fn init(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    creation_params: &BalanceAccountCreation,
) -> Result<HandlerOutcome, WalletError> {
    let wallet = ctx.wallet()?;
    wallet.validate_config_initiator(&ctx.initiator)?;
    wallet.validate_add_balance_account(account_guid_hash, creation_params)?;
    let params = params(ctx, account_guid_hash, creation_params);
    start_multisig_config_op(ctx, &wallet, &params)
}

/// Creates an approved balance account.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation is pending, mismatched, or the
/// account can no longer be created.
pub fn finalize(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    creation_params: &BalanceAccountCreation,
) -> Result<HandlerOutcome, WalletError> {
    let mut wallet = ctx.wallet()?;
    let params = params(ctx, account_guid_hash, creation_params);
    let outcome = finalize_multisig_op(ctx, &params, |_| {
        wallet.add_balance_account(account_guid_hash, creation_params)
    })?;
    ctx.put_wallet(wallet);
    Ok(outcome)
}

/// Builds the operation params.
fn params(
    ctx: &HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    creation_params: &BalanceAccountCreation,
) -> MultisigOpParams {
    MultisigOpParams::CreateBalanceAccount {
        wallet_address: ctx.wallet_address,
        account_guid_hash: *account_guid_hash,
        creation_params: creation_params.clone(),
    }
}
