// crates/strike-wallet-core/src/runtime/handlers/balance_account_name_update.rs
// ============================================================================
// Module: Balance Account Name Update Handler
// Description: Proposes and applies balance account renames.
// Purpose: Change an account's name hash under config approval.
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
use crate::core::identifiers::BalanceAccountNameHash;
use crate::core::multisig_op::MultisigOpParams;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Proposes a rename.
///
/// # Errors
///
/// Returns [`WalletError`] when the initiator is not authorized or the
/// account does not exist.
pub fn init(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    account_name_hash: BalanceAccountNameHash,
) -> Result<HandlerOutcome, WalletError> {
    let wallet = ctx.wallet()?;
    wallet.validate_config_initiator(&ctx.initiator)?;
    wallet.get_balance_account(account_guid_hash)?;
    let params = params(ctx, account_guid_hash, account_name_hash);
    start_multisig_config_op(ctx, &wallet, &params)
}

/// Applies an approved rename.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation is pending, mismatched, or the
/// account no longer exists.
pub fn finalize(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    account_name_hash: BalanceAccountNameHash,
) -> Result<HandlerOutcome, WalletError> {
    let mut wallet = ctx.wallet()?;
    let params = params(ctx, account_guid_hash, account_name_hash);
    let outcome = finalize_multisig_op(ctx, &params, |_| {
        wallet.update_balance_account_name(account_guid_hash, account_name_hash)
    })?;
    ctx.put_wallet(wallet);
    Ok(outcome)
}

/// Builds the operation params.
const fn params(
    ctx: &HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    account_name_hash: BalanceAccountNameHash,
) -> MultisigOpParams {
    MultisigOpParams::UpdateBalanceAccountName {
        wallet_address: ctx.wallet_address,
        account_guid_hash: *account_guid_hash,
        account_name_hash,
    }
}
