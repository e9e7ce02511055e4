// crates/strike-wallet-core/src/runtime/handlers/balance_account_settings_update.rs
// ============================================================================
// Module: Balance Account Settings Update Handler
// Description: Proposes and applies whitelist and dApp setting changes.
// Purpose: Toggle balance account settings under config approval.
// Dependencies: crate::core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::HandlerContext;
use super::HandlerOutcome;
use super::utils::finalize_multisig_op;
use super::utils::start_multisig_config_op;
use crate::core::balance_account::BooleanSetting;
use crate::core::error::WalletError;
use crate::core::identifiers::BalanceAccountGuidHash;
use crate::core::multisig_op::MultisigOpParams;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Proposes a settings update.
///
/// # Errors
///
/// Returns [`WalletError`] when the initiator is not authorized or the
/// account does not exist.
pub fn init(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    whitelist_enabled: Option<BooleanSetting>,
    dapps_enabled: Option<BooleanSetting>,
) -> Result<HandlerOutcome, WalletError> {
    let wallet = ctx.wallet()?;
    wallet.validate_config_initiator(&ctx.initiator)?;
    wallet.clone().update_balance_account_settings(
        account_guid_hash,
        whitelist_enabled,
        dapps_enabled,
    )?;
    let params = params(ctx, account_guid_hash, whitelist_enabled, dapps_enabled);
    start_multisig_config_op(ctx, &wallet, &params)
}

/// Applies an approved settings update.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation is pending, mismatched, or the
/// account no longer exists.
pub fn finalize(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    whitelist_enabled: Option<BooleanSetting>,
    dapps_enabled: Option<BooleanSetting>,
) -> Result<HandlerOutcome, WalletError> {
    let mut wallet = ctx.wallet()?;
    let params = params(ctx, account_guid_hash, whitelist_enabled, dapps_enabled);
    let outcome = finalize_multisig_op(ctx, &params, |_| {
        wallet.update_balance_account_settings(account_guid_hash, whitelist_enabled, dapps_enabled)
    })?;
    ctx.put_wallet(wallet);
    Ok(outcome)
}

/// Builds the operation params.
const fn params(
    ctx: &HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    whitelist_enabled: Option<BooleanSetting>,
    dapps_enabled: Option<BooleanSetting>,
) -> MultisigOpParams {
    MultisigOpParams::UpdateBalanceAccountSettings {
        wallet_address: ctx.wallet_address,
        account_guid_hash: *account_guid_hash,
        whitelist_enabled,
        dapps_enabled,
    }
}
