// crates/strike-wallet-core/src/runtime/handlers/wrap_unwrap.rs
// ============================================================================
// Module: Wrap/Unwrap Handler
// Description: Proposes and executes wraps and unwraps of the native balance.
// Purpose: Move value between a balance account's native and wrapped-native balances.
// Dependencies: crate::core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::HandlerContext;
use super::HandlerOutcome;
use super::utils::finalize_multisig_op;
use super::utils::start_multisig_transfer_op;
use crate::core::balance_account::derive_balance_account_address;
use crate::core::error::WalletError;
use crate::core::identifiers::BalanceAccountGuidHash;
use crate::core::ledger::BalanceKey;
use crate::core::ledger::WRAPPED_NATIVE_MINT;
use crate::core::multisig_op::MultisigOpParams;
use crate::core::updates::WrapDirection;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Proposes a wrap or unwrap.
///
/// # Errors
///
/// Returns [`WalletError`] when the account is unknown or the initiator is
/// not authorized.
pub fn init(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    amount: u64,
    direction: WrapDirection,
) -> Result<HandlerOutcome, WalletError> {
    let wallet = ctx.wallet()?;
    let account = wallet.get_balance_account(account_guid_hash)?;
    wallet.validate_transfer_initiator(account, &ctx.initiator)?;
    let params = params(ctx, account_guid_hash, amount, direction);
    start_multisig_transfer_op(ctx, &wallet, account, Some(&params))
}

/// Executes an approved wrap or unwrap.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation is pending or mismatched, or
/// the source balance cannot cover the amount.
pub fn finalize(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    amount: u64,
    direction: WrapDirection,
) -> Result<HandlerOutcome, WalletError> {
    let wallet = ctx.wallet()?;
    wallet.get_balance_account(account_guid_hash)?;
    let owner = derive_balance_account_address(&ctx.wallet_address, account_guid_hash);
    let native = BalanceKey::native(owner);
    let wrapped = BalanceKey::token(owner, WRAPPED_NATIVE_MINT);
    let (from, to) = match direction {
        WrapDirection::Wrap => (native, wrapped),
        WrapDirection::Unwrap => (wrapped, native),
    };
    let params = params(ctx, account_guid_hash, amount, direction);
    finalize_multisig_op(ctx, &params, |ledger| ledger.transfer(from, to, amount))
}

/// Builds the operation params.
const fn params(
    ctx: &HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    amount: u64,
    direction: WrapDirection,
) -> MultisigOpParams {
    MultisigOpParams::WrapUnwrap {
        wallet_address: ctx.wallet_address,
        account_guid_hash: *account_guid_hash,
        amount,
        direction,
    }
}
