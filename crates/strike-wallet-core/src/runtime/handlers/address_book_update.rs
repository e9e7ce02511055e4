// crates/strike-wallet-core/src/runtime/handlers/address_book_update.rs
// ============================================================================
// Module: Address Book Update Handler
// Description: Proposes and applies address book and whitelist changes.
// Purpose: Manage transfer destinations under config approval.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Whitelist removals in the same update are applied before entries are
//! removed, so an entry can be unlisted and removed in one proposal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::HandlerContext;
use super::HandlerOutcome;
use super::utils::finalize_multisig_op;
use super::utils::start_multisig_config_op;
use crate::core::error::WalletError;
use crate::core::multisig_op::MultisigOpParams;
use crate::core::updates::AddressBookUpdate;

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Proposes an address book update.
///
/// # Errors
///
/// Returns [`WalletError`] when the initiator is not authorized or the update
/// is invalid.
pub fn init(
    ctx: &mut HandlerContext<'_, '_>,
    update: &AddressBookUpdate,
) -> Result<HandlerOutcome, WalletError> {
    let wallet = ctx.wallet()?;
    wallet.validate_config_initiator(&ctx.initiator)?;
    wallet.validate_address_book_update(update)?;
    let params = params(ctx, update);
    start_multisig_config_op(ctx, &wallet, &params)
}

/// Applies an approved address book update.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation is pending, mismatched, or the
/// update no longer applies.
pub fn finalize(
    ctx: &mut HandlerContext<'_, '_>,
    update: &AddressBookUpdate,
) -> Result<HandlerOutcome, WalletError> {
    let mut wallet = ctx.wallet()?;
    let params = params(ctx, update);
    let outcome = finalize_multisig_op(ctx, &params, |_| wallet.update_address_book(update))?;
    ctx.put_wallet(wallet);
    Ok(outcome)
}

/// Builds the operation params.
fn params(ctx: &HandlerContext<'_, '_>, update: &AddressBookUpdate) -> MultisigOpParams {
    MultisigOpParams::AddressBookUpdate {
        wallet_address: ctx.wallet_address,
        update: update.clone(),
    }
}
