// crates/strike-wallet-core/src/runtime/handlers/init_wallet.rs
// ============================================================================
// Module: Init Wallet Handler
// Description: Creates a wallet at the transaction's wallet address.
// Purpose: Apply the initial signer, approver, and address book configuration.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Wallet creation takes effect immediately. The transaction must carry a
//! signature from the wallet address key as well as the initiator's, so no
//! one can claim an address they do not hold. The initiator becomes the
//! assistant and the rent return address.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::HandlerContext;
use super::HandlerOutcome;
use crate::core::address_book::Signer;
use crate::core::error::WalletError;
use crate::core::identifiers::WalletGuidHash;
use crate::core::updates::InitialWalletConfig;
use crate::core::wallet::Wallet;

// ============================================================================
// SECTION: Handler
// ============================================================================

/// Creates the wallet.
///
/// # Errors
///
/// Returns [`WalletError::InvalidSignature`] when the wallet address key did
/// not sign, [`WalletError::WalletAlreadyInitialized`] when a wallet exists,
/// and [`WalletError`] when the configuration is invalid.
pub fn handle(
    ctx: &mut HandlerContext<'_, '_>,
    wallet_guid_hash: &WalletGuidHash,
    initial_config: &InitialWalletConfig,
) -> Result<HandlerOutcome, WalletError> {
    if !ctx.is_signed_by(&ctx.wallet_address) {
        return Err(WalletError::InvalidSignature);
    }
    if ctx.ledger.wallet(&ctx.wallet_address)?.is_some_and(|wallet| wallet.is_initialized) {
        return Err(WalletError::WalletAlreadyInitialized);
    }
    let wallet = Wallet::initialize(
        *wallet_guid_hash,
        Signer::new(ctx.initiator),
        ctx.initiator,
        initial_config,
    )?;
    ctx.put_wallet(wallet);
    Ok(HandlerOutcome::default())
}
