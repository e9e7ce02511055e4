// crates/strike-wallet-core/src/runtime/handlers/transfer.rs
// ============================================================================
// Module: Transfer Handler
// Description: Proposes and executes transfers out of balance accounts.
// Purpose: Move native or token balances once transfer approvers approve.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! With the whitelist on, the destination and its name hash must form an
//! address book entry the account allows. The finalize step debits the
//! balance account's derived address.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::HandlerContext;
use super::HandlerOutcome;
use super::utils::finalize_multisig_op;
use super::utils::start_multisig_transfer_op;
use crate::core::balance_account::derive_balance_account_address;
use crate::core::error::WalletError;
use crate::core::identifiers::Address;
use crate::core::identifiers::AddressBookEntryNameHash;
use crate::core::identifiers::BalanceAccountGuidHash;
use crate::core::ledger::BalanceKey;
use crate::core::multisig_op::MultisigOpParams;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Transfer fields shared by init and finalize.
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest {
    /// Destination owner.
    pub destination: Address,
    /// Amount in base units.
    pub amount: u64,
    /// Token mint; `None` for native transfers.
    pub token_mint: Option<Address>,
}

impl TransferRequest {
    /// Returns the balance key of `owner` in the transferred asset.
    const fn key(&self, owner: Address) -> BalanceKey {
        BalanceKey {
            owner,
            mint: self.token_mint,
        }
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Proposes a transfer.
///
/// # Errors
///
/// Returns [`WalletError`] when the account is unknown, the initiator is not
/// authorized, or the destination is not allowed.
pub fn init(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    request: TransferRequest,
    destination_name_hash: &AddressBookEntryNameHash,
) -> Result<HandlerOutcome, WalletError> {
    let wallet = ctx.wallet()?;
    let account = wallet.get_balance_account(account_guid_hash)?;
    wallet.validate_transfer_initiator(account, &ctx.initiator)?;
    if account.is_whitelist_enabled()
        && !wallet.destination_allowed(account, &request.destination, destination_name_hash)
    {
        return Err(WalletError::DestinationNotAllowed);
    }
    let params = params(ctx, account_guid_hash, request);
    start_multisig_transfer_op(ctx, &wallet, account, Some(&params))
}

/// Executes an approved transfer.
///
/// # Errors
///
/// Returns [`WalletError`] when the operation is pending or mismatched, or
/// the balance account cannot cover the amount.
pub fn finalize(
    ctx: &mut HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    request: TransferRequest,
) -> Result<HandlerOutcome, WalletError> {
    let wallet = ctx.wallet()?;
    wallet.get_balance_account(account_guid_hash)?;
    let source = derive_balance_account_address(&ctx.wallet_address, account_guid_hash);
    let params = params(ctx, account_guid_hash, request);
    finalize_multisig_op(ctx, &params, |ledger| {
        ledger.transfer(request.key(source), request.key(request.destination), request.amount)
    })
}

/// Builds the operation params.
const fn params(
    ctx: &HandlerContext<'_, '_>,
    account_guid_hash: &BalanceAccountGuidHash,
    request: TransferRequest,
) -> MultisigOpParams {
    MultisigOpParams::Transfer {
        wallet_address: ctx.wallet_address,
        account_guid_hash: *account_guid_hash,
        destination: request.destination,
        amount: request.amount,
        token_mint: request.token_mint,
    }
}
