// crates/strike-wallet-core/src/core/error.rs
// ============================================================================
// Module: Strike Wallet Errors
// Description: Program error taxonomy with stable numeric codes.
// Purpose: Give hosts one error type to match on for every rejected instruction.
// Dependencies: thiserror, crate::core::ledger
// ============================================================================

//! ## Overview
//! [`WalletError`] is returned by every wallet operation. Each variant maps to
//! a stable numeric code via [`WalletError::code`] so CLIs and audit logs can
//! report failures without depending on message text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::hashing::HashError;
use crate::core::ledger::BalanceChange;

// ============================================================================
// SECTION: Wallet Error
// ============================================================================

/// Errors raised while validating or executing wallet instructions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// Instruction payload is malformed or inconsistent.
    #[error("invalid instruction: {0}")]
    InvalidInstruction(String),
    /// A signature is missing, malformed, or does not verify.
    #[error("invalid signature")]
    InvalidSignature,
    /// Initiator is neither the assistant nor an approver for the action.
    #[error("transactions can only be initiated by an authorized account")]
    UnauthorizedInitiator,
    /// Wallet already exists at the target address.
    #[error("wallet is already initialized")]
    WalletAlreadyInitialized,
    /// No wallet exists at the target address.
    #[error("wallet is not initialized")]
    WalletNotInitialized,
    /// Balance account guid is unknown to the wallet.
    #[error("balance account not found")]
    BalanceAccountNotFound,
    /// Balance account guid is already in use.
    #[error("balance account already exists")]
    BalanceAccountAlreadyExists,
    /// Wallet already holds the maximum number of balance accounts.
    #[error("too many balance accounts")]
    TooManyBalanceAccounts,
    /// Operation record does not exist.
    #[error("operation not found")]
    OperationNotFound,
    /// Operation record already exists.
    #[error("operation already exists")]
    OperationAlreadyExists,
    /// Operation is still collecting its params.
    #[error("operation is not initialized")]
    OperationNotInitialized,
    /// Operation has already been approved or denied.
    #[error("operation already has a final disposition")]
    OperationAlreadyFinal,
    /// Operation approval window has passed.
    #[error("operation has expired")]
    OperationExpired,
    /// Finalize params do not match the params the operation was started with.
    #[error("operation params do not match")]
    OperationParamsMismatch,
    /// Operation has not yet been approved or denied.
    #[error("transfer disposition is not final")]
    TransferDispositionNotFinal,
    /// Disposition value is not acceptable.
    #[error("invalid disposition")]
    InvalidDisposition,
    /// Disposition signer is not an approver of the operation.
    #[error("signer is not an approver of this operation")]
    UnknownApprover,
    /// Referenced signer does not occupy the referenced slot.
    #[error("unknown signer")]
    UnknownSigner,
    /// Approval threshold is zero or exceeds the approver count.
    #[error("invalid approver count")]
    InvalidApproverCount,
    /// Approval timeout lies outside the allowed window.
    #[error("invalid approval timeout")]
    InvalidApprovalTimeout,
    /// A policy update of the same kind is already pending.
    #[error("concurrent operations are not allowed")]
    ConcurrentOperationsNotAllowed,
    /// Slot insert batch is invalid.
    #[error("slot cannot be inserted")]
    SlotCannotBeInserted,
    /// Slot removal batch is invalid.
    #[error("slot cannot be removed")]
    SlotCannotBeRemoved,
    /// Signer cannot be removed while it is a config approver.
    #[error("signer is a config approver")]
    SignerIsConfigApprover,
    /// Signer cannot be removed while it is a transfer approver.
    #[error("signer is a transfer approver")]
    SignerIsTransferApprover,
    /// Referenced address book entry does not occupy the referenced slot.
    #[error("unknown address book entry")]
    UnknownAddressBookEntry,
    /// Address book entry is still whitelisted by a balance account.
    #[error("address book entry is in use")]
    AddressBookEntryInUse,
    /// Destination is not whitelisted for the balance account.
    #[error("destination not allowed")]
    DestinationNotAllowed,
    /// Source balance is lower than the requested amount.
    #[error("insufficient balance")]
    InsufficientBalance,
    /// Balance arithmetic overflowed.
    #[error("amount overflow")]
    AmountOverflow,
    /// dApp transactions are disabled for the balance account.
    #[error("dapps are disabled for this balance account")]
    DAppsDisabled,
    /// dApp is not in the wallet dApp book.
    #[error("dapp not allowed")]
    DAppNotAllowed,
    /// Supplied dApp instruction index exceeds the declared count.
    #[error("dapp instruction overflow")]
    DAppInstructionOverflow,
    /// A different dApp instruction was already supplied at this index.
    #[error("dapp instruction already supplied")]
    DAppInstructionAlreadySupplied,
    /// A dApp instruction failed during execution or simulation.
    #[error("dapp instruction failed: {0}")]
    DAppInstructionFailed(String),
    /// Simulation of a pending dApp transaction completed.
    #[error("simulation finished with {} balance changes", changes.len())]
    SimulationFinished {
        /// Balance changes the dApp transaction would cause.
        changes: Vec<BalanceChange>,
    },
    /// Ledger store failure.
    #[error("ledger store error: {0}")]
    Store(String),
}

impl WalletError {
    /// Returns the stable numeric code for this error.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::InvalidInstruction(_) => 1,
            Self::InvalidSignature => 2,
            Self::UnauthorizedInitiator => 3,
            Self::WalletAlreadyInitialized => 4,
            Self::WalletNotInitialized => 5,
            Self::BalanceAccountNotFound => 6,
            Self::BalanceAccountAlreadyExists => 7,
            Self::TooManyBalanceAccounts => 8,
            Self::OperationNotFound => 9,
            Self::OperationAlreadyExists => 10,
            Self::OperationNotInitialized => 11,
            Self::OperationAlreadyFinal => 12,
            Self::OperationExpired => 13,
            Self::OperationParamsMismatch => 14,
            Self::TransferDispositionNotFinal => 15,
            Self::InvalidDisposition => 16,
            Self::UnknownApprover => 17,
            Self::UnknownSigner => 18,
            Self::InvalidApproverCount => 19,
            Self::InvalidApprovalTimeout => 20,
            Self::ConcurrentOperationsNotAllowed => 21,
            Self::SlotCannotBeInserted => 22,
            Self::SlotCannotBeRemoved => 23,
            Self::SignerIsConfigApprover => 24,
            Self::SignerIsTransferApprover => 25,
            Self::UnknownAddressBookEntry => 26,
            Self::AddressBookEntryInUse => 27,
            Self::DestinationNotAllowed => 28,
            Self::InsufficientBalance => 29,
            Self::AmountOverflow => 30,
            Self::DAppsDisabled => 31,
            Self::DAppNotAllowed => 32,
            Self::DAppInstructionOverflow => 33,
            Self::DAppInstructionAlreadySupplied => 34,
            Self::DAppInstructionFailed(_) => 35,
            Self::SimulationFinished {
                ..
            } => 36,
            Self::Store(_) => 37,
        }
    }
}

impl From<HashError> for WalletError {
    fn from(err: HashError) -> Self {
        Self::InvalidInstruction(err.to_string())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
