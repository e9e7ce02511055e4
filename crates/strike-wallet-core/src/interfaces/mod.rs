// crates/strike-wallet-core/src/interfaces/mod.rs
// ============================================================================
// Module: Strike Wallet Interfaces
// Description: Backend-agnostic interfaces for ledger storage, dApps, and audit.
// Purpose: Define the contract surfaces used by the wallet processor.
// Dependencies: crate::core, crate::runtime::staged, serde, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the wallet program integrates with a host without
//! embedding backend-specific details. Stores persist wallets, operations,
//! dApp transaction data, and balances; dApp runtimes execute approved dApp
//! instructions; audit sinks receive one event per processed transaction.
//!
//! Security posture: store contents and dApp payloads are untrusted;
//! implementations must fail closed on missing or invalid data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::core::error::WalletError;
use crate::core::identifiers::Address;
use crate::core::identifiers::OperationId;
use crate::core::ledger::BalanceChange;
use crate::core::ledger::BalanceKey;
use crate::core::ledger::LedgerChangeSet;
use crate::core::multisig_op::DAppInstruction;
use crate::core::multisig_op::DAppMultisigData;
use crate::core::multisig_op::MultisigOp;
use crate::core::time::Timestamp;
use crate::core::wallet::Wallet;
use crate::runtime::staged::StagedLedger;

// ============================================================================
// SECTION: Ledger Store
// ============================================================================

/// Ledger store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("ledger store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("ledger store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("ledger store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("ledger store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("ledger store error: {0}")]
    Store(String),
    /// Values the change set was staged from changed before it was applied.
    #[error("ledger store write conflict: {0}")]
    Conflict(String),
}

impl From<StoreError> for WalletError {
    fn from(error: StoreError) -> Self {
        Self::Store(error.to_string())
    }
}

/// Ledger store for wallet program state.
pub trait LedgerStore {
    /// Loads the wallet at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load_wallet(&self, address: &Address) -> Result<Option<Wallet>, StoreError>;

    /// Loads the operation record with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load_operation(&self, id: &OperationId) -> Result<Option<MultisigOp>, StoreError>;

    /// Loads the dApp transaction data stored next to an operation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load_dapp_data(&self, id: &OperationId) -> Result<Option<DAppMultisigData>, StoreError>;

    /// Returns true when an operation with this id was stored and then
    /// deleted. Closed ids stay closed for the life of the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn is_operation_closed(&self, id: &OperationId) -> Result<bool, StoreError>;

    /// Loads a balance; missing balances are zero.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load_balance(&self, key: &BalanceKey) -> Result<u64, StoreError>;

    /// Applies every write in `changes` atomically, after checking that
    /// every value in `changes.reads` still matches the store. Deleting an
    /// operation record marks its id closed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when a read value changed, or another
    /// [`StoreError`] when the writes cannot be applied; no write is visible
    /// in either case.
    fn apply(&self, changes: &LedgerChangeSet) -> Result<(), StoreError>;

    /// Reports store readiness.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl<T: LedgerStore + ?Sized> LedgerStore for Box<T> {
    fn load_wallet(&self, address: &Address) -> Result<Option<Wallet>, StoreError> {
        (**self).load_wallet(address)
    }

    fn load_operation(&self, id: &OperationId) -> Result<Option<MultisigOp>, StoreError> {
        (**self).load_operation(id)
    }

    fn load_dapp_data(&self, id: &OperationId) -> Result<Option<DAppMultisigData>, StoreError> {
        (**self).load_dapp_data(id)
    }

    fn is_operation_closed(&self, id: &OperationId) -> Result<bool, StoreError> {
        (**self).is_operation_closed(id)
    }

    fn load_balance(&self, key: &BalanceKey) -> Result<u64, StoreError> {
        (**self).load_balance(key)
    }

    fn apply(&self, changes: &LedgerChangeSet) -> Result<(), StoreError> {
        (**self).apply(changes)
    }

    fn readiness(&self) -> Result<(), StoreError> {
        (**self).readiness()
    }
}

// ============================================================================
// SECTION: dApp Runtime
// ============================================================================

/// dApp execution errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DAppError {
    /// The program id is not handled by this runtime.
    #[error("unsupported dapp program: {0}")]
    UnsupportedProgram(String),
    /// Instruction data could not be decoded.
    #[error("invalid dapp instruction data: {0}")]
    InvalidData(String),
    /// A debited account did not authorize the instruction.
    #[error("missing dapp signer: {0}")]
    MissingSigner(String),
    /// The ledger rejected a staged write.
    #[error("dapp ledger error: {0}")]
    Ledger(String),
}

impl From<WalletError> for DAppError {
    fn from(error: WalletError) -> Self {
        Self::Ledger(error.to_string())
    }
}

impl From<DAppError> for WalletError {
    fn from(error: DAppError) -> Self {
        Self::DAppInstructionFailed(error.to_string())
    }
}

/// Runtime that executes dApp instructions against staged ledger state.
pub trait DAppRuntime {
    /// Executes one instruction with `program_signer` authorizing debits.
    ///
    /// # Errors
    ///
    /// Returns [`DAppError`] when the instruction is rejected.
    fn invoke(
        &self,
        ledger: &mut StagedLedger<'_>,
        instruction: &DAppInstruction,
        program_signer: &Address,
    ) -> Result<(), DAppError>;
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Outcome recorded in a wallet audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletAuditOutcome {
    /// Instruction succeeded and its writes were committed.
    Success,
    /// Instruction failed; nothing was committed.
    Failure,
}

/// Audit event emitted for every processed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Host-supplied processing time.
    pub timestamp: Timestamp,
    /// Instruction label.
    pub instruction: &'static str,
    /// Target wallet address.
    pub wallet_address: Address,
    /// Operation id when present.
    pub operation_id: Option<OperationId>,
    /// Initiating key.
    pub initiator: Address,
    /// Processing outcome.
    pub outcome: WalletAuditOutcome,
    /// Numeric error code on failure.
    pub error_code: Option<u32>,
    /// Error message on failure.
    pub error: Option<String>,
    /// Committed balance changes, or simulated ones for a dApp simulation.
    pub balance_changes: Vec<BalanceChange>,
}

/// Audit sink for processed wallet transactions.
pub trait WalletAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &WalletAuditEvent);
}
