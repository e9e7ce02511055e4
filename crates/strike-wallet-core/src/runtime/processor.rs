// crates/strike-wallet-core/src/runtime/processor.rs
// ============================================================================
// Module: Strike Wallet Processor
// Description: Verifies, executes, commits, and audits wallet transactions.
// Purpose: Provide the single execution path every host surface calls into.
// Dependencies: serde, crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`Processor::process`] verifies signatures, requires the initiator to be
//! a verified signer, dispatches the instruction against a fresh
//! [`StagedLedger`], and commits the staged writes only on success. Exactly
//! one [`WalletAuditEvent`] is recorded per processed transaction.
//!
//! A commit rejected with [`StoreError::Conflict`] means another writer
//! changed a value the instruction read; the instruction is staged again
//! from fresh state, up to [`MAX_COMMIT_ATTEMPTS`] times.
//!
//! Security posture: transaction bytes are untrusted; size, signature count,
//! and dApp instruction count are bounded by [`ProcessorLimits`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::error::WalletError;
use crate::core::identifiers::OperationId;
use crate::core::identifiers::ParamsHash;
use crate::core::instruction::SignedTransaction;
use crate::core::instruction::VerifiedTransaction;
use crate::core::ledger::BalanceChange;
use crate::core::ledger::LedgerChangeSet;
use crate::core::multisig_op::OperationDisposition;
use crate::core::time::Timestamp;
use crate::interfaces::DAppRuntime;
use crate::interfaces::LedgerStore;
use crate::interfaces::StoreError;
use crate::interfaces::WalletAuditEvent;
use crate::interfaces::WalletAuditOutcome;
use crate::interfaces::WalletAuditSink;
use crate::runtime::handlers::HandlerContext;
use crate::runtime::handlers::dispatch;
use crate::runtime::staged::StagedLedger;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum signed transaction size in bytes.
pub const DEFAULT_MAX_TRANSACTION_BYTES: usize = 64 * 1024;

/// Default maximum signatures per transaction.
pub const DEFAULT_MAX_SIGNATURES: usize = 8;

/// Default maximum instructions per dApp transaction.
pub const DEFAULT_MAX_DAPP_INSTRUCTIONS: usize = 16;

/// Times an instruction is staged and committed before a write conflict is
/// reported to the caller.
pub const MAX_COMMIT_ATTEMPTS: usize = 3;

/// Bounds applied to untrusted transaction input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorLimits {
    /// Maximum signed transaction size in bytes.
    pub max_transaction_bytes: usize,
    /// Maximum signatures per transaction.
    pub max_signatures: usize,
    /// Maximum instructions per dApp transaction.
    pub max_dapp_instructions: usize,
}

impl Default for ProcessorLimits {
    fn default() -> Self {
        Self {
            max_transaction_bytes: DEFAULT_MAX_TRANSACTION_BYTES,
            max_signatures: DEFAULT_MAX_SIGNATURES,
            max_dapp_instructions: DEFAULT_MAX_DAPP_INSTRUCTIONS,
        }
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Result of a successfully processed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessOutcome {
    /// Instruction label.
    pub instruction: &'static str,
    /// Operation id the instruction acted on.
    pub operation_id: Option<OperationId>,
    /// Params hash of the operation touched, when known.
    pub params_hash: Option<ParamsHash>,
    /// Operation disposition after the instruction.
    pub operation_disposition: Option<OperationDisposition>,
    /// Committed balance changes.
    pub balance_changes: Vec<BalanceChange>,
}

// ============================================================================
// SECTION: Processor
// ============================================================================

/// Wallet program processor.
pub struct Processor<S, R, A> {
    /// Ledger store.
    store: S,
    /// dApp runtime.
    runtime: R,
    /// Audit sink.
    audit: A,
    /// Input limits.
    limits: ProcessorLimits,
}

impl<S, R, A> Processor<S, R, A>
where
    S: LedgerStore,
    R: DAppRuntime,
    A: WalletAuditSink,
{
    /// Creates a processor.
    #[must_use]
    pub const fn new(store: S, runtime: R, audit: A, limits: ProcessorLimits) -> Self {
        Self {
            store,
            runtime,
            audit,
            limits,
        }
    }

    /// Returns the ledger store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the input limits.
    #[must_use]
    pub const fn limits(&self) -> &ProcessorLimits {
        &self.limits
    }

    /// Decodes and processes a signed transaction.
    ///
    /// Payloads that do not decode are rejected without an audit event.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when decoding or processing fails.
    pub fn process_bytes(
        &self,
        bytes: &[u8],
        now: Timestamp,
    ) -> Result<ProcessOutcome, WalletError> {
        let signed = SignedTransaction::from_slice(bytes, self.limits.max_transaction_bytes)?;
        self.process(signed, now)
    }

    /// Processes a signed transaction at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when verification or the instruction fails;
    /// nothing is committed in that case.
    pub fn process(
        &self,
        signed: SignedTransaction,
        now: Timestamp,
    ) -> Result<ProcessOutcome, WalletError> {
        let mut event = WalletAuditEvent {
            event: "wallet_instruction",
            timestamp: now,
            instruction: signed.transaction.instruction.name(),
            wallet_address: signed.transaction.wallet_address,
            operation_id: signed.transaction.operation_id.clone(),
            initiator: signed.transaction.initiator,
            outcome: WalletAuditOutcome::Success,
            error_code: None,
            error: None,
            balance_changes: Vec::new(),
        };
        let result = signed
            .verify(self.limits.max_signatures)
            .and_then(|verified| self.commit(&verified, now));
        match &result {
            Ok(outcome) => {
                event.balance_changes.clone_from(&outcome.balance_changes);
            }
            Err(error) => {
                event.outcome = WalletAuditOutcome::Failure;
                event.error_code = Some(error.code());
                event.error = Some(error.to_string());
                if let WalletError::SimulationFinished {
                    changes,
                } = error
                {
                    event.balance_changes.clone_from(changes);
                }
            }
        }
        self.audit.record(&event);
        result
    }

    /// Stages and applies the instruction, restaging on write conflicts.
    fn commit(
        &self,
        verified: &VerifiedTransaction,
        now: Timestamp,
    ) -> Result<ProcessOutcome, WalletError> {
        let mut attempt = 1;
        loop {
            let (outcome, changes) = self.execute(verified, now)?;
            match self.store.apply(&changes) {
                Ok(()) => return Ok(outcome),
                Err(StoreError::Conflict(_)) if attempt < MAX_COMMIT_ATTEMPTS => attempt += 1,
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Runs the verified instruction, returning the staged writes.
    fn execute(
        &self,
        verified: &VerifiedTransaction,
        now: Timestamp,
    ) -> Result<(ProcessOutcome, LedgerChangeSet), WalletError> {
        let transaction = verified.transaction();
        if !verified.is_signed_by(&transaction.initiator) {
            return Err(WalletError::InvalidSignature);
        }
        let mut ledger = StagedLedger::new(&self.store);
        let handled = {
            let mut ctx = HandlerContext {
                ledger: &mut ledger,
                wallet_address: transaction.wallet_address,
                operation_id: transaction.operation_id.clone(),
                initiator: transaction.initiator,
                signers: verified.signers(),
                now,
                runtime: &self.runtime,
                limits: self.limits,
            };
            dispatch(&mut ctx, &transaction.instruction)?
        };
        let outcome = ProcessOutcome {
            instruction: transaction.instruction.name(),
            operation_id: transaction.operation_id.clone(),
            params_hash: handled.params_hash,
            operation_disposition: handled.operation_disposition,
            balance_changes: ledger.balance_changes()?,
        };
        Ok((outcome, ledger.into_change_set()))
    }
}
