// crates/strike-wallet-core/src/lib.rs
// ============================================================================
// Module: Strike Wallet Core Library
// Description: Multi-approver wallet program over a pluggable ledger store.
// Purpose: Verify signed instructions, run the multisig state machine, and stage ledger writes.
// Dependencies: ed25519-dalek, serde, serde_jcs, sha2, thiserror, base64
// ============================================================================

//! ## Overview
//! Strike Wallet Core implements a program-based wallet: wallet actions take
//! effect only after the required approvers record their dispositions on a
//! pending [`MultisigOp`]. The [`Processor`] verifies a [`SignedTransaction`],
//! runs one [`ProgramInstruction`] against a [`StagedLedger`] overlay, and
//! commits the resulting [`LedgerChangeSet`] through a [`LedgerStore`] only
//! when the instruction succeeds.
//! Invariants:
//! - A failed instruction leaves the store untouched.
//! - Every processed transaction emits exactly one [`WalletAuditEvent`].
//! - The core never reads the system clock; hosts supply [`Timestamp`]s.
//!
//! Security posture: transactions and dApp payloads are untrusted input.
//! Signatures are checked with strict ed25519 verification and payload sizes
//! are bounded by [`ProcessorLimits`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;
pub use interfaces::DAppError;
pub use interfaces::DAppRuntime;
pub use interfaces::LedgerStore;
pub use interfaces::StoreError;
pub use interfaces::WalletAuditEvent;
pub use interfaces::WalletAuditOutcome;
pub use interfaces::WalletAuditSink;
pub use runtime::BuiltinDAppCall;
pub use runtime::BuiltinDAppRuntime;
pub use runtime::InMemoryLedgerStore;
pub use runtime::ProcessOutcome;
pub use runtime::Processor;
pub use runtime::ProcessorLimits;
pub use runtime::StagedLedger;
pub use runtime::WalletFileAuditSink;
pub use runtime::WalletMemoryAuditSink;
pub use runtime::WalletNoopAuditSink;
pub use runtime::WalletStderrAuditSink;
