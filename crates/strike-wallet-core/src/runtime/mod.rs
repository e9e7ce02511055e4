// crates/strike-wallet-core/src/runtime/mod.rs
// ============================================================================
// Module: Strike Wallet Runtime
// Description: Processor, instruction handlers, staged ledger, and reference backends.
// Purpose: Execute wallet instructions against a ledger store.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement transaction processing and the reference
//! in-memory store, builtin dApp runtime, and audit sinks. Every host
//! surface must call into [`Processor`] so instructions follow one path.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod dapp;
mod handlers;
pub mod processor;
pub mod staged;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::WalletFileAuditSink;
pub use audit::WalletMemoryAuditSink;
pub use audit::WalletNoopAuditSink;
pub use audit::WalletStderrAuditSink;
pub use dapp::BuiltinDAppCall;
pub use dapp::BuiltinDAppRuntime;
pub use processor::ProcessOutcome;
pub use processor::Processor;
pub use processor::ProcessorLimits;
pub use staged::StagedLedger;
pub use store::InMemoryLedgerStore;
