// crates/strike-wallet-config/src/lib.rs
// ============================================================================
// Module: Strike Wallet Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for strike-wallet.toml semantics.
// Dependencies: strike-wallet-core, strike-wallet-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `strike-wallet-config` defines the configuration model for the wallet
//! host: ledger store backend, audit sink, dApp runtime programs, and input
//! limits. Validation is strict and fails closed.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
