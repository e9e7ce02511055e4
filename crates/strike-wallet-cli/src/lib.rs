// crates/strike-wallet-cli/src/lib.rs
// ============================================================================
// Module: Strike Wallet CLI Library
// Description: Shared helpers for the Strike Wallet command-line interface.
// Purpose: Provide the message catalog for the CLI binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library module houses the CLI message catalog. The binary entry point
//! (`src/main.rs`) routes every user-facing string through [`t!`] so output
//! stays consistent.
//!
//! Security posture: CLI inputs are untrusted and must be validated.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog and formatting helpers.
pub mod i18n;
