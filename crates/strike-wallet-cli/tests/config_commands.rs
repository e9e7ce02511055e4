// crates/strike-wallet-cli/tests/config_commands.rs
// ============================================================================
// Module: CLI Config Command Tests
// Description: Integration tests for config validation and store selection.
// Purpose: Ensure invalid configs fail closed before any ledger access.
// Dependencies: strike-wallet-cli binary, tempfile
// ============================================================================
//! ## Overview
//! Validates `config validate`, `config example`, and the memory backend.
//!
//! Security posture: config input is untrusted; invalid values must be
//! rejected before a store is opened.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the CLI binary path.
fn strike_wallet_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_strike-wallet"))
}

/// Runs the CLI with an explicit config path.
fn run_with_config(config: &Path, args: &[&str]) -> Output {
    Command::new(strike_wallet_bin())
        .args(args)
        .arg("--config")
        .arg(config)
        .output()
        .expect("run strike-wallet")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies the printed example config validates once written to disk.
#[test]
fn cli_config_example_validates() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(strike_wallet_bin())
        .args(["config", "example"])
        .output()
        .expect("run strike-wallet config example");
    assert!(output.status.success());
    let config = dir.path().join("strike-wallet.toml");
    fs::write(&config, &output.stdout).unwrap();

    let validated = run_with_config(&config, &["config", "validate"]);
    assert!(validated.status.success(), "{}", String::from_utf8_lossy(&validated.stderr));
    assert_eq!(String::from_utf8_lossy(&validated.stdout).trim(), "Config valid.");
}

/// Verifies invalid configs are rejected with a readable error.
#[test]
fn cli_config_validate_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("strike-wallet.toml");
    fs::write(&config, "[store]\nbackend = \"memory\"\npath = \"ledger.db\"\n").unwrap();

    let output = run_with_config(&config, &["config", "validate"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("memory store must not set path"), "unexpected stderr: {stderr}");
}

/// Verifies an explicit config path that does not exist is an error.
#[test]
fn cli_config_validate_rejects_missing_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_with_config(&dir.path().join("missing.toml"), &["config", "validate"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config io error"), "unexpected stderr: {stderr}");
}

/// Verifies the memory backend starts empty in every invocation.
#[test]
fn cli_memory_store_is_not_durable() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("strike-wallet.toml");
    fs::write(&config, "[store]\nbackend = \"memory\"\n\n[audit]\nsink = \"none\"\n").unwrap();
    let owner = "0505050505050505050505050505050505050505050505050505050505050505";

    let funded = run_with_config(&config, &["fund", "--address", owner, "--amount", "25"]);
    assert!(funded.status.success(), "{}", String::from_utf8_lossy(&funded.stderr));
    let funded: Value = serde_json::from_slice(&funded.stdout).unwrap();
    assert_eq!(funded["amount"], 25);

    let shown = run_with_config(&config, &["show", "balance", "--address", owner]);
    assert!(shown.status.success());
    let shown: Value = serde_json::from_slice(&shown.stdout).unwrap();
    assert_eq!(shown["amount"], 0);

    let operations = run_with_config(&config, &["show", "operations"]);
    let operations: Value = serde_json::from_slice(&operations.stdout).unwrap();
    assert_eq!(operations, serde_json::json!([]));
}
