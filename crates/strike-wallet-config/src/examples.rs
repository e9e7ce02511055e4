// crates/strike-wallet-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and `config example`.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for `strike-wallet.toml`. The output is deterministic
//! and must always pass [`crate::StrikeWalletConfig::validate`].

/// Returns a canonical example `strike-wallet.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[store]
backend = "sqlite"
path = "strike-wallet.db"
journal_mode = "wal"
sync_mode = "full"
busy_timeout_ms = 5000

[audit]
sink = "file"
path = "strike-wallet-audit.jsonl"

[dapp]
# Empty serves every program id.
programs = []

[limits]
max_transaction_bytes = 65536
max_signatures = 8
max_dapp_instructions = 16
"#,
    )
}
