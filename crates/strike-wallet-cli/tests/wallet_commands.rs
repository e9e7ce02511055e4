// crates/strike-wallet-cli/tests/wallet_commands.rs
// ============================================================================
// Module: CLI Wallet Command Tests
// Description: End-to-end tests for key, transaction, and ledger commands.
// Purpose: Drive the strike-wallet binary against a temporary SQLite ledger.
// Dependencies: strike-wallet-cli binary, strike-wallet-core, tempfile
// ============================================================================
//! ## Overview
//! Runs the `strike-wallet` binary the way an operator would: keys are
//! generated on disk, transactions are built from core types, signed by the
//! CLI, and submitted against a SQLite ledger configured in a temp directory.
//! Each workspace holds a fixed wallet address key that co-signs wallet
//! creation.
//!
//! Security posture: every submitted transaction is verified by the
//! processor; rejected transactions must leave the ledger unchanged.

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
use std::time::Duration;

use ed25519_dalek::SigningKey;
use serde_json::Value;
use strike_wallet_core::Address;
use strike_wallet_core::AddressBookEntryNameHash;
use strike_wallet_core::BalanceAccountCreation;
use strike_wallet_core::BalanceAccountGuidHash;
use strike_wallet_core::BalanceAccountNameHash;
use strike_wallet_core::BooleanSetting;
use strike_wallet_core::InitialWalletConfig;
use strike_wallet_core::MultisigOpParams;
use strike_wallet_core::OperationId;
use strike_wallet_core::ProgramInstruction;
use strike_wallet_core::SignedTransaction;
use strike_wallet_core::Signer;
use strike_wallet_core::SlotId;
use strike_wallet_core::Transaction;
use strike_wallet_core::WalletGuidHash;
use strike_wallet_core::derive_balance_account_address;
use strike_wallet_core::signing_key_address;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Processing time passed to every submit.
const NOW: &str = "1700000000";

/// Largest transaction file `sign` reads.
const MAX_TRANSACTION_INPUT_BYTES: usize = 1024 * 1024;

/// Raw bytes of the wallet address key.
const WALLET_KEY_BYTES: [u8; 32] = [200; 32];

/// Returns the CLI binary path.
fn strike_wallet_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_strike-wallet"))
}

/// Temp directory holding a config, a SQLite ledger, and key files.
struct Workspace {
    /// Owned temp directory.
    dir: TempDir,
    /// Config file path.
    config: PathBuf,
}

impl Workspace {
    /// Creates a workspace with a SQLite store and a file audit sink.
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("strike-wallet.toml");
        let contents = format!(
            "[store]\nbackend = \"sqlite\"\npath = '{}'\n\n[audit]\nsink = \"file\"\npath = '{}'\n",
            dir.path().join("ledger.db").display(),
            dir.path().join("audit.jsonl").display()
        );
        fs::write(&config, contents).unwrap();
        fs::write(dir.path().join("wallet.key"), WALLET_KEY_BYTES).unwrap();
        Self {
            dir,
            config,
        }
    }

    /// Returns the wallet address key file.
    fn wallet_key(&self) -> PathBuf {
        self.path("wallet.key")
    }

    /// Returns a path inside the workspace.
    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Runs the CLI with the workspace config.
    fn run(&self, args: &[&str]) -> Output {
        Command::new(strike_wallet_bin())
            .args(args)
            .arg("--config")
            .arg(&self.config)
            .output()
            .expect("run strike-wallet")
    }

    /// Runs the CLI and requires success.
    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "command {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    /// Runs the CLI and parses stdout as JSON.
    fn run_json(&self, args: &[&str]) -> Value {
        serde_json::from_str(&self.run_ok(args)).unwrap()
    }

    /// Generates a key file and returns its address.
    fn keygen(&self, name: &str) -> (PathBuf, Address) {
        let path = self.path(name);
        let output = self.run_json(&["keygen", "--out", path.to_str().unwrap()]);
        let address = output["address"].as_str().unwrap().parse().unwrap();
        (path, address)
    }

    /// Writes an unsigned transaction, signs it with `key`, and submits it.
    fn submit(&self, key: &Path, transaction: &Transaction) -> Output {
        self.submit_with(&[key], transaction)
    }

    /// Writes an unsigned transaction, signs it with every key, and submits it.
    fn submit_with(&self, keys: &[&Path], transaction: &Transaction) -> Output {
        let unsigned = self.path("unsigned.json");
        let signed = self.path("signed.json");
        fs::write(&unsigned, serde_json::to_vec(transaction).unwrap()).unwrap();
        let mut args = vec!["sign", "--tx", unsigned.to_str().unwrap()];
        for key in keys {
            args.push("--key");
            args.push(key.to_str().unwrap());
        }
        args.push("--out");
        args.push(signed.to_str().unwrap());
        self.run_ok(&args);
        self.run(&["submit", "--tx", signed.to_str().unwrap(), "--now", NOW])
    }

    /// Creates the wallet with `key` as assistant and sole approver.
    fn create_wallet(&self, key: &Path, owner: Address) -> Value {
        let wallet_key = self.wallet_key();
        self.submit_ok_with(
            &[key, wallet_key.as_path()],
            &transaction(owner, None, init_wallet(owner)),
        )
    }

    /// Submits and requires success, returning the outcome JSON.
    fn submit_ok(&self, key: &Path, transaction: &Transaction) -> Value {
        self.submit_ok_with(&[key], transaction)
    }

    /// Submits with every key and requires success, returning the outcome JSON.
    fn submit_ok_with(&self, keys: &[&Path], transaction: &Transaction) -> Value {
        let output = self.submit_with(keys, transaction);
        assert!(
            output.status.success(),
            "submit failed: {}",
            String::from_utf8_lossy(&output.stdout)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

/// Wallet address used by the flows.
fn wallet_address() -> Address {
    signing_key_address(&SigningKey::from_bytes(&WALLET_KEY_BYTES))
}

/// Builds a transaction against the test wallet.
fn transaction(
    initiator: Address,
    operation_id: Option<&str>,
    instruction: ProgramInstruction,
) -> Transaction {
    Transaction {
        wallet_address: wallet_address(),
        operation_id: operation_id.map(OperationId::from),
        initiator,
        instruction,
    }
}

/// Builds the wallet creation instruction with `signer` as the sole approver.
fn init_wallet(signer: Address) -> ProgramInstruction {
    let slots = vec![(SlotId::new(0), Signer::new(signer))];
    ProgramInstruction::InitWallet {
        wallet_guid_hash: WalletGuidHash::new([7; 32]),
        initial_config: InitialWalletConfig {
            approvals_required_for_config: 1,
            approval_timeout_for_config: Duration::from_secs(3600),
            signers: slots.clone(),
            config_approvers: slots,
            address_book: Vec::new(),
        },
    }
}

/// Returns balance account parameters with `signer` as the sole approver.
fn account_creation(signer: Address) -> BalanceAccountCreation {
    BalanceAccountCreation {
        name_hash: BalanceAccountNameHash::new([60; 32]),
        approvals_required_for_transfer: 1,
        approval_timeout_for_transfer: Duration::from_secs(3600),
        transfer_approvers: vec![(SlotId::new(0), Signer::new(signer))],
        whitelist_enabled: BooleanSetting::Off,
        dapps_enabled: BooleanSetting::Off,
    }
}

// ============================================================================
// SECTION: Key Commands
// ============================================================================

/// Verifies keygen writes a key whose address matches `address`.
#[test]
fn cli_keygen_and_address_agree() {
    let workspace = Workspace::new();
    let (key, address) = workspace.keygen("owner.key");
    assert!(key.exists());
    let printed = workspace.run_json(&["address", "--key", key.to_str().unwrap()]);
    assert_eq!(printed["address"].as_str().unwrap(), address.to_string());
}

/// Verifies keygen never overwrites an existing key file.
#[test]
fn cli_keygen_refuses_to_overwrite() {
    let workspace = Workspace::new();
    let path = workspace.path("owner.key");
    fs::write(&path, "existing").unwrap();
    let output = workspace.run(&["keygen", "--out", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert_eq!(fs::read_to_string(&path).unwrap(), "existing");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to write signing key"), "unexpected stderr: {stderr}");
}

/// Verifies malformed key files are rejected.
#[test]
fn cli_address_rejects_invalid_key() {
    let workspace = Workspace::new();
    let path = workspace.path("bad.key");
    fs::write(&path, "too short").unwrap();
    let output = workspace.run(&["address", "--key", path.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be 32 raw bytes"), "unexpected stderr: {stderr}");
}

/// Verifies repeated `--key` flags collect one signature per key.
#[test]
fn cli_sign_collects_multiple_signatures() {
    let workspace = Workspace::new();
    let (first, first_address) = workspace.keygen("first.key");
    let (second, _) = workspace.keygen("second.key");
    let unsigned = workspace.path("unsigned.json");
    let tx = transaction(first_address, None, init_wallet(first_address));
    fs::write(&unsigned, serde_json::to_vec(&tx).unwrap()).unwrap();
    let signed = workspace.run_json(&[
        "sign",
        "--tx",
        unsigned.to_str().unwrap(),
        "--key",
        first.to_str().unwrap(),
        "--key",
        second.to_str().unwrap(),
    ]);
    assert_eq!(signed["signatures"].as_array().unwrap().len(), 2);
}

/// Verifies `sign` refuses transaction files larger than any processor accepts.
#[test]
fn cli_sign_rejects_oversized_transaction() {
    let workspace = Workspace::new();
    let (key, _) = workspace.keygen("owner.key");
    let oversized = workspace.path("oversized.json");
    fs::write(&oversized, vec![b' '; MAX_TRANSACTION_INPUT_BYTES + 1]).unwrap();
    let output = workspace.run(&[
        "sign",
        "--tx",
        oversized.to_str().unwrap(),
        "--key",
        key.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Refusing to read transaction"), "unexpected stderr: {stderr}");
}

// ============================================================================
// SECTION: Submit
// ============================================================================

/// Verifies an approved transfer moves funds through the durable ledger.
#[test]
fn cli_transfer_flow_moves_balance() {
    let workspace = Workspace::new();
    let (key, owner) = workspace.keygen("owner.key");

    let created = workspace.create_wallet(&key, owner);
    assert_eq!(created["instruction"], "init_wallet");
    let wallet = workspace.run_json(&["show", "wallet", "--address", &wallet_address().to_string()]);
    assert_eq!(wallet["assistant"]["key"], owner.to_string());

    let guid = BalanceAccountGuidHash::new([1; 32]);
    let creation = account_creation(owner);
    let opened = workspace.submit_ok(
        &key,
        &transaction(
            owner,
            Some("create-account"),
            ProgramInstruction::InitBalanceAccountCreation {
                account_guid_hash: guid,
                creation_params: creation.clone(),
            },
        ),
    );
    assert_eq!(opened["operation_disposition"], "approved");
    let pending = workspace.run_json(&["show", "operations"]);
    assert_eq!(pending, serde_json::json!(["create-account"]));
    let op = workspace.run_json(&["show", "operation", "--id", "create-account"]);
    assert_eq!(op["initiator"], owner.to_string());

    workspace.submit_ok(
        &key,
        &transaction(
            owner,
            Some("create-account"),
            ProgramInstruction::FinalizeBalanceAccountCreation {
                account_guid_hash: guid,
                creation_params: creation,
            },
        ),
    );
    assert_eq!(workspace.run_json(&["show", "operations"]), serde_json::json!([]));

    let derived = workspace.run_json(&[
        "derive",
        "balance-account",
        "--wallet",
        &wallet_address().to_string(),
        "--guid-hash",
        &guid.to_string(),
    ]);
    let source = derive_balance_account_address(&wallet_address(), &guid);
    assert_eq!(derived["address"], source.to_string());

    let funded =
        workspace.run_json(&["fund", "--address", &source.to_string(), "--amount", "1000"]);
    assert_eq!(funded["amount"], 1000);

    let destination = Address::new([50; 32]);
    workspace.submit_ok(
        &key,
        &transaction(
            owner,
            Some("transfer"),
            ProgramInstruction::InitTransfer {
                account_guid_hash: guid,
                amount: 300,
                destination,
                destination_name_hash: AddressBookEntryNameHash::new([51; 32]),
                token_mint: None,
            },
        ),
    );
    let finalized = workspace.submit_ok(
        &key,
        &transaction(
            owner,
            Some("transfer"),
            ProgramInstruction::FinalizeTransfer {
                account_guid_hash: guid,
                amount: 300,
                destination,
                token_mint: None,
            },
        ),
    );
    assert_eq!(finalized["balance_changes"].as_array().unwrap().len(), 2);

    let received =
        workspace.run_json(&["show", "balance", "--address", &destination.to_string()]);
    assert_eq!(received["amount"], 300);
    let remaining = workspace.run_json(&["show", "balance", "--address", &source.to_string()]);
    assert_eq!(remaining["amount"], 700);

    let audit = fs::read_to_string(workspace.path("audit.jsonl")).unwrap();
    assert_eq!(audit.lines().count(), 5);

    let replayed = workspace.submit(
        &key,
        &transaction(
            owner,
            Some("transfer"),
            ProgramInstruction::InitTransfer {
                account_guid_hash: guid,
                amount: 300,
                destination,
                destination_name_hash: AddressBookEntryNameHash::new([51; 32]),
                token_mint: None,
            },
        ),
    );
    assert!(!replayed.status.success());
    let failure: Value = serde_json::from_slice(&replayed.stdout).unwrap();
    assert_eq!(failure["error_code"], 10);
    let remaining = workspace.run_json(&["show", "balance", "--address", &source.to_string()]);
    assert_eq!(remaining["amount"], 700);
}

/// Verifies a rejected transaction prints its error code and exits non-zero.
#[test]
fn cli_submit_reports_rejection() {
    let workspace = Workspace::new();
    let (key, owner) = workspace.keygen("owner.key");
    workspace.create_wallet(&key, owner);

    let wallet_key = workspace.wallet_key();
    let output = workspace.submit_with(
        &[key.as_path(), wallet_key.as_path()],
        &transaction(owner, None, init_wallet(owner)),
    );
    assert!(!output.status.success());
    let failure: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(failure["error_code"], 4);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Transaction rejected (code 4)"), "unexpected stderr: {stderr}");
}

/// Verifies a wallet is not created unless the wallet address key signs.
#[test]
fn cli_init_wallet_requires_wallet_key() {
    let workspace = Workspace::new();
    let (key, owner) = workspace.keygen("owner.key");
    let output = workspace.submit(&key, &transaction(owner, None, init_wallet(owner)));
    assert!(!output.status.success());
    let failure: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(failure["error_code"], 2);
    let missing =
        workspace.run(&["show", "wallet", "--address", &wallet_address().to_string()]);
    assert!(!missing.status.success());
}

/// Verifies unsigned transactions are rejected as unsigned by the initiator.
#[test]
fn cli_submit_rejects_unsigned_transaction() {
    let workspace = Workspace::new();
    let (_, owner) = workspace.keygen("owner.key");
    let unsigned = workspace.path("unsigned.json");
    let tx = SignedTransaction::new(transaction(owner, None, init_wallet(owner)));
    fs::write(&unsigned, serde_json::to_vec(&tx).unwrap()).unwrap();
    let output = workspace.run(&["submit", "--tx", unsigned.to_str().unwrap(), "--now", NOW]);
    assert!(!output.status.success());
    let failure: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(failure["error_code"], 2);
    let missing =
        workspace.run(&["show", "wallet", "--address", &wallet_address().to_string()]);
    assert!(!missing.status.success());
}

// ============================================================================
// SECTION: Inspection
// ============================================================================

/// Verifies missing operations produce a readable error.
#[test]
fn cli_show_operation_reports_missing() {
    let workspace = Workspace::new();
    let output = workspace.run(&["show", "operation", "--id", "nope"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Operation nope not found."), "unexpected stderr: {stderr}");
}

/// Verifies `hash-params` prints the same hash the processor computes.
#[test]
fn cli_hash_params_matches_core() {
    let workspace = Workspace::new();
    let params = MultisigOpParams::Transfer {
        wallet_address: wallet_address(),
        account_guid_hash: BalanceAccountGuidHash::new([1; 32]),
        destination: Address::new([50; 32]),
        amount: 300,
        token_mint: None,
    };
    let path = workspace.path("params.json");
    fs::write(&path, serde_json::to_vec(&params).unwrap()).unwrap();
    let printed = workspace.run_ok(&["hash-params", "--params", path.to_str().unwrap()]);
    assert_eq!(printed.trim(), params.hash().unwrap().to_string());
}

/// Verifies token balances are tracked separately from native balances.
#[test]
fn cli_fund_tracks_token_balances() {
    let workspace = Workspace::new();
    let owner = Address::new([5; 32]).to_string();
    let mint = Address::new([6; 32]).to_string();
    workspace.run_ok(&["fund", "--address", &owner, "--amount", "40", "--mint", &mint]);
    let token = workspace.run_json(&["show", "balance", "--address", &owner, "--mint", &mint]);
    assert_eq!(token["amount"], 40);
    assert_eq!(token["mint"], mint);
    let native = workspace.run_json(&["show", "balance", "--address", &owner]);
    assert_eq!(native["amount"], 0);
}
