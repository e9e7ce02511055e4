// crates/strike-wallet-cli/src/main.rs
// ============================================================================
// Module: Strike Wallet CLI Entry Point
// Description: Command dispatcher for key, transaction, and ledger workflows.
// Purpose: Drive the wallet processor against a configured local ledger.
// Dependencies: clap, ed25519-dalek, base64, serde, strike-wallet-{core,config,store-sqlite}
// ============================================================================

//! ## Overview
//! The Strike Wallet CLI generates keys, signs transactions, submits them to
//! the wallet processor over the configured ledger store, and inspects ledger
//! records. All user-facing strings are routed through the message catalog.
//! Security posture: inputs are untrusted; every file read is size bounded
//! and secret keys are never printed.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use serde::Serialize;
use serde::de::DeserializeOwned;
use strike_wallet_cli::t;
use strike_wallet_config::AuditSinkType;
use strike_wallet_config::MAX_TRANSACTION_BYTES_LIMIT;
use strike_wallet_config::StrikeWalletConfig;
use strike_wallet_config::config_toml_example;
use strike_wallet_core::Address;
use strike_wallet_core::BalanceAccountGuidHash;
use strike_wallet_core::BalanceChange;
use strike_wallet_core::BalanceKey;
use strike_wallet_core::BuiltinDAppRuntime;
use strike_wallet_core::InMemoryLedgerStore;
use strike_wallet_core::LedgerStore;
use strike_wallet_core::MultisigOpParams;
use strike_wallet_core::OperationId;
use strike_wallet_core::Processor;
use strike_wallet_core::SignedTransaction;
use strike_wallet_core::Timestamp;
use strike_wallet_core::Transaction;
use strike_wallet_core::WalletAuditSink;
use strike_wallet_core::WalletError;
use strike_wallet_core::WalletFileAuditSink;
use strike_wallet_core::WalletNoopAuditSink;
use strike_wallet_core::WalletStderrAuditSink;
use strike_wallet_core::derive_balance_account_address;
use strike_wallet_core::hashing::canonical_json_bytes_with_limit;
use strike_wallet_core::signing_key_address;
use strike_wallet_store_sqlite::SqliteLedgerStore;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a signing key file.
const MAX_SIGNING_KEY_BYTES: usize = 4 * 1024;
/// Maximum size of a transaction file read by `sign`; the largest
/// transaction any configured processor accepts.
const MAX_TRANSACTION_INPUT_BYTES: usize = MAX_TRANSACTION_BYTES_LIMIT;
/// Maximum size of a multisig params JSON input.
const MAX_PARAMS_BYTES: usize = 256 * 1024;
/// Maximum size of JSON written to stdout or an output file.
const MAX_OUTPUT_BYTES: usize = 8 * 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "strike-wallet", version, disable_help_subcommand = true)]
struct Cli {
    /// Config file path (defaults to `STRIKE_WALLET_CONFIG` or strike-wallet.toml).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new ed25519 signing key.
    Keygen(KeygenCommand),
    /// Print the address of a signing key.
    Address(AddressCommand),
    /// Sign a transaction with one or more keys.
    Sign(SignCommand),
    /// Verify, process, and commit a signed transaction.
    Submit(SubmitCommand),
    /// Credit a ledger balance outside the wallet program.
    Fund(FundCommand),
    /// Print ledger records.
    Show {
        /// Selected record kind.
        #[command(subcommand)]
        command: ShowCommand,
    },
    /// Derive program addresses.
    Derive {
        /// Selected derivation.
        #[command(subcommand)]
        command: DeriveCommand,
    },
    /// Print the params hash of a multisig operation proposal.
    HashParams(HashParamsCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for key generation.
#[derive(Args, Debug)]
struct KeygenCommand {
    /// Output path for the base64 secret key.
    #[arg(long, value_name = "PATH")]
    out: PathBuf,
}

/// Arguments for printing a key address.
#[derive(Args, Debug)]
struct AddressCommand {
    /// Signing key file.
    #[arg(long, value_name = "PATH")]
    key: PathBuf,
}

/// Arguments for signing.
#[derive(Args, Debug)]
struct SignCommand {
    /// Transaction or signed transaction JSON file.
    #[arg(long, value_name = "PATH")]
    tx: PathBuf,
    /// Signing key files; repeat for co-signers.
    #[arg(long = "key", value_name = "PATH", required = true)]
    keys: Vec<PathBuf>,
    /// Output path for the signed transaction (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

/// Arguments for submission.
#[derive(Args, Debug)]
struct SubmitCommand {
    /// Signed transaction JSON file.
    #[arg(long, value_name = "PATH")]
    tx: PathBuf,
    /// Processing time override (unix seconds).
    #[arg(long, value_name = "SECS")]
    now: Option<i64>,
}

/// Arguments for funding.
#[derive(Args, Debug)]
struct FundCommand {
    /// Balance owner.
    #[arg(long, value_name = "HEX")]
    address: Address,
    /// Amount in base units.
    #[arg(long)]
    amount: u64,
    /// Token mint; native balance when absent.
    #[arg(long, value_name = "HEX")]
    mint: Option<Address>,
}

/// Record kinds for `show`.
#[derive(Subcommand, Debug)]
enum ShowCommand {
    /// Print a wallet.
    Wallet {
        /// Wallet address.
        #[arg(long, value_name = "HEX")]
        address: Address,
    },
    /// Print a pending multisig operation.
    Operation {
        /// Operation id.
        #[arg(long, value_name = "ID")]
        id: String,
    },
    /// List pending operation ids.
    Operations,
    /// Print a balance.
    Balance {
        /// Balance owner.
        #[arg(long, value_name = "HEX")]
        address: Address,
        /// Token mint; native balance when absent.
        #[arg(long, value_name = "HEX")]
        mint: Option<Address>,
    },
}

/// Derivations for `derive`.
#[derive(Subcommand, Debug)]
enum DeriveCommand {
    /// Derive the ledger address of a balance account.
    BalanceAccount {
        /// Wallet address.
        #[arg(long, value_name = "HEX")]
        wallet: Address,
        /// Balance account guid hash.
        #[arg(long, value_name = "HEX")]
        guid_hash: BalanceAccountGuidHash,
    },
}

/// Arguments for params hashing.
#[derive(Args, Debug)]
struct HashParamsCommand {
    /// Multisig params JSON file.
    #[arg(long, value_name = "PATH")]
    params: PathBuf,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the config.
    Validate,
    /// Print a canonical example config.
    Example,
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Printed when a submitted transaction is rejected.
#[derive(Debug, Serialize)]
struct SubmitFailure {
    /// Stable numeric error code.
    error_code: u32,
    /// Error message.
    error: String,
    /// Simulated balance changes for a pending dApp transaction.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    balance_changes: Vec<BalanceChange>,
}

/// Printed by `show balance` and `fund`.
#[derive(Debug, Serialize)]
struct BalanceOutput {
    /// Balance owner.
    owner: Address,
    /// Token mint, when not native.
    mint: Option<Address>,
    /// Amount in base units.
    amount: u64,
}

/// Printed by `keygen` and `address`.
#[derive(Debug, Serialize)]
struct AddressOutput {
    /// Key address.
    address: Address,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Errors raised by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Keygen(command) => command_keygen(&command),
        Commands::Address(command) => command_address(&command),
        Commands::Sign(command) => command_sign(&command),
        Commands::Submit(command) => command_submit(config_path, &command),
        Commands::Fund(command) => command_fund(config_path, &command),
        Commands::Show {
            command,
        } => command_show(config_path, command),
        Commands::Derive {
            command,
        } => command_derive(&command),
        Commands::HashParams(command) => command_hash_params(&command),
        Commands::Config {
            command,
        } => command_config(config_path, &command),
    }
}

// ============================================================================
// SECTION: Key Commands
// ============================================================================

/// Executes the `keygen` command.
fn command_keygen(command: &KeygenCommand) -> CliResult<ExitCode> {
    let key = SigningKey::generate(&mut OsRng);
    let encoded = BASE64.encode(key.to_bytes());
    let mut file = OpenOptions::new().write(true).create_new(true).open(&command.out).map_err(
        |err| CliError::new(t!("keygen.write_failed", path = command.out.display(), error = err)),
    )?;
    writeln!(file, "{encoded}").map_err(|err| {
        CliError::new(t!("keygen.write_failed", path = command.out.display(), error = err))
    })?;
    write_canonical_json(&AddressOutput {
        address: signing_key_address(&key),
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `address` command.
fn command_address(command: &AddressCommand) -> CliResult<ExitCode> {
    let key = load_signing_key(&command.key)?;
    write_canonical_json(&AddressOutput {
        address: signing_key_address(&key),
    })?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Transaction Commands
// ============================================================================

/// Executes the `sign` command.
fn command_sign(command: &SignCommand) -> CliResult<ExitCode> {
    let bytes = read_input(&command.tx, "transaction", MAX_TRANSACTION_INPUT_BYTES)?;
    let mut signed = parse_transaction_input(&bytes)
        .map_err(|err| CliError::new(t!("input.parse_failed", kind = "transaction", error = err)))?;
    for path in &command.keys {
        let key = load_signing_key(path)?;
        signed
            .sign(&key)
            .map_err(|err| CliError::new(t!("sign.failed", error = err)))?;
    }
    match &command.out {
        Some(path) => write_canonical_json_file(path, &signed)?,
        None => write_canonical_json(&signed)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `submit` command.
fn command_submit(config_path: Option<&Path>, command: &SubmitCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let limits = config.processor_limits();
    let bytes = read_input(&command.tx, "transaction", limits.max_transaction_bytes)?;
    let now = resolve_now(command.now)?;
    let store = open_store(&config)?;
    let processor = Processor::new(
        store.into_ledger(),
        BuiltinDAppRuntime::with_programs(config.dapp.programs.iter().copied()),
        build_audit_sink(&config)?,
        limits,
    );
    match processor.process_bytes(&bytes, now) {
        Ok(outcome) => {
            write_canonical_json(&outcome)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            let failure = submit_failure(error);
            write_canonical_json(&failure)?;
            write_stderr_line(&t!(
                "submit.failed",
                code = failure.error_code,
                error = failure.error
            ))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Converts a processing error into its printed form.
fn submit_failure(error: WalletError) -> SubmitFailure {
    let error_code = error.code();
    let message = error.to_string();
    let balance_changes = match error {
        WalletError::SimulationFinished {
            changes,
        } => changes,
        _ => Vec::new(),
    };
    SubmitFailure {
        error_code,
        error: message,
        balance_changes,
    }
}

/// Executes the `hash-params` command.
fn command_hash_params(command: &HashParamsCommand) -> CliResult<ExitCode> {
    let params: MultisigOpParams = read_json(&command.params, "params", MAX_PARAMS_BYTES)?;
    let hash = params
        .hash()
        .map_err(|err| CliError::new(t!("input.parse_failed", kind = "params", error = err)))?;
    write_stdout_line(&hash.to_string()).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Ledger Commands
// ============================================================================

/// Executes the `fund` command.
fn command_fund(config_path: Option<&Path>, command: &FundCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    let key = BalanceKey {
        owner: command.address,
        mint: command.mint,
    };
    store.fund(key, command.amount)?;
    write_balance(&store, key)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes a `show` subcommand.
fn command_show(config_path: Option<&Path>, command: ShowCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    match command {
        ShowCommand::Wallet {
            address,
        } => {
            let wallet = store
                .ledger()
                .load_wallet(&address)
                .map_err(|err| CliError::new(t!("store.failed", error = err)))?
                .ok_or_else(|| CliError::new(t!("show.wallet.missing", address = address)))?;
            write_canonical_json(&wallet)?;
        }
        ShowCommand::Operation {
            id,
        } => {
            let operation_id = OperationId::new(id);
            let op = store
                .ledger()
                .load_operation(&operation_id)
                .map_err(|err| CliError::new(t!("store.failed", error = err)))?
                .ok_or_else(|| CliError::new(t!("show.operation.missing", id = operation_id)))?;
            write_canonical_json(&op)?;
        }
        ShowCommand::Operations => {
            write_canonical_json(&store.list_operations()?)?;
        }
        ShowCommand::Balance {
            address,
            mint,
        } => {
            write_balance(
                &store,
                BalanceKey {
                    owner: address,
                    mint,
                },
            )?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes a `derive` subcommand.
fn command_derive(command: &DeriveCommand) -> CliResult<ExitCode> {
    match command {
        DeriveCommand::BalanceAccount {
            wallet,
            guid_hash,
        } => {
            let address = derive_balance_account_address(wallet, guid_hash);
            write_canonical_json(&AddressOutput {
                address,
            })?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints a committed balance.
fn write_balance(store: &LedgerBackend, key: BalanceKey) -> CliResult<()> {
    let amount = store
        .ledger()
        .load_balance(&key)
        .map_err(|err| CliError::new(t!("store.failed", error = err)))?;
    write_canonical_json(&BalanceOutput {
        owner: key.owner,
        mint: key.mint,
        amount,
    })
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Executes a `config` subcommand.
fn command_config(config_path: Option<&Path>, command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => {
            load_config(config_path)?;
            write_stdout_line(&t!("config.validate.ok"))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        ConfigCommand::Example => {
            write_stdout_bytes(config_toml_example().as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Loads and validates the config.
fn load_config(path: Option<&Path>) -> CliResult<StrikeWalletConfig> {
    StrikeWalletConfig::load(path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

// ============================================================================
// SECTION: Ledger Backend
// ============================================================================

/// Ledger store selected by the config.
enum LedgerBackend {
    /// In-memory store; starts empty in every invocation.
    Memory(InMemoryLedgerStore),
    /// Durable `SQLite` store.
    Sqlite(SqliteLedgerStore),
}

impl LedgerBackend {
    /// Returns the store as a [`LedgerStore`].
    fn ledger(&self) -> &dyn LedgerStore {
        match self {
            Self::Memory(store) => store,
            Self::Sqlite(store) => store,
        }
    }

    /// Converts the backend into an owned [`LedgerStore`].
    fn into_ledger(self) -> Box<dyn LedgerStore> {
        match self {
            Self::Memory(store) => Box::new(store),
            Self::Sqlite(store) => Box::new(store),
        }
    }

    /// Credits a balance.
    fn fund(&self, key: BalanceKey, amount: u64) -> CliResult<()> {
        match self {
            Self::Memory(store) => store
                .fund(key, amount)
                .map_err(|err| CliError::new(t!("store.failed", error = err))),
            Self::Sqlite(store) => store
                .fund(key, amount)
                .map(|_| ())
                .map_err(|err| CliError::new(t!("store.failed", error = err))),
        }
    }

    /// Lists pending operation ids.
    fn list_operations(&self) -> CliResult<Vec<OperationId>> {
        match self {
            Self::Memory(_) => Ok(Vec::new()),
            Self::Sqlite(store) => {
                store.list_operations().map_err(|err| CliError::new(t!("store.failed", error = err)))
            }
        }
    }
}

/// Opens the configured ledger store.
fn open_store(config: &StrikeWalletConfig) -> CliResult<LedgerBackend> {
    match config.store.sqlite_config() {
        Some(sqlite) => SqliteLedgerStore::new(sqlite)
            .map(LedgerBackend::Sqlite)
            .map_err(|err| CliError::new(t!("store.open_failed", error = err))),
        None => Ok(LedgerBackend::Memory(InMemoryLedgerStore::new())),
    }
}

/// Builds the configured audit sink.
fn build_audit_sink(config: &StrikeWalletConfig) -> CliResult<Box<dyn WalletAuditSink>> {
    match (config.audit.sink, &config.audit.path) {
        (AuditSinkType::File, Some(path)) => WalletFileAuditSink::new(path)
            .map(|sink| Box::new(sink) as Box<dyn WalletAuditSink>)
            .map_err(|err| {
                CliError::new(t!("audit.open_failed", path = path.display(), error = err))
            }),
        (AuditSinkType::File, None) => {
            Err(CliError::new(t!("config.load_failed", error = "file audit sink requires path")))
        }
        (AuditSinkType::Stderr, _) => Ok(Box::new(WalletStderrAuditSink)),
        (AuditSinkType::None, _) => Ok(Box::new(WalletNoopAuditSink)),
    }
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Resolves the processing time.
fn resolve_now(override_secs: Option<i64>) -> CliResult<Timestamp> {
    if let Some(seconds) = override_secs {
        return Ok(Timestamp::from_unix_seconds(seconds));
    }
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| CliError::new(t!("time.system_failed", error = err)))?;
    let seconds = i64::try_from(elapsed.as_secs())
        .map_err(|err| CliError::new(t!("time.system_failed", error = err)))?;
    Ok(Timestamp::from_unix_seconds(seconds))
}

/// Parses either a bare transaction or a signed transaction.
fn parse_transaction_input(bytes: &[u8]) -> Result<SignedTransaction, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if value.get("transaction").is_some() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value::<Transaction>(value).map(SignedTransaction::new)
    }
}

/// Reads a JSON input file with a size limit.
fn read_json<T: DeserializeOwned>(path: &Path, kind: &str, max_bytes: usize) -> CliResult<T> {
    let bytes = read_input(path, kind, max_bytes)?;
    serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(t!("input.parse_failed", kind = kind, error = err)))
}

/// Reads an input file with a size limit and catalog errors.
fn read_input(path: &Path, kind: &str, max_bytes: usize) -> CliResult<Vec<u8>> {
    read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(t!("input.read_failed", kind = kind, path = path.display(), error = err))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Loads a signing key stored as raw bytes or base64 text.
fn load_signing_key(path: &Path) -> CliResult<SigningKey> {
    let bytes = read_input(path, "signing key", MAX_SIGNING_KEY_BYTES)?;
    parse_signing_key(&bytes)
        .ok_or_else(|| CliError::new(t!("key.invalid", path = path.display())))
}

/// Parses signing key bytes.
fn parse_signing_key(bytes: &[u8]) -> Option<SigningKey> {
    if let Ok(key) = <[u8; 32]>::try_from(bytes) {
        return Some(SigningKey::from_bytes(&key));
    }
    let text = std::str::from_utf8(bytes).ok()?;
    let decoded = BASE64.decode(text.trim().as_bytes()).ok()?;
    let key = <[u8; 32]>::try_from(decoded.as_slice()).ok()?;
    Some(SigningKey::from_bytes(&key))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Returns canonical JSON bytes with a trailing newline.
fn canonical_output<T: Serialize>(value: &T) -> CliResult<Vec<u8>> {
    let mut bytes = canonical_json_bytes_with_limit(value, MAX_OUTPUT_BYTES)
        .map_err(|err| CliError::new(t!("output.serialize_failed", error = err)))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Writes canonical JSON to stdout.
fn write_canonical_json<T: Serialize>(value: &T) -> CliResult<()> {
    let bytes = canonical_output(value)?;
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes canonical JSON to a file.
fn write_canonical_json_file<T: Serialize>(path: &Path, value: &T) -> CliResult<()> {
    let bytes = canonical_output(value)?;
    fs::write(path, bytes)
        .map_err(|err| CliError::new(t!("output.file_failed", path = path.display(), error = err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    t!("output.write_failed", stream = stream, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
