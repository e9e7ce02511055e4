// crates/strike-wallet-store-sqlite/src/store.rs
// ============================================================================
// Module: Strike Wallet SQLite Ledger Store
// Description: Durable LedgerStore backed by SQLite.
// Purpose: Persist wallet records and balances with hash-verified loads.
// Dependencies: strike-wallet-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Wallets, operations, and dApp transaction data are stored as canonical
//! JSON alongside a content hash. Every load checks the payload size and the
//! hash before deserializing, so a tampered row surfaces as
//! [`SqliteStoreError::Corrupt`] instead of a silently wrong record. A
//! [`LedgerChangeSet`] is applied inside one immediate `SQLite` transaction:
//! the write lock is taken first, then every value in the change set's read
//! set is compared with the database, so two processes staging from the
//! same snapshot cannot both commit. Deleted operation ids are kept in
//! `closed_operations`.
//!
//! Security posture: database contents are untrusted on load and fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::TransactionBehavior;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use strike_wallet_core::Address;
use strike_wallet_core::BalanceKey;
use strike_wallet_core::DAppMultisigData;
use strike_wallet_core::DEFAULT_HASH_ALGORITHM;
use strike_wallet_core::HashAlgorithm;
use strike_wallet_core::HashError;
use strike_wallet_core::LedgerChangeSet;
use strike_wallet_core::LedgerReadSet;
use strike_wallet_core::LedgerStore;
use strike_wallet_core::MultisigOp;
use strike_wallet_core::OperationId;
use strike_wallet_core::RecordChange;
use strike_wallet_core::StoreError;
use strike_wallet_core::Wallet;
use strike_wallet_core::hashing::canonical_json_bytes_with_limit;
use strike_wallet_core::hashing::hash_bytes;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Current schema version.
const SCHEMA_VERSION: i64 = 2;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of the full store path.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum size of a stored record payload in bytes.
pub const MAX_RECORD_BYTES: usize = 1024 * 1024;
/// Mint column value used for native balances.
const NATIVE_MINT_COLUMN: &str = "";

/// Record tables sharing the same layout.
#[derive(Debug, Clone, Copy)]
enum RecordTable {
    /// Wallet records keyed by wallet address.
    Wallets,
    /// Multisig operation records keyed by operation id.
    Operations,
    /// dApp transaction data keyed by operation id.
    DAppData,
}

impl RecordTable {
    /// Returns the table name.
    const fn name(self) -> &'static str {
        match self {
            Self::Wallets => "wallets",
            Self::Operations => "operations",
            Self::DAppData => "dapp_data",
        }
    }
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode.
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode.
    #[default]
    Full,
    /// Normal synchronous mode.
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` ledger store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a config for `path` with default pragmas.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Default busy timeout in milliseconds.
const fn default_busy_timeout_ms() -> u64 {
    5_000
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding raw record payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or hash mismatch.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// A value read while staging changed before the commit.
    #[error("sqlite store write conflict: {0}")]
    Conflict(String),
    /// Record payload exceeded the size limit.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::Conflict(message) => Self::Conflict(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "record_json exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

impl From<HashError> for SqliteStoreError {
    fn from(error: HashError) -> Self {
        match error {
            HashError::Canonicalization(message) => Self::Invalid(message),
            HashError::SizeLimitExceeded {
                limit,
                actual,
            } => Self::TooLarge {
                max_bytes: limit,
                actual_bytes: actual,
            },
        }
    }
}

/// Maps a rusqlite error into a store error.
#[allow(clippy::needless_pass_by_value, reason = "Used as a map_err adapter.")]
fn db_error(err: rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed ledger store.
///
/// # Invariants
/// - All access goes through one connection guarded by a mutex.
/// - A change set is committed atomically or not at all.
#[derive(Debug, Clone)]
pub struct SqliteLedgerStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared connection.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteLedgerStore {
    /// Opens the store, creating the database and schema when absent.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the path is invalid, the database
    /// cannot be opened, or the schema version is unsupported.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Credits a balance directly, outside the wallet program.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Invalid`] when the balance would overflow.
    pub fn fund(&self, key: BalanceKey, amount: u64) -> Result<u64, SqliteStoreError> {
        let mut guard = self.lock()?;
        let tx = guard.transaction().map_err(db_error)?;
        let current = read_balance(&tx, &key)?;
        let next = current
            .checked_add(amount)
            .ok_or_else(|| SqliteStoreError::Invalid("balance overflow".to_string()))?;
        write_balance(&tx, &key, next)?;
        tx.commit().map_err(db_error)?;
        Ok(next)
    }

    /// Lists the ids of every open operation in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub fn list_operations(&self) -> Result<Vec<OperationId>, SqliteStoreError> {
        let guard = self.lock()?;
        let mut stmt = guard
            .prepare("SELECT record_key FROM operations ORDER BY record_key")
            .map_err(db_error)?;
        let rows = stmt.query_map(params![], |row| row.get::<_, String>(0)).map_err(db_error)?;
        let mut ids = Vec::new();
        for row in rows {
            ids.push(OperationId::new(row.map_err(db_error)?));
        }
        Ok(ids)
    }

    /// Lists every non-zero balance held by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails or a row is corrupt.
    pub fn list_balances(&self, owner: &Address) -> Result<Vec<(BalanceKey, u64)>, SqliteStoreError> {
        let guard = self.lock()?;
        let mut stmt = guard
            .prepare(
                "SELECT mint, amount FROM balances WHERE owner = ?1 AND amount > 0 ORDER BY mint",
            )
            .map_err(db_error)?;
        let rows = stmt
            .query_map(params![owner.to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(db_error)?;
        let mut balances = Vec::new();
        for row in rows {
            let (mint, amount) = row.map_err(db_error)?;
            let key = BalanceKey {
                owner: *owner,
                mint: parse_mint_column(&mint)?,
            };
            balances.push((key, amount_from_column(amount)?));
        }
        Ok(balances)
    }

    /// Acquires the connection lock.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("sqlite connection mutex poisoned".to_string()))
    }

    /// Loads and verifies a record by key.
    fn load_record<T: DeserializeOwned>(
        &self,
        table: RecordTable,
        key: &str,
    ) -> Result<Option<T>, SqliteStoreError> {
        let guard = self.lock()?;
        load_record(&guard, table, key)
    }

    /// Checks the read set and applies a change set inside one transaction.
    fn apply_changes(&self, changes: &LedgerChangeSet) -> Result<(), SqliteStoreError> {
        let mut guard = self.lock()?;
        let tx =
            guard.transaction_with_behavior(TransactionBehavior::Immediate).map_err(db_error)?;
        if let Some(stale) = stale_read(&tx, &changes.reads)? {
            return Err(SqliteStoreError::Conflict(format!("{stale} changed since it was read")));
        }
        let updated_at = unix_millis();
        for (address, wallet) in &changes.wallets {
            upsert_record(&tx, RecordTable::Wallets, &address.to_string(), wallet, updated_at)?;
        }
        for (id, change) in &changes.operations {
            apply_record_change(&tx, RecordTable::Operations, id, change, updated_at)?;
        }
        for (id, change) in &changes.dapp_data {
            apply_record_change(&tx, RecordTable::DAppData, id, change, updated_at)?;
        }
        for (key, amount) in &changes.balances {
            write_balance(&tx, key, *amount)?;
        }
        tx.commit().map_err(db_error)
    }
}

impl LedgerStore for SqliteLedgerStore {
    fn load_wallet(&self, address: &Address) -> Result<Option<Wallet>, StoreError> {
        Ok(self.load_record(RecordTable::Wallets, &address.to_string())?)
    }

    fn load_operation(&self, id: &OperationId) -> Result<Option<MultisigOp>, StoreError> {
        Ok(self.load_record(RecordTable::Operations, id.as_str())?)
    }

    fn load_dapp_data(&self, id: &OperationId) -> Result<Option<DAppMultisigData>, StoreError> {
        Ok(self.load_record(RecordTable::DAppData, id.as_str())?)
    }

    fn is_operation_closed(&self, id: &OperationId) -> Result<bool, StoreError> {
        let guard = self.lock()?;
        Ok(read_operation_closed(&guard, id)?)
    }

    fn load_balance(&self, key: &BalanceKey) -> Result<u64, StoreError> {
        let guard = self.lock()?;
        Ok(read_balance(&guard, key)?)
    }

    fn apply(&self, changes: &LedgerChangeSet) -> Result<(), StoreError> {
        if changes.is_empty() {
            return Ok(());
        }
        Ok(self.apply_changes(changes)?)
    }

    fn readiness(&self) -> Result<(), StoreError> {
        let guard = self.lock()?;
        guard.query_row("SELECT 1", params![], |row| row.get::<_, i64>(0)).map_err(db_error)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Raw payload for a stored record.
#[derive(Debug)]
struct RecordPayload {
    /// Stored canonical JSON bytes.
    bytes: Vec<u8>,
    /// Stored hash value for the payload.
    hash_value: String,
    /// Stored hash algorithm label.
    hash_algorithm: String,
}

/// Loads, size-checks, and hash-verifies a record.
fn load_record<T: DeserializeOwned>(
    connection: &Connection,
    table: RecordTable,
    key: &str,
) -> Result<Option<T>, SqliteStoreError> {
    let length_sql =
        format!("SELECT length(record_json) FROM {} WHERE record_key = ?1", table.name());
    let length: Option<i64> = connection
        .query_row(&length_sql, params![key], |row| row.get(0))
        .optional()
        .map_err(db_error)?;
    let Some(length) = length else {
        return Ok(None);
    };
    let length = usize::try_from(length)
        .map_err(|_| SqliteStoreError::Corrupt(format!("negative record length in {}", table.name())))?;
    if length > MAX_RECORD_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_RECORD_BYTES,
            actual_bytes: length,
        });
    }
    let payload_sql = format!(
        "SELECT record_json, record_hash, hash_algorithm FROM {} WHERE record_key = ?1",
        table.name()
    );
    let payload = connection
        .query_row(&payload_sql, params![key], |row| {
            Ok(RecordPayload {
                bytes: row.get(0)?,
                hash_value: row.get(1)?,
                hash_algorithm: row.get(2)?,
            })
        })
        .optional()
        .map_err(db_error)?;
    let Some(payload) = payload else {
        return Ok(None);
    };
    let algorithm = parse_hash_algorithm(&payload.hash_algorithm)?;
    let expected = hash_bytes(algorithm, &payload.bytes);
    if expected.value != payload.hash_value {
        return Err(SqliteStoreError::Corrupt(format!(
            "hash mismatch for {} record {key}",
            table.name()
        )));
    }
    let record = serde_json::from_slice(&payload.bytes)
        .map_err(|err| SqliteStoreError::Invalid(format!("{} record {key}: {err}", table.name())))?;
    Ok(Some(record))
}

/// Writes a record as canonical JSON with its content hash.
fn upsert_record<T: Serialize>(
    tx: &Transaction<'_>,
    table: RecordTable,
    key: &str,
    record: &T,
    updated_at: i64,
) -> Result<(), SqliteStoreError> {
    let bytes = canonical_json_bytes_with_limit(record, MAX_RECORD_BYTES)?;
    let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, &bytes);
    let sql = format!(
        "INSERT INTO {} (record_key, record_json, record_hash, hash_algorithm, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(record_key) DO UPDATE SET
            record_json = excluded.record_json,
            record_hash = excluded.record_hash,
            hash_algorithm = excluded.hash_algorithm,
            updated_at = excluded.updated_at",
        table.name()
    );
    tx.execute(
        &sql,
        params![key, bytes, digest.value, hash_algorithm_label(digest.algorithm), updated_at],
    )
    .map_err(db_error)?;
    Ok(())
}

/// Applies an upsert or deletion of an operation-keyed record.
fn apply_record_change<T: Serialize>(
    tx: &Transaction<'_>,
    table: RecordTable,
    id: &OperationId,
    change: &RecordChange<T>,
    updated_at: i64,
) -> Result<(), SqliteStoreError> {
    match change {
        RecordChange::Upsert(record) => upsert_record(tx, table, id.as_str(), record, updated_at),
        RecordChange::Delete => {
            let sql = format!("DELETE FROM {} WHERE record_key = ?1", table.name());
            tx.execute(&sql, params![id.as_str()]).map_err(db_error)?;
            if matches!(table, RecordTable::Operations) {
                tx.execute(
                    "INSERT OR IGNORE INTO closed_operations (record_key, closed_at)
                     VALUES (?1, ?2)",
                    params![id.as_str(), updated_at],
                )
                .map_err(db_error)?;
            }
            Ok(())
        }
    }
}

/// Returns true when the operation id is recorded as closed.
fn read_operation_closed(
    connection: &Connection,
    id: &OperationId,
) -> Result<bool, SqliteStoreError> {
    let found: Option<i64> = connection
        .query_row(
            "SELECT 1 FROM closed_operations WHERE record_key = ?1",
            params![id.as_str()],
            |row| row.get(0),
        )
        .optional()
        .map_err(db_error)?;
    Ok(found.is_some())
}

/// Returns a description of the first read that no longer matches the
/// database, or `None` when every read is current.
fn stale_read(
    connection: &Connection,
    reads: &LedgerReadSet,
) -> Result<Option<String>, SqliteStoreError> {
    for (address, seen) in &reads.wallets {
        let current: Option<Wallet> =
            load_record(connection, RecordTable::Wallets, &address.to_string())?;
        if current.as_ref() != seen.as_ref() {
            return Ok(Some(format!("wallet {address}")));
        }
    }
    for (id, seen) in &reads.operations {
        let current: Option<MultisigOp> =
            load_record(connection, RecordTable::Operations, id.as_str())?;
        if current.as_ref() != seen.as_ref() {
            return Ok(Some(format!("operation {id}")));
        }
    }
    for (id, closed) in &reads.closed_operations {
        if read_operation_closed(connection, id)? != *closed {
            return Ok(Some(format!("closed operation {id}")));
        }
    }
    for (id, seen) in &reads.dapp_data {
        let current: Option<DAppMultisigData> =
            load_record(connection, RecordTable::DAppData, id.as_str())?;
        if current.as_ref() != seen.as_ref() {
            return Ok(Some(format!("dapp data {id}")));
        }
    }
    for (key, seen) in &reads.balances {
        if read_balance(connection, key)? != *seen {
            return Ok(Some(format!("balance {}", key.owner)));
        }
    }
    Ok(None)
}

// ============================================================================
// SECTION: Balances
// ============================================================================

/// Reads a balance, returning zero when absent.
fn read_balance(connection: &Connection, key: &BalanceKey) -> Result<u64, SqliteStoreError> {
    let amount: Option<i64> = connection
        .query_row(
            "SELECT amount FROM balances WHERE owner = ?1 AND mint = ?2",
            params![key.owner.to_string(), mint_column(key)],
            |row| row.get(0),
        )
        .optional()
        .map_err(db_error)?;
    amount.map_or(Ok(0), amount_from_column)
}

/// Writes a balance.
fn write_balance(
    connection: &Connection,
    key: &BalanceKey,
    amount: u64,
) -> Result<(), SqliteStoreError> {
    let amount = i64::try_from(amount).map_err(|_| {
        SqliteStoreError::Invalid("balance exceeds sqlite integer range".to_string())
    })?;
    connection
        .execute(
            "INSERT INTO balances (owner, mint, amount) VALUES (?1, ?2, ?3)
             ON CONFLICT(owner, mint) DO UPDATE SET amount = excluded.amount",
            params![key.owner.to_string(), mint_column(key), amount],
        )
        .map_err(db_error)?;
    Ok(())
}

/// Returns the mint column value for a balance key.
fn mint_column(key: &BalanceKey) -> String {
    key.mint.map_or_else(|| NATIVE_MINT_COLUMN.to_string(), |mint| mint.to_string())
}

/// Parses a mint column value.
fn parse_mint_column(value: &str) -> Result<Option<Address>, SqliteStoreError> {
    if value == NATIVE_MINT_COLUMN {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| SqliteStoreError::Corrupt(format!("invalid mint column: {value}")))
}

/// Converts a stored amount into a balance.
fn amount_from_column(amount: i64) -> Result<u64, SqliteStoreError> {
    u64::try_from(amount)
        .map_err(|_| SqliteStoreError::Corrupt(format!("negative balance stored: {amount}")))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path.display().to_string().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with the configured pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags).map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(db_error)?;
    Ok(connection)
}

/// Initializes the schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(db_error)?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(db_error)?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(db_error)?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(db_error)?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS wallets (
                    record_key TEXT PRIMARY KEY,
                    record_json BLOB NOT NULL,
                    record_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS operations (
                    record_key TEXT PRIMARY KEY,
                    record_json BLOB NOT NULL,
                    record_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS dapp_data (
                    record_key TEXT PRIMARY KEY,
                    record_json BLOB NOT NULL,
                    record_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS closed_operations (
                    record_key TEXT PRIMARY KEY,
                    closed_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS balances (
                    owner TEXT NOT NULL,
                    mint TEXT NOT NULL,
                    amount INTEGER NOT NULL,
                    PRIMARY KEY (owner, mint)
                );",
            )
            .map_err(db_error)?;
        }
        Some(SCHEMA_VERSION) => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(db_error)
}

/// Returns the current unix time in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

/// Returns the canonical hash algorithm label.
const fn hash_algorithm_label(algorithm: HashAlgorithm) -> &'static str {
    match algorithm {
        HashAlgorithm::Sha256 => "sha256",
    }
}

/// Parses a hash algorithm label.
fn parse_hash_algorithm(label: &str) -> Result<HashAlgorithm, SqliteStoreError> {
    match label {
        "sha256" => Ok(HashAlgorithm::Sha256),
        other => Err(SqliteStoreError::Invalid(format!("unsupported hash algorithm: {other}"))),
    }
}
