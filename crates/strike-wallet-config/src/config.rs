// crates/strike-wallet-config/src/config.rs
// ============================================================================
// Module: Strike Wallet Configuration
// Description: Configuration loading and validation for the wallet host.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: strike-wallet-core, strike-wallet-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use strike_wallet_core::Address;
use strike_wallet_core::ProcessorLimits;
use strike_wallet_core::runtime::processor::DEFAULT_MAX_DAPP_INSTRUCTIONS;
use strike_wallet_core::runtime::processor::DEFAULT_MAX_SIGNATURES;
use strike_wallet_core::runtime::processor::DEFAULT_MAX_TRANSACTION_BYTES;
use strike_wallet_store_sqlite::SqliteStoreConfig;
use strike_wallet_store_sqlite::SqliteStoreMode;
use strike_wallet_store_sqlite::SqliteSyncMode;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "strike-wallet.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "STRIKE_WALLET_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default ledger database path.
const DEFAULT_STORE_PATH: &str = "strike-wallet.db";
/// Upper bound for `limits.max_transaction_bytes`.
pub const MAX_TRANSACTION_BYTES_LIMIT: usize = 1024 * 1024;
/// Upper bound for `limits.max_signatures`.
pub const MAX_SIGNATURES_LIMIT: usize = 32;
/// Upper bound for `limits.max_dapp_instructions`.
pub const MAX_DAPP_INSTRUCTIONS_LIMIT: usize = 64;
/// Maximum number of builtin dApp program ids.
pub const MAX_DAPP_PROGRAMS: usize = 256;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Strike Wallet host configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrikeWalletConfig {
    /// Ledger store configuration.
    #[serde(default)]
    pub store: LedgerStoreConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Builtin dApp runtime configuration.
    #[serde(default)]
    pub dapp: DAppRuntimeConfig,
    /// Processor input limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl StrikeWalletConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// When no path is given and neither the environment variable nor the
    /// default file is present, the built-in defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config = Self::from_toml(content)?;
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;
        self.audit.validate()?;
        self.dapp.validate()?;
        self.limits.validate()?;
        Ok(())
    }

    /// Returns the processor limits.
    #[must_use]
    pub const fn processor_limits(&self) -> ProcessorLimits {
        ProcessorLimits {
            max_transaction_bytes: self.limits.max_transaction_bytes,
            max_signatures: self.limits.max_signatures,
            max_dapp_instructions: self.limits.max_dapp_instructions,
        }
    }
}

// ============================================================================
// SECTION: Store Config
// ============================================================================

/// Ledger store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStoreBackend {
    /// In-memory store; contents are lost when the process exits.
    Memory,
    /// `SQLite`-backed durable store.
    #[default]
    Sqlite,
}

/// Ledger store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerStoreConfig {
    /// Store backend.
    #[serde(default)]
    pub backend: LedgerStoreBackend,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for LedgerStoreConfig {
    fn default() -> Self {
        Self {
            backend: LedgerStoreBackend::default(),
            path: Some(PathBuf::from(DEFAULT_STORE_PATH)),
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl LedgerStoreConfig {
    /// Validates ledger store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            LedgerStoreBackend::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "memory store must not set path".to_string(),
                    ));
                }
                Ok(())
            }
            LedgerStoreBackend::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires path".to_string())
                })?;
                validate_path_string("store.path", &path.to_string_lossy())
            }
        }
    }

    /// Returns the `SQLite` store config, or `None` for the memory backend.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteStoreConfig> {
        match self.backend {
            LedgerStoreBackend::Memory => None,
            LedgerStoreBackend::Sqlite => self.path.as_ref().map(|path| SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
            }),
        }
    }
}

/// Default busy timeout in milliseconds.
const fn default_store_busy_timeout_ms() -> u64 {
    5_000
}

// ============================================================================
// SECTION: Audit Config
// ============================================================================

/// Audit sink type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkType {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard audit events.
    None,
}

/// Audit sink configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink type.
    #[serde(default)]
    pub sink: AuditSinkType,
    /// Audit log path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkType::File, Some(path)) => {
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            (AuditSinkType::File, None) => {
                Err(ConfigError::Invalid("file audit sink requires path".to_string()))
            }
            (AuditSinkType::Stderr | AuditSinkType::None, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid for the file sink".to_string()))
            }
            (AuditSinkType::Stderr | AuditSinkType::None, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: dApp Runtime Config
// ============================================================================

/// Builtin dApp runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DAppRuntimeConfig {
    /// Program ids served by the builtin runtime; empty serves every id.
    #[serde(default)]
    pub programs: Vec<Address>,
}

impl DAppRuntimeConfig {
    /// Validates dApp runtime configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.programs.len() > MAX_DAPP_PROGRAMS {
            return Err(ConfigError::Invalid(format!(
                "dapp.programs exceeds {MAX_DAPP_PROGRAMS} entries"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Limits Config
// ============================================================================

/// Processor input limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum signed transaction size in bytes.
    #[serde(default = "default_max_transaction_bytes")]
    pub max_transaction_bytes: usize,
    /// Maximum signatures per transaction.
    #[serde(default = "default_max_signatures")]
    pub max_signatures: usize,
    /// Maximum instructions per dApp transaction.
    #[serde(default = "default_max_dapp_instructions")]
    pub max_dapp_instructions: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_transaction_bytes: default_max_transaction_bytes(),
            max_signatures: default_max_signatures(),
            max_dapp_instructions: default_max_dapp_instructions(),
        }
    }
}

impl LimitsConfig {
    /// Validates limit ranges.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_range(
            "limits.max_transaction_bytes",
            self.max_transaction_bytes,
            MAX_TRANSACTION_BYTES_LIMIT,
        )?;
        validate_range("limits.max_signatures", self.max_signatures, MAX_SIGNATURES_LIMIT)?;
        validate_range(
            "limits.max_dapp_instructions",
            self.max_dapp_instructions,
            MAX_DAPP_INSTRUCTIONS_LIMIT,
        )?;
        Ok(())
    }
}

/// Default maximum transaction bytes.
const fn default_max_transaction_bytes() -> usize {
    DEFAULT_MAX_TRANSACTION_BYTES
}

/// Default maximum signatures.
const fn default_max_signatures() -> usize {
    DEFAULT_MAX_SIGNATURES
}

/// Default maximum dApp instructions.
const fn default_max_dapp_instructions() -> usize {
    DEFAULT_MAX_DAPP_INSTRUCTIONS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
///
/// The flag reports whether the path was requested explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates that `value` is within `1..=max`.
fn validate_range(field: &str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::Invalid(format!("{field} must be within 1..={max}")));
    }
    Ok(())
}
