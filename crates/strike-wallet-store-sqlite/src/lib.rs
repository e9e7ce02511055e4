// crates/strike-wallet-store-sqlite/src/lib.rs
// ============================================================================
// Module: Strike Wallet SQLite Store
// Description: SQLite-backed ledger store for the wallet program.
// Purpose: Persist wallets, operations, dApp data, and balances durably.
// Dependencies: strike-wallet-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`SqliteLedgerStore`] implements [`strike_wallet_core::LedgerStore`] on a
//! single `SQLite` database. Records are stored as canonical JSON with a
//! content hash that is verified on every load.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_RECORD_BYTES;
pub use store::SqliteLedgerStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
