// crates/strike-wallet-core/src/core/mod.rs
// ============================================================================
// Module: Strike Wallet Core Model
// Description: Wallet state, multisig operations, instructions, and ledger records.
// Purpose: Group the deterministic data model shared by the processor and stores.
// Dependencies: serde, ed25519-dalek, sha2, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! The core model holds no I/O. Every type here serializes to canonical JSON
//! and every mutation returns a [`WalletError`] instead of panicking.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod address_book;
pub mod balance_account;
pub mod encoding;
pub mod error;
pub mod hashing;
pub mod identifiers;
pub mod instruction;
pub mod ledger;
pub mod multisig_op;
pub mod slots;
pub mod time;
pub mod updates;
pub mod wallet;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use address_book::AddressBookEntry;
pub use address_book::DAppBookEntry;
pub use address_book::Signer;
pub use balance_account::BalanceAccount;
pub use balance_account::BooleanSetting;
pub use balance_account::derive_balance_account_address;
pub use error::WalletError;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use identifiers::Address;
pub use identifiers::AddressBookEntryNameHash;
pub use identifiers::BalanceAccountGuidHash;
pub use identifiers::BalanceAccountNameHash;
pub use identifiers::DAppBookEntryNameHash;
pub use identifiers::IdentifierParseError;
pub use identifiers::OperationId;
pub use identifiers::ParamsHash;
pub use identifiers::WalletGuidHash;
pub use instruction::ProgramInstruction;
pub use instruction::SignedTransaction;
pub use instruction::Transaction;
pub use instruction::TransactionSignature;
pub use instruction::VerifiedTransaction;
pub use instruction::signing_key_address;
pub use ledger::BalanceChange;
pub use ledger::BalanceDirection;
pub use ledger::BalanceKey;
pub use ledger::LedgerChangeSet;
pub use ledger::LedgerReadSet;
pub use ledger::RecordChange;
pub use ledger::WRAPPED_NATIVE_MINT;
pub use multisig_op::AccountMeta;
pub use multisig_op::ApprovalDisposition;
pub use multisig_op::ApprovalDispositionRecord;
pub use multisig_op::DAppInstruction;
pub use multisig_op::DAppMultisigData;
pub use multisig_op::MultisigOp;
pub use multisig_op::MultisigOpParams;
pub use multisig_op::OperationDisposition;
pub use slots::SlotFlags;
pub use slots::SlotId;
pub use slots::Slots;
pub use time::MAX_APPROVAL_TIMEOUT;
pub use time::Timestamp;
pub use updates::AddressBookUpdate;
pub use updates::BalanceAccountCreation;
pub use updates::BalanceAccountPolicyUpdate;
pub use updates::BalanceAccountWhitelistUpdate;
pub use updates::DAppBookUpdate;
pub use updates::InitialWalletConfig;
pub use updates::SlotUpdateType;
pub use updates::WalletConfigPolicyUpdate;
pub use updates::WrapDirection;
pub use wallet::Wallet;
