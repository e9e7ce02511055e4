// crates/strike-wallet-core/src/core/instruction.rs
// ============================================================================
// Module: Strike Wallet Instructions
// Description: Program instructions, transactions, and signature verification.
// Purpose: Define the wire codec and the signed envelope hosts submit.
// Dependencies: ed25519-dalek, serde, serde_json, crate::core::{hashing, encoding}
// ============================================================================

//! ## Overview
//! A [`Transaction`] names the wallet, the operation record it acts on, the
//! initiator, and one [`ProgramInstruction`]. Signers sign the RFC 8785
//! canonical JSON of the transaction; [`SignedTransaction::verify`] checks
//! every signature and yields a [`VerifiedTransaction`] carrying the set of
//! verified signers.
//!
//! Security posture: signatures use `verify_strict`; malformed keys,
//! malformed signatures, and duplicate signers fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use ed25519_dalek::Signature;
use ed25519_dalek::Signer as _;
use ed25519_dalek::SigningKey;
use ed25519_dalek::VerifyingKey;
use serde::Deserialize;
use serde::Serialize;

use crate::core::address_book::DAppBookEntry;
use crate::core::address_book::Signer;
use crate::core::balance_account::BooleanSetting;
use crate::core::encoding::decode_base64;
use crate::core::encoding::encode_base64;
use crate::core::error::WalletError;
use crate::core::hashing::canonical_json_bytes;
use crate::core::identifiers::Address;
use crate::core::identifiers::AddressBookEntryNameHash;
use crate::core::identifiers::BalanceAccountGuidHash;
use crate::core::identifiers::BalanceAccountNameHash;
use crate::core::identifiers::OperationId;
use crate::core::identifiers::ParamsHash;
use crate::core::identifiers::WalletGuidHash;
use crate::core::multisig_op::ApprovalDisposition;
use crate::core::multisig_op::DAppInstruction;
use crate::core::slots::SlotId;
use crate::core::updates::AddressBookUpdate;
use crate::core::updates::BalanceAccountCreation;
use crate::core::updates::BalanceAccountPolicyUpdate;
use crate::core::updates::DAppBookUpdate;
use crate::core::updates::InitialWalletConfig;
use crate::core::updates::SlotUpdateType;
use crate::core::updates::WalletConfigPolicyUpdate;
use crate::core::updates::WrapDirection;

// ============================================================================
// SECTION: Program Instructions
// ============================================================================

/// Wallet program instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "instruction", rename_all = "snake_case")]
pub enum ProgramInstruction {
    /// Creates the wallet.
    InitWallet {
        /// Wallet guid hash.
        wallet_guid_hash: WalletGuidHash,
        /// Initial configuration.
        initial_config: InitialWalletConfig,
    },
    /// Proposes a config policy update.
    InitWalletConfigPolicyUpdate {
        /// Policy update.
        update: WalletConfigPolicyUpdate,
    },
    /// Applies an approved config policy update.
    FinalizeWalletConfigPolicyUpdate {
        /// Policy update.
        update: WalletConfigPolicyUpdate,
    },
    /// Proposes a signer slot update.
    InitUpdateSigner {
        /// Fill or clear.
        slot_update_type: SlotUpdateType,
        /// Signer slot.
        slot_id: SlotId<Signer>,
        /// Signer.
        signer: Signer,
    },
    /// Applies an approved signer slot update.
    FinalizeUpdateSigner {
        /// Fill or clear.
        slot_update_type: SlotUpdateType,
        /// Signer slot.
        slot_id: SlotId<Signer>,
        /// Signer.
        signer: Signer,
    },
    /// Proposes an address book update.
    InitAddressBookUpdate {
        /// Address book update.
        update: AddressBookUpdate,
    },
    /// Applies an approved address book update.
    FinalizeAddressBookUpdate {
        /// Address book update.
        update: AddressBookUpdate,
    },
    /// Proposes a dApp book update.
    #[serde(rename = "init_dapp_book_update")]
    InitDAppBookUpdate {
        /// dApp book update.
        update: DAppBookUpdate,
    },
    /// Applies an approved dApp book update.
    #[serde(rename = "finalize_dapp_book_update")]
    FinalizeDAppBookUpdate {
        /// dApp book update.
        update: DAppBookUpdate,
    },
    /// Proposes a balance account.
    InitBalanceAccountCreation {
        /// New account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Account parameters.
        creation_params: BalanceAccountCreation,
    },
    /// Creates an approved balance account.
    FinalizeBalanceAccountCreation {
        /// New account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Account parameters.
        creation_params: BalanceAccountCreation,
    },
    /// Proposes a balance account rename.
    InitBalanceAccountNameUpdate {
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// New name hash.
        account_name_hash: BalanceAccountNameHash,
    },
    /// Applies an approved balance account rename.
    FinalizeBalanceAccountNameUpdate {
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// New name hash.
        account_name_hash: BalanceAccountNameHash,
    },
    /// Proposes a balance account policy update.
    InitBalanceAccountPolicyUpdate {
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Policy update.
        update: BalanceAccountPolicyUpdate,
    },
    /// Applies an approved balance account policy update.
    FinalizeBalanceAccountPolicyUpdate {
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Policy update.
        update: BalanceAccountPolicyUpdate,
    },
    /// Proposes a balance account settings update.
    InitAccountSettingsUpdate {
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// New whitelist setting, if changing.
        #[serde(default)]
        whitelist_enabled: Option<BooleanSetting>,
        /// New dApp setting, if changing.
        #[serde(default)]
        dapps_enabled: Option<BooleanSetting>,
    },
    /// Applies an approved balance account settings update.
    FinalizeAccountSettingsUpdate {
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// New whitelist setting, if changing.
        #[serde(default)]
        whitelist_enabled: Option<BooleanSetting>,
        /// New dApp setting, if changing.
        #[serde(default)]
        dapps_enabled: Option<BooleanSetting>,
    },
    /// Proposes a transfer.
    InitTransfer {
        /// Source account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Amount in base units.
        amount: u64,
        /// Destination address.
        destination: Address,
        /// Destination name hash from the address book.
        destination_name_hash: AddressBookEntryNameHash,
        /// Token mint; `None` for native transfers.
        #[serde(default)]
        token_mint: Option<Address>,
    },
    /// Executes an approved transfer.
    FinalizeTransfer {
        /// Source account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Amount in base units.
        amount: u64,
        /// Destination address.
        destination: Address,
        /// Token mint; `None` for native transfers.
        #[serde(default)]
        token_mint: Option<Address>,
    },
    /// Proposes a wrap or unwrap.
    InitWrapUnwrap {
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Amount in base units.
        amount: u64,
        /// Wrap or unwrap.
        direction: WrapDirection,
    },
    /// Executes an approved wrap or unwrap.
    FinalizeWrapUnwrap {
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Amount in base units.
        amount: u64,
        /// Wrap or unwrap.
        direction: WrapDirection,
    },
    /// Records the initiator's disposition on the operation.
    SetApprovalDisposition {
        /// Disposition.
        disposition: ApprovalDisposition,
        /// Params hash being approved or denied.
        params_hash: ParamsHash,
    },
    /// Opens a dApp transaction.
    #[serde(rename = "init_dapp_transaction")]
    InitDAppTransaction {
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Target dApp.
        dapp: DAppBookEntry,
        /// Number of instructions that will be supplied.
        instruction_count: u8,
    },
    /// Supplies dApp instructions starting at an index.
    #[serde(rename = "supply_dapp_transaction_instructions")]
    SupplyDAppTransactionInstructions {
        /// Index of the first supplied instruction.
        starting_index: u8,
        /// Instructions.
        instructions: Vec<DAppInstruction>,
    },
    /// Executes, simulates, or closes a dApp transaction.
    #[serde(rename = "finalize_dapp_transaction")]
    FinalizeDAppTransaction {
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Params hash of the collected instructions.
        params_hash: ParamsHash,
    },
}

impl ProgramInstruction {
    /// Returns the stable instruction label.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InitWallet {
                ..
            } => "init_wallet",
            Self::InitWalletConfigPolicyUpdate {
                ..
            } => "init_wallet_config_policy_update",
            Self::FinalizeWalletConfigPolicyUpdate {
                ..
            } => "finalize_wallet_config_policy_update",
            Self::InitUpdateSigner {
                ..
            } => "init_update_signer",
            Self::FinalizeUpdateSigner {
                ..
            } => "finalize_update_signer",
            Self::InitAddressBookUpdate {
                ..
            } => "init_address_book_update",
            Self::FinalizeAddressBookUpdate {
                ..
            } => "finalize_address_book_update",
            Self::InitDAppBookUpdate {
                ..
            } => "init_dapp_book_update",
            Self::FinalizeDAppBookUpdate {
                ..
            } => "finalize_dapp_book_update",
            Self::InitBalanceAccountCreation {
                ..
            } => "init_balance_account_creation",
            Self::FinalizeBalanceAccountCreation {
                ..
            } => "finalize_balance_account_creation",
            Self::InitBalanceAccountNameUpdate {
                ..
            } => "init_balance_account_name_update",
            Self::FinalizeBalanceAccountNameUpdate {
                ..
            } => "finalize_balance_account_name_update",
            Self::InitBalanceAccountPolicyUpdate {
                ..
            } => "init_balance_account_policy_update",
            Self::FinalizeBalanceAccountPolicyUpdate {
                ..
            } => "finalize_balance_account_policy_update",
            Self::InitAccountSettingsUpdate {
                ..
            } => "init_account_settings_update",
            Self::FinalizeAccountSettingsUpdate {
                ..
            } => "finalize_account_settings_update",
            Self::InitTransfer {
                ..
            } => "init_transfer",
            Self::FinalizeTransfer {
                ..
            } => "finalize_transfer",
            Self::InitWrapUnwrap {
                ..
            } => "init_wrap_unwrap",
            Self::FinalizeWrapUnwrap {
                ..
            } => "finalize_wrap_unwrap",
            Self::SetApprovalDisposition {
                ..
            } => "set_approval_disposition",
            Self::InitDAppTransaction {
                ..
            } => "init_dapp_transaction",
            Self::SupplyDAppTransactionInstructions {
                ..
            } => "supply_dapp_transaction_instructions",
            Self::FinalizeDAppTransaction {
                ..
            } => "finalize_dapp_transaction",
        }
    }

    /// Encodes the instruction as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidInstruction`] when encoding fails.
    pub fn pack(&self) -> Result<Vec<u8>, WalletError> {
        serde_json::to_vec(self).map_err(|err| WalletError::InvalidInstruction(err.to_string()))
    }

    /// Decodes an instruction from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidInstruction`] when decoding fails.
    pub fn unpack(bytes: &[u8]) -> Result<Self, WalletError> {
        serde_json::from_slice(bytes).map_err(|err| WalletError::InvalidInstruction(err.to_string()))
    }
}

// ============================================================================
// SECTION: Transactions
// ============================================================================

/// Unsigned wallet transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Target wallet address.
    pub wallet_address: Address,
    /// Operation record the instruction acts on; absent only for wallet creation.
    #[serde(default)]
    pub operation_id: Option<OperationId>,
    /// Initiating key; must also sign.
    pub initiator: Address,
    /// Instruction to execute.
    pub instruction: ProgramInstruction,
}

impl Transaction {
    /// Returns the canonical bytes signers sign.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidInstruction`] when canonicalization fails.
    pub fn signing_message(&self) -> Result<Vec<u8>, WalletError> {
        Ok(canonical_json_bytes(self)?)
    }
}

/// Detached ed25519 signature over a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
    /// Signing key.
    pub signer: Address,
    /// Base64-encoded signature bytes.
    pub signature: String,
}

/// Transaction with collected signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// Signed transaction.
    pub transaction: Transaction,
    /// Collected signatures.
    #[serde(default)]
    pub signatures: Vec<TransactionSignature>,
}

impl SignedTransaction {
    /// Wraps an unsigned transaction.
    #[must_use]
    pub const fn new(transaction: Transaction) -> Self {
        Self {
            transaction,
            signatures: Vec::new(),
        }
    }

    /// Decodes a signed transaction, enforcing a byte limit.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidInstruction`] when the payload is too
    /// large or malformed.
    pub fn from_slice(bytes: &[u8], max_bytes: usize) -> Result<Self, WalletError> {
        if bytes.len() > max_bytes {
            return Err(WalletError::InvalidInstruction(format!(
                "transaction exceeds size limit: {} bytes (max {max_bytes})",
                bytes.len()
            )));
        }
        serde_json::from_slice(bytes).map_err(|err| WalletError::InvalidInstruction(err.to_string()))
    }

    /// Adds or replaces the signature of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidInstruction`] when canonicalization fails.
    pub fn sign(&mut self, key: &SigningKey) -> Result<(), WalletError> {
        let message = self.transaction.signing_message()?;
        let signer = Address::new(key.verifying_key().to_bytes());
        let signature = encode_base64(&key.sign(&message).to_bytes());
        self.signatures.retain(|entry| entry.signer != signer);
        self.signatures.push(TransactionSignature {
            signer,
            signature,
        });
        Ok(())
    }

    /// Verifies every signature.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidInstruction`] when there are more than
    /// `max_signatures` signatures and [`WalletError::InvalidSignature`] when
    /// any signature fails or a signer repeats.
    pub fn verify(self, max_signatures: usize) -> Result<VerifiedTransaction, WalletError> {
        if self.signatures.len() > max_signatures {
            return Err(WalletError::InvalidInstruction(format!(
                "too many signatures: {} (max {max_signatures})",
                self.signatures.len()
            )));
        }
        let message = self.transaction.signing_message()?;
        let mut signers = BTreeSet::new();
        for entry in &self.signatures {
            verify_signature(&entry.signer, &entry.signature, &message)?;
            if !signers.insert(entry.signer) {
                return Err(WalletError::InvalidSignature);
            }
        }
        Ok(VerifiedTransaction {
            transaction: self.transaction,
            signers,
        })
    }
}

/// Checks one base64 signature against `message`.
fn verify_signature(signer: &Address, signature: &str, message: &[u8]) -> Result<(), WalletError> {
    let key =
        VerifyingKey::from_bytes(signer.as_bytes()).map_err(|_| WalletError::InvalidSignature)?;
    let bytes = decode_base64(signature).map_err(|_| WalletError::InvalidSignature)?;
    let signature = Signature::from_slice(&bytes).map_err(|_| WalletError::InvalidSignature)?;
    key.verify_strict(message, &signature).map_err(|_| WalletError::InvalidSignature)
}

/// Transaction whose signatures have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedTransaction {
    /// Verified transaction.
    transaction: Transaction,
    /// Keys whose signatures verified.
    signers: BTreeSet<Address>,
}

impl VerifiedTransaction {
    /// Returns the transaction.
    #[must_use]
    pub const fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Returns the verified signer keys.
    #[must_use]
    pub const fn signers(&self) -> &BTreeSet<Address> {
        &self.signers
    }

    /// Returns true when `key` signed the transaction.
    #[must_use]
    pub fn is_signed_by(&self, key: &Address) -> bool {
        self.signers.contains(key)
    }
}

/// Returns the address of an ed25519 signing key.
#[must_use]
pub fn signing_key_address(key: &SigningKey) -> Address {
    Address::new(key.verifying_key().to_bytes())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::*;

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn transaction(initiator: Address) -> Transaction {
        Transaction {
            wallet_address: Address::new([1; 32]),
            operation_id: Some(OperationId::new("op-1")),
            initiator,
            instruction: ProgramInstruction::SetApprovalDisposition {
                disposition: ApprovalDisposition::Approve,
                params_hash: ParamsHash::new([2; 32]),
            },
        }
    }

    #[test]
    fn unpack_reads_tagged_json() {
        let json = serde_json::json!({
            "instruction": "finalize_dapp_transaction",
            "account_guid_hash": "00".repeat(32),
            "params_hash": "11".repeat(32),
        });
        let instruction = ProgramInstruction::unpack(json.to_string().as_bytes()).unwrap();
        assert_eq!(instruction.name(), "finalize_dapp_transaction");
        assert!(matches!(
            ProgramInstruction::unpack(b"{\"instruction\":\"unknown\"}"),
            Err(WalletError::InvalidInstruction(_))
        ));
    }

    #[test]
    fn verify_collects_signers() {
        let signer = key(3);
        let mut signed = SignedTransaction::new(transaction(signing_key_address(&signer)));
        signed.sign(&signer).unwrap();
        signed.sign(&key(4)).unwrap();
        let verified = signed.verify(8).unwrap();
        assert!(verified.is_signed_by(&signing_key_address(&key(3))));
        assert!(verified.is_signed_by(&signing_key_address(&key(4))));
        assert_eq!(verified.signers().len(), 2);
    }

    #[test]
    fn verify_rejects_tampered_transaction() {
        let signer = key(3);
        let mut signed = SignedTransaction::new(transaction(signing_key_address(&signer)));
        signed.sign(&signer).unwrap();
        signed.transaction.operation_id = Some(OperationId::new("op-2"));
        assert_eq!(signed.verify(8).unwrap_err(), WalletError::InvalidSignature);
    }

    #[test]
    fn verify_rejects_duplicate_signer_and_excess_signatures() {
        let signer = key(3);
        let mut signed = SignedTransaction::new(transaction(signing_key_address(&signer)));
        signed.sign(&signer).unwrap();
        let duplicate = signed.signatures[0].clone();
        signed.signatures.push(duplicate);
        assert_eq!(signed.clone().verify(8).unwrap_err(), WalletError::InvalidSignature);
        assert!(matches!(signed.verify(1), Err(WalletError::InvalidInstruction(_))));
    }

    #[test]
    fn from_slice_enforces_limit() {
        let signed = SignedTransaction::new(transaction(Address::new([5; 32])));
        let bytes = serde_json::to_vec(&signed).unwrap();
        assert!(SignedTransaction::from_slice(&bytes, bytes.len()).is_ok());
        assert!(matches!(
            SignedTransaction::from_slice(&bytes, bytes.len() - 1),
            Err(WalletError::InvalidInstruction(_))
        ));
    }
}
