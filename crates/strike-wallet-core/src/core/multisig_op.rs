// crates/strike-wallet-core/src/core/multisig_op.rs
// ============================================================================
// Module: Strike Wallet Multisig Operations
// Description: Pending operation records, dispositions, and operation params.
// Purpose: Track approvals for a proposal until it is approved, denied, or expires.
// Dependencies: serde, crate::core::{hashing, identifiers, time, updates}
// ============================================================================

//! ## Overview
//! A [`MultisigOp`] is created by an `Init*` instruction and consumed by the
//! matching `Finalize*` instruction. Approvers record dispositions against
//! the params hash; the finalize step recomputes the hash from its own
//! arguments and only applies the change when both match and the operation
//! is approved.
//!
//! Security posture: the params hash binds every approval to the exact
//! change. A finalize carrying different params fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::address_book::DAppBookEntry;
use crate::core::address_book::Signer;
use crate::core::balance_account::BooleanSetting;
use crate::core::encoding::base64_bytes;
use crate::core::error::WalletError;
use crate::core::hashing::sha256_canonical_json;
use crate::core::identifiers::Address;
use crate::core::identifiers::BalanceAccountGuidHash;
use crate::core::identifiers::BalanceAccountNameHash;
use crate::core::identifiers::ParamsHash;
use crate::core::slots::SlotId;
use crate::core::time::Timestamp;
use crate::core::updates::AddressBookUpdate;
use crate::core::updates::BalanceAccountCreation;
use crate::core::updates::BalanceAccountPolicyUpdate;
use crate::core::updates::DAppBookUpdate;
use crate::core::updates::SlotUpdateType;
use crate::core::updates::WalletConfigPolicyUpdate;
use crate::core::updates::WrapDirection;

// ============================================================================
// SECTION: Dispositions
// ============================================================================

/// Current multisig operation record version.
pub const MULTISIG_OP_VERSION: u32 = 1;

/// One approver's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDisposition {
    /// No decision recorded.
    None,
    /// Approver approves.
    Approve,
    /// Approver denies.
    Deny,
}

/// Disposition recorded for one approver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDispositionRecord {
    /// Approver key.
    pub approver: Address,
    /// Recorded disposition.
    pub disposition: ApprovalDisposition,
}

/// Overall operation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationDisposition {
    /// Still collecting dispositions.
    None,
    /// Approval threshold reached.
    Approved,
    /// Approval threshold can no longer be reached.
    Denied,
    /// Approval window passed without a decision.
    Expired,
}

// ============================================================================
// SECTION: Multisig Operation
// ============================================================================

/// Pending multisig operation record.
///
/// # Invariants
/// - `disposition_records` holds exactly one record per approver.
/// - `1 <= dispositions_required <= disposition_records.len()` once initialized.
/// - `operation_disposition` only leaves `None` once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigOp {
    /// Record version.
    pub version: u32,
    /// Set once [`MultisigOp::init`] succeeds.
    pub is_initialized: bool,
    /// Wallet the operation was opened against.
    pub wallet_address: Address,
    /// Key that proposed the operation.
    pub initiator: Address,
    /// Address credited when the record is closed.
    pub rent_return: Address,
    /// One record per approver.
    pub disposition_records: Vec<ApprovalDispositionRecord>,
    /// Approvals required.
    pub dispositions_required: u8,
    /// Params hash; unset while a dApp transaction is still collecting instructions.
    pub params_hash: Option<ParamsHash>,
    /// Start time.
    pub started_at: Timestamp,
    /// Expiry time.
    pub expires_at: Timestamp,
    /// Overall outcome.
    pub operation_disposition: OperationDisposition,
}

impl Default for MultisigOp {
    fn default() -> Self {
        Self {
            version: MULTISIG_OP_VERSION,
            is_initialized: false,
            wallet_address: Address::zero(),
            initiator: Address::zero(),
            rent_return: Address::zero(),
            disposition_records: Vec::new(),
            dispositions_required: 0,
            params_hash: None,
            started_at: Timestamp::from_unix_seconds(0),
            expires_at: Timestamp::from_unix_seconds(0),
            operation_disposition: OperationDisposition::None,
        }
    }
}

impl MultisigOp {
    /// Initializes the operation for the given approvers.
    ///
    /// The initiator's approval is recorded immediately when it is one of
    /// the approvers.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::OperationAlreadyExists`] when already
    /// initialized and [`WalletError::InvalidApproverCount`] when the
    /// approver set is empty or the threshold is out of range.
    pub fn init(
        &mut self,
        approvers: Vec<Address>,
        dispositions_required: u8,
        initiator: Address,
        started_at: Timestamp,
        expires_at: Timestamp,
        params_hash: Option<ParamsHash>,
    ) -> Result<(), WalletError> {
        if self.is_initialized {
            return Err(WalletError::OperationAlreadyExists);
        }
        if approvers.is_empty()
            || dispositions_required == 0
            || usize::from(dispositions_required) > approvers.len()
        {
            return Err(WalletError::InvalidApproverCount);
        }
        self.version = MULTISIG_OP_VERSION;
        self.is_initialized = true;
        self.initiator = initiator;
        self.rent_return = initiator;
        self.disposition_records = approvers
            .into_iter()
            .map(|approver| ApprovalDispositionRecord {
                approver,
                disposition: if approver == initiator {
                    ApprovalDisposition::Approve
                } else {
                    ApprovalDisposition::None
                },
            })
            .collect();
        self.dispositions_required = dispositions_required;
        self.params_hash = params_hash;
        self.started_at = started_at;
        self.expires_at = expires_at;
        self.operation_disposition = OperationDisposition::None;
        self.update_operation_disposition();
        Ok(())
    }

    /// Records an approver's disposition.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the disposition is `None`, the operation
    /// has no params hash yet, the hash differs, the operation is already
    /// final or expired, or `approver` is not an approver.
    pub fn validate_and_record_disposition(
        &mut self,
        approver: &Address,
        disposition: ApprovalDisposition,
        params_hash: &ParamsHash,
        clock: Timestamp,
    ) -> Result<(), WalletError> {
        if disposition == ApprovalDisposition::None {
            return Err(WalletError::InvalidDisposition);
        }
        let Some(expected) = self.params_hash else {
            return Err(WalletError::OperationNotInitialized);
        };
        if expected != *params_hash {
            return Err(WalletError::InvalidSignature);
        }
        if self.operation_disposition != OperationDisposition::None {
            return Err(WalletError::OperationAlreadyFinal);
        }
        if clock > self.expires_at {
            return Err(WalletError::OperationExpired);
        }
        let record = self
            .disposition_records
            .iter_mut()
            .find(|record| record.approver == *approver)
            .ok_or(WalletError::UnknownApprover)?;
        record.disposition = disposition;
        self.update_operation_disposition();
        Ok(())
    }

    /// Returns the number of records with the given disposition.
    #[must_use]
    pub fn count(&self, disposition: ApprovalDisposition) -> usize {
        self.disposition_records.iter().filter(|record| record.disposition == disposition).count()
    }

    /// Moves the operation to `Approved` or `Denied` once decided.
    fn update_operation_disposition(&mut self) {
        let required = usize::from(self.dispositions_required);
        let approvals = self.count(ApprovalDisposition::Approve);
        let denials = self.count(ApprovalDisposition::Deny);
        if approvals >= required {
            self.operation_disposition = OperationDisposition::Approved;
        } else if self.disposition_records.len().saturating_sub(denials) < required {
            self.operation_disposition = OperationDisposition::Denied;
        }
    }

    /// Returns the outcome as seen at `clock`, reporting `Expired` once the
    /// window has passed without a decision.
    #[must_use]
    pub fn disposition_at(&self, clock: Timestamp) -> OperationDisposition {
        match self.operation_disposition {
            OperationDisposition::None if clock > self.expires_at => OperationDisposition::Expired,
            other => other,
        }
    }

    /// Returns whether the operation may be applied with `expected` params.
    ///
    /// `Ok(false)` means the operation was denied or expired and should be
    /// closed without applying the change.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::OperationParamsMismatch`] when the params
    /// differ, [`WalletError::OperationNotInitialized`] when no params hash is
    /// set, and [`WalletError::TransferDispositionNotFinal`] while pending.
    pub fn approved(&self, expected: &ParamsHash, clock: Timestamp) -> Result<bool, WalletError> {
        let Some(params_hash) = self.params_hash else {
            return Err(WalletError::OperationNotInitialized);
        };
        if params_hash != *expected {
            return Err(WalletError::OperationParamsMismatch);
        }
        match self.disposition_at(clock) {
            OperationDisposition::Approved => Ok(true),
            OperationDisposition::Denied | OperationDisposition::Expired => Ok(false),
            OperationDisposition::None => Err(WalletError::TransferDispositionNotFinal),
        }
    }
}

// ============================================================================
// SECTION: dApp Instructions
// ============================================================================

/// Account reference inside a dApp instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    /// Account address.
    pub address: Address,
    /// Whether the account signs the instruction.
    #[serde(default)]
    pub is_signer: bool,
    /// Whether the instruction may change the account.
    #[serde(default)]
    pub is_writable: bool,
}

/// Instruction executed on behalf of a balance account by a dApp program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DAppInstruction {
    /// Program invoked.
    pub program_id: Address,
    /// Accounts passed to the program.
    pub accounts: Vec<AccountMeta>,
    /// Program-specific payload.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// dApp transaction instructions collected ahead of approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DAppMultisigData {
    /// Wallet address.
    pub wallet_address: Address,
    /// Balance account the transaction acts for.
    pub account_guid_hash: BalanceAccountGuidHash,
    /// Target dApp.
    pub dapp: DAppBookEntry,
    /// Declared instruction count.
    pub instruction_count: u8,
    /// Supplied instructions by index.
    pub instructions: Vec<Option<DAppInstruction>>,
}

impl DAppMultisigData {
    /// Creates an empty collection for `instruction_count` instructions.
    #[must_use]
    pub fn new(
        wallet_address: Address,
        account_guid_hash: BalanceAccountGuidHash,
        dapp: DAppBookEntry,
        instruction_count: u8,
    ) -> Self {
        Self {
            wallet_address,
            account_guid_hash,
            dapp,
            instruction_count,
            instructions: vec![None; usize::from(instruction_count)],
        }
    }

    /// Stores an instruction at `index`.
    ///
    /// Supplying the same instruction again is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::DAppInstructionOverflow`] when `index` is out of
    /// range and [`WalletError::DAppInstructionAlreadySupplied`] when a
    /// different instruction occupies the slot.
    pub fn add_instruction(
        &mut self,
        index: usize,
        instruction: DAppInstruction,
    ) -> Result<(), WalletError> {
        let slot = self.instructions.get_mut(index).ok_or(WalletError::DAppInstructionOverflow)?;
        if let Some(existing) = slot {
            if *existing == instruction {
                return Ok(());
            }
            return Err(WalletError::DAppInstructionAlreadySupplied);
        }
        *slot = Some(instruction);
        Ok(())
    }

    /// Returns every instruction once all have been supplied.
    #[must_use]
    pub fn all_instructions(&self) -> Option<Vec<DAppInstruction>> {
        self.instructions.iter().cloned().collect()
    }

    /// Returns the operation params once all instructions are supplied.
    #[must_use]
    pub fn params(&self) -> Option<MultisigOpParams> {
        self.all_instructions().map(|instructions| MultisigOpParams::DAppTransaction {
            wallet_address: self.wallet_address,
            account_guid_hash: self.account_guid_hash,
            dapp: self.dapp,
            instructions,
        })
    }
}

// ============================================================================
// SECTION: Operation Params
// ============================================================================

/// Params of a proposal; their hash binds approvals to the exact change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MultisigOpParams {
    /// Config policy update.
    UpdateWalletConfigPolicy {
        /// Wallet address.
        wallet_address: Address,
        /// Policy update.
        update: WalletConfigPolicyUpdate,
    },
    /// Signer slot update.
    UpdateSigner {
        /// Wallet address.
        wallet_address: Address,
        /// Fill or clear.
        slot_update_type: SlotUpdateType,
        /// Signer slot.
        slot_id: SlotId<Signer>,
        /// Signer.
        signer: Signer,
    },
    /// Address book update.
    AddressBookUpdate {
        /// Wallet address.
        wallet_address: Address,
        /// Address book update.
        update: AddressBookUpdate,
    },
    /// dApp book update.
    DAppBookUpdate {
        /// Wallet address.
        wallet_address: Address,
        /// dApp book update.
        update: DAppBookUpdate,
    },
    /// Balance account creation.
    CreateBalanceAccount {
        /// Wallet address.
        wallet_address: Address,
        /// New account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Account parameters.
        creation_params: BalanceAccountCreation,
    },
    /// Balance account rename.
    UpdateBalanceAccountName {
        /// Wallet address.
        wallet_address: Address,
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// New name hash.
        account_name_hash: BalanceAccountNameHash,
    },
    /// Balance account policy update.
    UpdateBalanceAccountPolicy {
        /// Wallet address.
        wallet_address: Address,
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Policy update.
        update: BalanceAccountPolicyUpdate,
    },
    /// Balance account settings update.
    UpdateBalanceAccountSettings {
        /// Wallet address.
        wallet_address: Address,
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// New whitelist setting, if changing.
        whitelist_enabled: Option<BooleanSetting>,
        /// New dApp setting, if changing.
        dapps_enabled: Option<BooleanSetting>,
    },
    /// Transfer out of a balance account.
    Transfer {
        /// Wallet address.
        wallet_address: Address,
        /// Source account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Destination address.
        destination: Address,
        /// Amount in base units.
        amount: u64,
        /// Token mint; `None` for native transfers.
        token_mint: Option<Address>,
    },
    /// Wrap or unwrap of the native balance.
    WrapUnwrap {
        /// Wallet address.
        wallet_address: Address,
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Amount in base units.
        amount: u64,
        /// Wrap or unwrap.
        direction: WrapDirection,
    },
    /// dApp transaction.
    DAppTransaction {
        /// Wallet address.
        wallet_address: Address,
        /// Account guid hash.
        account_guid_hash: BalanceAccountGuidHash,
        /// Target dApp.
        dapp: DAppBookEntry,
        /// Instructions to execute.
        instructions: Vec<DAppInstruction>,
    },
}

impl MultisigOpParams {
    /// Returns the SHA-256 of the params' canonical JSON.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidInstruction`] when canonicalization fails.
    pub fn hash(&self) -> Result<ParamsHash, WalletError> {
        Ok(ParamsHash::new(sha256_canonical_json(self)?))
    }

    /// Returns the wallet the params apply to.
    #[must_use]
    pub const fn wallet_address(&self) -> &Address {
        match self {
            Self::UpdateWalletConfigPolicy {
                wallet_address, ..
            }
            | Self::UpdateSigner {
                wallet_address, ..
            }
            | Self::AddressBookUpdate {
                wallet_address, ..
            }
            | Self::DAppBookUpdate {
                wallet_address, ..
            }
            | Self::CreateBalanceAccount {
                wallet_address, ..
            }
            | Self::UpdateBalanceAccountName {
                wallet_address, ..
            }
            | Self::UpdateBalanceAccountPolicy {
                wallet_address, ..
            }
            | Self::UpdateBalanceAccountSettings {
                wallet_address, ..
            }
            | Self::Transfer {
                wallet_address, ..
            }
            | Self::WrapUnwrap {
                wallet_address, ..
            }
            | Self::DAppTransaction {
                wallet_address, ..
            } => wallet_address,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
