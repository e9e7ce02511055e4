// crates/strike-wallet-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared wallet harness for strike-wallet-core integration tests.
// Purpose: Build, sign, and submit transactions against an in-memory ledger.
// Dependencies: strike-wallet-core, ed25519-dalek
// ============================================================================

//! ## Overview
//! [`Harness`] owns a processor over an [`InMemoryLedgerStore`] with a memory
//! audit sink, a wallet address key, a wallet assistant key, and three
//! approver keys. Approver `i` sits in signer slot `i`; all three are config
//! approvers with a threshold of two.

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
#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use std::time::Duration;

use ed25519_dalek::SigningKey;
use strike_wallet_core::Address;
use strike_wallet_core::AddressBookEntry;
use strike_wallet_core::AddressBookEntryNameHash;
use strike_wallet_core::ApprovalDisposition;
use strike_wallet_core::BalanceAccountCreation;
use strike_wallet_core::BalanceAccountGuidHash;
use strike_wallet_core::BalanceAccountNameHash;
use strike_wallet_core::BalanceKey;
use strike_wallet_core::BooleanSetting;
use strike_wallet_core::BuiltinDAppRuntime;
use strike_wallet_core::InMemoryLedgerStore;
use strike_wallet_core::InitialWalletConfig;
use strike_wallet_core::LedgerStore;
use strike_wallet_core::MultisigOp;
use strike_wallet_core::OperationId;
use strike_wallet_core::ParamsHash;
use strike_wallet_core::ProcessOutcome;
use strike_wallet_core::Processor;
use strike_wallet_core::ProcessorLimits;
use strike_wallet_core::ProgramInstruction;
use strike_wallet_core::SignedTransaction;
use strike_wallet_core::Signer;
use strike_wallet_core::SlotId;
use strike_wallet_core::Timestamp;
use strike_wallet_core::Transaction;
use strike_wallet_core::Wallet;
use strike_wallet_core::WalletError;
use strike_wallet_core::WalletGuidHash;
use strike_wallet_core::WalletMemoryAuditSink;
use strike_wallet_core::derive_balance_account_address;
use strike_wallet_core::signing_key_address;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Processing time at harness creation.
pub const START: i64 = 1_700_000_000;

/// Config and transfer approval window used by the fixtures.
pub const TIMEOUT: Duration = Duration::from_secs(3600);

/// Returns a deterministic signing key.
pub fn key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

/// Returns the address book entry stored in slot 0 at wallet creation.
pub fn destination() -> AddressBookEntry {
    AddressBookEntry {
        address: Address::new([50; 32]),
        name_hash: AddressBookEntryNameHash::new([51; 32]),
    }
}

/// Returns a balance account guid hash.
pub fn guid(seed: u8) -> BalanceAccountGuidHash {
    BalanceAccountGuidHash::new([seed; 32])
}

/// Returns a wallet creation instruction for `config`.
pub fn init_wallet_instruction(config: InitialWalletConfig) -> ProgramInstruction {
    ProgramInstruction::InitWallet {
        wallet_guid_hash: WalletGuidHash::new([7; 32]),
        initial_config: config,
    }
}

/// Processor type used by the harness.
pub type TestProcessor = Processor<InMemoryLedgerStore, BuiltinDAppRuntime, WalletMemoryAuditSink>;

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Wallet test harness.
pub struct Harness {
    /// Processor under test.
    pub processor: TestProcessor,
    /// Audit sink shared with the processor.
    pub audit: WalletMemoryAuditSink,
    /// Key holding the wallet address; it co-signs wallet creation.
    pub wallet_key: SigningKey,
    /// Wallet address.
    pub wallet_address: Address,
    /// Wallet assistant key.
    pub assistant: SigningKey,
    /// Approver keys; approver `i` sits in signer slot `i`.
    pub approvers: Vec<SigningKey>,
    /// Current processing time.
    pub now: Timestamp,
}

impl Harness {
    /// Creates a harness with default limits and no wallet.
    pub fn new() -> Self {
        Self::with_limits(ProcessorLimits::default())
    }

    /// Creates a harness with the given limits and no wallet.
    pub fn with_limits(limits: ProcessorLimits) -> Self {
        let audit = WalletMemoryAuditSink::new();
        let processor = Processor::new(
            InMemoryLedgerStore::new(),
            BuiltinDAppRuntime::new(),
            audit.clone(),
            limits,
        );
        let wallet_key = key(200);
        Self {
            processor,
            audit,
            wallet_address: signing_key_address(&wallet_key),
            wallet_key,
            assistant: key(100),
            approvers: vec![key(1), key(2), key(3)],
            now: Timestamp::from_unix_seconds(START),
        }
    }

    /// Creates a harness holding an initialized wallet.
    pub fn with_wallet() -> Self {
        let mut harness = Self::new();
        harness.init_wallet().unwrap();
        harness
    }

    /// Returns approver `index` as a signer.
    pub fn signer(&self, index: usize) -> Signer {
        Signer::new(signing_key_address(&self.approvers[index]))
    }

    /// Returns approver `index` with its slot.
    pub fn signer_slot(&self, index: usize) -> (SlotId<Signer>, Signer) {
        (SlotId::new(index), self.signer(index))
    }

    /// Returns the wallet configuration used by [`Harness::init_wallet`].
    pub fn initial_config(&self) -> InitialWalletConfig {
        let slots: Vec<_> = (0..self.approvers.len()).map(|index| self.signer_slot(index)).collect();
        InitialWalletConfig {
            approvals_required_for_config: 2,
            approval_timeout_for_config: TIMEOUT,
            signers: slots.clone(),
            config_approvers: slots,
            address_book: vec![(SlotId::new(0), destination())],
        }
    }

    /// Creates the wallet with the assistant as initiator.
    pub fn init_wallet(&mut self) -> Result<ProcessOutcome, WalletError> {
        let config = self.initial_config();
        self.init_wallet_with(config)
    }

    /// Creates the wallet from `config`, signed by the assistant and the
    /// wallet address key.
    pub fn init_wallet_with(
        &mut self,
        config: InitialWalletConfig,
    ) -> Result<ProcessOutcome, WalletError> {
        let assistant = self.assistant.clone();
        let wallet_key = self.wallet_key.clone();
        let signed = self.transaction(&assistant, None, init_wallet_instruction(config));
        self.submit_signed(signed, &[&assistant, &wallet_key])
    }

    /// Signs with every key in `signers` and processes at the current time.
    pub fn submit_signed(
        &mut self,
        mut signed: SignedTransaction,
        signers: &[&SigningKey],
    ) -> Result<ProcessOutcome, WalletError> {
        for signer in signers {
            signed.sign(signer).unwrap();
        }
        self.processor.process(signed, self.now)
    }

    /// Builds an unsigned transaction.
    pub fn transaction(
        &self,
        initiator: &SigningKey,
        operation_id: Option<&str>,
        instruction: ProgramInstruction,
    ) -> SignedTransaction {
        SignedTransaction::new(Transaction {
            wallet_address: self.wallet_address,
            operation_id: operation_id.map(OperationId::from),
            initiator: signing_key_address(initiator),
            instruction,
        })
    }

    /// Signs with the initiator and processes at the current time.
    pub fn submit(
        &mut self,
        initiator: &SigningKey,
        operation_id: Option<&str>,
        instruction: ProgramInstruction,
    ) -> Result<ProcessOutcome, WalletError> {
        let mut signed = self.transaction(initiator, operation_id, instruction);
        signed.sign(initiator).unwrap();
        self.processor.process(signed, self.now)
    }

    /// Records a disposition from approver `index`.
    pub fn dispose(
        &mut self,
        index: usize,
        operation_id: &str,
        disposition: ApprovalDisposition,
        params_hash: ParamsHash,
    ) -> Result<ProcessOutcome, WalletError> {
        let approver = self.approvers[index].clone();
        self.submit(
            &approver,
            Some(operation_id),
            ProgramInstruction::SetApprovalDisposition {
                disposition,
                params_hash,
            },
        )
    }

    /// Approves from each listed approver.
    pub fn approve(&mut self, operation_id: &str, params_hash: ParamsHash, approvers: &[usize]) {
        for index in approvers {
            self.dispose(*index, operation_id, ApprovalDisposition::Approve, params_hash).unwrap();
        }
    }

    /// Runs an assistant-initiated operation through approval and finalize.
    pub fn run_approved(
        &mut self,
        operation_id: &str,
        init: ProgramInstruction,
        finalize: ProgramInstruction,
        approvers: &[usize],
    ) -> Result<ProcessOutcome, WalletError> {
        let assistant = self.assistant.clone();
        let opened = self.submit(&assistant, Some(operation_id), init)?;
        let params_hash = opened.params_hash.unwrap();
        self.approve(operation_id, params_hash, approvers);
        self.submit(&assistant, Some(operation_id), finalize)
    }

    /// Returns account parameters approved by approvers 0 and 1.
    pub fn account_creation(
        &self,
        whitelist: BooleanSetting,
        dapps: BooleanSetting,
    ) -> BalanceAccountCreation {
        BalanceAccountCreation {
            name_hash: BalanceAccountNameHash::new([60; 32]),
            approvals_required_for_transfer: 2,
            approval_timeout_for_transfer: TIMEOUT,
            transfer_approvers: vec![self.signer_slot(0), self.signer_slot(1)],
            whitelist_enabled: whitelist,
            dapps_enabled: dapps,
        }
    }

    /// Creates a balance account through the config approval flow.
    pub fn create_account(
        &mut self,
        account: BalanceAccountGuidHash,
        creation: BalanceAccountCreation,
    ) -> Result<ProcessOutcome, WalletError> {
        let operation_id = format!("create-{account}");
        self.run_approved(
            &operation_id,
            ProgramInstruction::InitBalanceAccountCreation {
                account_guid_hash: account,
                creation_params: creation.clone(),
            },
            ProgramInstruction::FinalizeBalanceAccountCreation {
                account_guid_hash: account,
                creation_params: creation,
            },
            &[0, 1],
        )
    }

    /// Returns the ledger address holding an account's funds.
    pub fn account_address(&self, account: &BalanceAccountGuidHash) -> Address {
        derive_balance_account_address(&self.wallet_address, account)
    }

    /// Funds the native balance of a balance account.
    pub fn fund_account(&self, account: &BalanceAccountGuidHash, amount: u64) {
        let key = BalanceKey::native(self.account_address(account));
        self.processor.store().fund(key, amount).unwrap();
    }

    /// Returns a committed balance.
    pub fn balance(&self, key: BalanceKey) -> u64 {
        self.processor.store().load_balance(&key).unwrap()
    }

    /// Returns the committed wallet.
    pub fn wallet(&self) -> Wallet {
        self.processor.store().load_wallet(&self.wallet_address).unwrap().unwrap()
    }

    /// Returns a committed operation record.
    pub fn operation(&self, operation_id: &str) -> Option<MultisigOp> {
        self.processor.store().load_operation(&OperationId::from(operation_id)).unwrap()
    }

    /// Advances the processing clock.
    pub fn advance(&mut self, duration: Duration) {
        self.now = self.now.checked_add(duration).unwrap();
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
