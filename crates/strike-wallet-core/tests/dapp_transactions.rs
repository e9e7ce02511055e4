// crates/strike-wallet-core/tests/dapp_transactions.rs
// ============================================================================
// Module: dApp Transaction Tests
// Description: Tests for opening, filling, simulating, and executing dApp transactions.
// ============================================================================
//! ## Overview
//! Validates that dApp instructions run with the balance account as signer
//! only after approval, and that pending transactions can be simulated.

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

mod common;

use common::Harness;
use common::guid;
use strike_wallet_core::AccountMeta;
use strike_wallet_core::Address;
use strike_wallet_core::ApprovalDisposition;
use strike_wallet_core::BalanceAccountGuidHash;
use strike_wallet_core::BalanceDirection;
use strike_wallet_core::BalanceKey;
use strike_wallet_core::BooleanSetting;
use strike_wallet_core::BuiltinDAppCall;
use strike_wallet_core::DAppBookEntry;
use strike_wallet_core::DAppBookEntryNameHash;
use strike_wallet_core::DAppInstruction;
use strike_wallet_core::LedgerStore;
use strike_wallet_core::OperationDisposition;
use strike_wallet_core::OperationId;
use strike_wallet_core::ParamsHash;
use strike_wallet_core::ProcessOutcome;
use strike_wallet_core::ProgramInstruction;
use strike_wallet_core::WalletAuditOutcome;
use strike_wallet_core::WalletError;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Address credited by the test instructions.
const TARGET: Address = Address::new([91; 32]);

/// Returns the dApp targeted by the tests.
fn dapp() -> DAppBookEntry {
    DAppBookEntry {
        address: Address::new([70; 32]),
        name_hash: DAppBookEntryNameHash::new([71; 32]),
    }
}

/// Creates a wallet with one account holding 1000 native units.
fn setup(whitelist: BooleanSetting, dapps: BooleanSetting) -> (Harness, BalanceAccountGuidHash) {
    let mut harness = Harness::with_wallet();
    let account = guid(1);
    let creation = harness.account_creation(whitelist, dapps);
    harness.create_account(account, creation).unwrap();
    harness.fund_account(&account, 1_000);
    (harness, account)
}

/// Builds a builtin transfer instruction.
fn transfer_instruction(from: Address, to: Address, amount: u64) -> DAppInstruction {
    DAppInstruction {
        program_id: dapp().address,
        accounts: vec![
            AccountMeta {
                address: from,
                is_signer: true,
                is_writable: true,
            },
            AccountMeta {
                address: to,
                is_signer: false,
                is_writable: true,
            },
        ],
        data: BuiltinDAppCall::Transfer {
            from,
            to,
            amount,
        }
        .encode()
        .unwrap(),
    }
}

/// Opens operation `dapp` as approver 0.
fn open(
    harness: &mut Harness,
    account: BalanceAccountGuidHash,
    instruction_count: u8,
) -> Result<ProcessOutcome, WalletError> {
    let approver = harness.approvers[0].clone();
    harness.submit(
        &approver,
        Some("dapp"),
        ProgramInstruction::InitDAppTransaction {
            account_guid_hash: account,
            dapp: dapp(),
            instruction_count,
        },
    )
}

/// Supplies instructions to operation `dapp` as approver 0.
fn supply(
    harness: &mut Harness,
    starting_index: u8,
    instructions: Vec<DAppInstruction>,
) -> Result<ProcessOutcome, WalletError> {
    let approver = harness.approvers[0].clone();
    harness.submit(
        &approver,
        Some("dapp"),
        ProgramInstruction::SupplyDAppTransactionInstructions {
            starting_index,
            instructions,
        },
    )
}

/// Finalizes operation `dapp` as the assistant.
fn finalize(
    harness: &mut Harness,
    account: BalanceAccountGuidHash,
    params_hash: ParamsHash,
) -> Result<ProcessOutcome, WalletError> {
    let assistant = harness.assistant.clone();
    harness.submit(
        &assistant,
        Some("dapp"),
        ProgramInstruction::FinalizeDAppTransaction {
            account_guid_hash: account,
            params_hash,
        },
    )
}

/// Opens a two-instruction transaction moving 100 then 50 to [`TARGET`].
fn open_and_fill(harness: &mut Harness, account: BalanceAccountGuidHash) -> ParamsHash {
    let source = harness.account_address(&account);
    let opened = open(harness, account, 2).unwrap();
    assert_eq!(opened.params_hash, None);
    let partial = supply(harness, 0, vec![transfer_instruction(source, TARGET, 100)]).unwrap();
    assert_eq!(partial.params_hash, None);
    let filled = supply(harness, 1, vec![transfer_instruction(source, TARGET, 50)]).unwrap();
    filled.params_hash.unwrap()
}

// ============================================================================
// SECTION: Opening
// ============================================================================

/// Verifies dApp transactions require dApps to be enabled on the account.
#[test]
fn dapps_must_be_enabled() {
    let (mut harness, account) = setup(BooleanSetting::Off, BooleanSetting::Off);
    assert_eq!(open(&mut harness, account, 1).unwrap_err(), WalletError::DAppsDisabled);
}

/// Verifies whitelisted accounts only reach dApps in the dApp book.
#[test]
fn whitelisted_account_requires_known_dapp() {
    let (mut harness, account) = setup(BooleanSetting::On, BooleanSetting::On);
    assert_eq!(open(&mut harness, account, 1).unwrap_err(), WalletError::DAppNotAllowed);
}

/// Verifies the instruction count is bounded.
#[test]
fn instruction_count_is_bounded() {
    let (mut harness, account) = setup(BooleanSetting::Off, BooleanSetting::On);
    assert!(matches!(open(&mut harness, account, 0), Err(WalletError::InvalidInstruction(_))));
    assert!(matches!(open(&mut harness, account, 17), Err(WalletError::InvalidInstruction(_))));
    open(&mut harness, account, 16).unwrap();
}

// ============================================================================
// SECTION: Supplying
// ============================================================================

/// Verifies instruction slots are bounded, immutable, and owned by the initiator.
#[test]
fn supplied_instructions_follow_slot_rules() {
    let (mut harness, account) = setup(BooleanSetting::Off, BooleanSetting::On);
    let source = harness.account_address(&account);
    open(&mut harness, account, 1).unwrap();

    let err = supply(&mut harness, 1, vec![transfer_instruction(source, TARGET, 1)]).unwrap_err();
    assert_eq!(err, WalletError::DAppInstructionOverflow);

    let other = harness.approvers[1].clone();
    let err = harness
        .submit(
            &other,
            Some("dapp"),
            ProgramInstruction::SupplyDAppTransactionInstructions {
                starting_index: 0,
                instructions: vec![transfer_instruction(source, TARGET, 1)],
            },
        )
        .unwrap_err();
    assert_eq!(err, WalletError::UnauthorizedInitiator);

    supply(&mut harness, 0, vec![transfer_instruction(source, TARGET, 1)]).unwrap();
    supply(&mut harness, 0, vec![transfer_instruction(source, TARGET, 1)]).unwrap();
    let err = supply(&mut harness, 0, vec![transfer_instruction(source, TARGET, 2)]).unwrap_err();
    assert_eq!(err, WalletError::DAppInstructionAlreadySupplied);
}

/// Verifies approvals wait until every instruction is supplied.
#[test]
fn approvals_wait_for_params_hash() {
    let (mut harness, account) = setup(BooleanSetting::Off, BooleanSetting::On);
    open(&mut harness, account, 1).unwrap();
    let err = harness
        .dispose(1, "dapp", ApprovalDisposition::Approve, ParamsHash::new([0; 32]))
        .unwrap_err();
    assert_eq!(err, WalletError::OperationNotInitialized);
}

// ============================================================================
// SECTION: Finalizing
// ============================================================================

/// Verifies a pending transaction is simulated and an approved one executed.
#[test]
fn pending_transaction_simulates_then_executes() {
    let (mut harness, account) = setup(BooleanSetting::Off, BooleanSetting::On);
    let source = BalanceKey::native(harness.account_address(&account));
    let target = BalanceKey::native(TARGET);
    let params_hash = open_and_fill(&mut harness, account);

    let err = finalize(&mut harness, account, params_hash).unwrap_err();
    let changes = match err {
        WalletError::SimulationFinished {
            changes,
        } => changes,
        other => panic!("expected simulation result, got {other:?}"),
    };
    assert_eq!(changes.len(), 2);
    let debit = changes.iter().find(|change| change.owner == source.owner).unwrap();
    assert_eq!(debit.direction, BalanceDirection::Decrease);
    assert_eq!(debit.amount, 150);
    assert_eq!(harness.balance(source), 1_000);
    assert_eq!(harness.balance(target), 0);

    let simulated = harness.audit.events().pop().unwrap();
    assert_eq!(simulated.outcome, WalletAuditOutcome::Failure);
    assert_eq!(simulated.balance_changes, changes);

    harness.approve("dapp", params_hash, &[1]);
    let outcome = finalize(&mut harness, account, params_hash).unwrap();
    assert_eq!(outcome.operation_disposition, Some(OperationDisposition::Approved));
    assert_eq!(outcome.balance_changes, changes);
    assert_eq!(harness.balance(source), 850);
    assert_eq!(harness.balance(target), 150);
    assert!(harness.operation("dapp").is_none());
    let data = harness.processor.store().load_dapp_data(&OperationId::from("dapp")).unwrap();
    assert!(data.is_none());
    assert_eq!(open(&mut harness, account, 2).unwrap_err(), WalletError::OperationAlreadyExists);
}

/// Verifies finalize naming a hash other than the supplied instructions'
/// is treated as a bad signature and leaves the operation open.
#[test]
fn finalize_rejects_other_params_hash() {
    let (mut harness, account) = setup(BooleanSetting::Off, BooleanSetting::On);
    let params_hash = open_and_fill(&mut harness, account);
    harness.approve("dapp", params_hash, &[1]);
    let err = finalize(&mut harness, account, ParamsHash::new([5; 32])).unwrap_err();
    assert_eq!(err, WalletError::InvalidSignature);
    assert_eq!(err.code(), 2);
    assert!(harness.operation("dapp").is_some());
    assert_eq!(harness.balance(BalanceKey::native(TARGET)), 0);
}

/// Verifies a denied transaction closes without running instructions.
#[test]
fn denied_transaction_closes_without_running() {
    let (mut harness, account) = setup(BooleanSetting::Off, BooleanSetting::On);
    let params_hash = open_and_fill(&mut harness, account);
    harness.dispose(1, "dapp", ApprovalDisposition::Deny, params_hash).unwrap();
    let outcome = finalize(&mut harness, account, params_hash).unwrap();
    assert_eq!(outcome.operation_disposition, Some(OperationDisposition::Denied));
    assert!(outcome.balance_changes.is_empty());
    assert_eq!(harness.balance(BalanceKey::native(TARGET)), 0);
    assert!(harness.operation("dapp").is_none());
}

/// Verifies instructions cannot debit accounts the wallet does not sign for.
#[test]
fn instruction_failure_commits_nothing() {
    let (mut harness, account) = setup(BooleanSetting::Off, BooleanSetting::On);
    let other = Address::new([92; 32]);
    harness.processor.store().fund(BalanceKey::native(other), 500).unwrap();
    open(&mut harness, account, 1).unwrap();
    let filled = supply(&mut harness, 0, vec![transfer_instruction(other, TARGET, 10)]).unwrap();
    let params_hash = filled.params_hash.unwrap();
    harness.approve("dapp", params_hash, &[1]);

    let err = finalize(&mut harness, account, params_hash).unwrap_err();
    assert!(matches!(err, WalletError::DAppInstructionFailed(_)));
    assert_eq!(harness.balance(BalanceKey::native(other)), 500);
    assert!(harness.operation("dapp").is_some());
}
