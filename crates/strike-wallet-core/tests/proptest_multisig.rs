// crates/strike-wallet-core/tests/proptest_multisig.rs
// ============================================================================
// Module: Multisig Property-Based Tests
// Description: Property tests for slot tables and disposition tallies.
// Purpose: Check invariants across arbitrary slot batches and vote sequences.
// ============================================================================

//! Property-based tests for slot table and approval invariants.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use strike_wallet_core::Address;
use strike_wallet_core::ApprovalDisposition;
use strike_wallet_core::MultisigOp;
use strike_wallet_core::OperationDisposition;
use strike_wallet_core::ParamsHash;
use strike_wallet_core::SlotId;
use strike_wallet_core::Slots;
use strike_wallet_core::Timestamp;

/// Small slot table used by the properties.
type Table = Slots<u8, 8>;

/// Generates slot batches, including out-of-range slots.
fn batch_strategy() -> impl Strategy<Value = Vec<(SlotId<u8>, u8)>> {
    prop::collection::vec((0usize..10, 0u8..6), 0..6)
        .prop_map(|pairs| pairs.into_iter().map(|(index, item)| (SlotId::new(index), item)).collect())
}

/// Generates non-empty dispositions.
fn vote_strategy() -> impl Strategy<Value = ApprovalDisposition> {
    prop_oneof![Just(ApprovalDisposition::Approve), Just(ApprovalDisposition::Deny)]
}

proptest! {
    #[test]
    fn insert_many_is_all_or_nothing(seed in batch_strategy(), batch in batch_strategy()) {
        let mut table = Table::new();
        let _ = table.insert_many(&seed);
        let before = table.clone();
        let allowed = table.can_be_inserted(&batch);
        let result = table.insert_many(&batch);
        prop_assert_eq!(result.is_ok(), allowed);
        if allowed {
            for (id, item) in &batch {
                prop_assert!(table.holds(*id, item));
            }
        } else {
            prop_assert_eq!(table, before);
        }
    }

    #[test]
    fn items_never_occupy_two_slots(batches in prop::collection::vec(batch_strategy(), 0..6)) {
        let mut table = Table::new();
        for batch in &batches {
            let _ = table.insert_many(batch);
        }
        let filled = table.filled_slots();
        for (position, (_, item)) in filled.iter().enumerate() {
            prop_assert!(filled[position + 1..].iter().all(|(_, other)| other != item));
        }
        prop_assert!(filled.len() <= Table::CAPACITY);
    }

    #[test]
    fn remove_after_insert_restores_table(seed in batch_strategy(), batch in batch_strategy()) {
        let mut table = Table::new();
        let _ = table.insert_many(&seed);
        let fresh: Vec<_> = batch
            .into_iter()
            .filter(|(id, _)| table.get(*id).is_none())
            .collect();
        let before = table.clone();
        if table.insert_many(&fresh).is_ok() {
            let mut unique = fresh.clone();
            unique.sort_by_key(|(id, _)| *id);
            unique.dedup();
            table.remove_many(&unique).unwrap();
            prop_assert_eq!(table, before);
        }
    }

    #[test]
    fn disposition_matches_tally(
        approvers in 1usize..8,
        required_seed in 0u8..8,
        votes in prop::collection::vec((0usize..8, vote_strategy()), 0..16),
    ) {
        let count = u8::try_from(approvers).unwrap();
        let required = required_seed % count + 1;
        let keys: Vec<Address> = (0..count).map(|seed| Address::new([seed + 1; 32])).collect();
        let hash = ParamsHash::new([9; 32]);
        let start = Timestamp::from_unix_seconds(0);
        let end = Timestamp::from_unix_seconds(100);
        let mut op = MultisigOp::default();
        op.init(keys.clone(), required, Address::new([200; 32]), start, end, Some(hash)).unwrap();

        for (index, vote) in votes {
            let approver = keys[index % keys.len()];
            let final_before = op.operation_disposition != OperationDisposition::None;
            let result = op.validate_and_record_disposition(&approver, vote, &hash, start);
            prop_assert_eq!(result.is_err(), final_before);
        }

        let approvals = op.count(ApprovalDisposition::Approve);
        let denials = op.count(ApprovalDisposition::Deny);
        let needed = usize::from(required);
        let decided = op.operation_disposition != OperationDisposition::None;
        prop_assert_ne!(op.operation_disposition, OperationDisposition::Expired);
        prop_assert_eq!(op.operation_disposition == OperationDisposition::Approved, approvals >= needed);
        prop_assert_eq!(
            op.operation_disposition == OperationDisposition::Denied,
            approvals < needed && keys.len() - denials < needed
        );
        prop_assert_eq!(op.approved(&hash, start).is_ok(), decided);
    }
}
