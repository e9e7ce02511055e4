// crates/strike-wallet-core/src/runtime/store.rs
// ============================================================================
// Module: Strike Wallet In-Memory Store
// Description: Simple in-memory ledger store for tests and local runs.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of [`LedgerStore`] for
//! tests and local demos. Change sets are checked against their read set and
//! applied under one lock, so readers never observe a partial write and a
//! stale change set never lands. It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::identifiers::Address;
use crate::core::identifiers::OperationId;
use crate::core::ledger::BalanceKey;
use crate::core::ledger::LedgerChangeSet;
use crate::core::ledger::LedgerReadSet;
use crate::core::ledger::RecordChange;
use crate::core::multisig_op::DAppMultisigData;
use crate::core::multisig_op::MultisigOp;
use crate::core::wallet::Wallet;
use crate::interfaces::LedgerStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Ledger contents guarded by one mutex.
#[derive(Debug, Default)]
struct LedgerState {
    /// Wallets by address.
    wallets: BTreeMap<Address, Wallet>,
    /// Operation records by id.
    operations: BTreeMap<OperationId, MultisigOp>,
    /// Ids of deleted operation records.
    closed_operations: BTreeSet<OperationId>,
    /// dApp transaction data by operation id.
    dapp_data: BTreeMap<OperationId, DAppMultisigData>,
    /// Balances by owner and mint.
    balances: BTreeMap<BalanceKey, u64>,
}

/// In-memory ledger store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLedgerStore {
    /// Ledger state protected by a mutex.
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedgerStore {
    /// Creates an empty in-memory ledger store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits a balance directly, outside the wallet program.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when the balance would overflow.
    pub fn fund(&self, key: BalanceKey, amount: u64) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let balance = state.balances.entry(key).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| StoreError::Invalid("balance overflow".to_string()))?;
        Ok(())
    }

    /// Returns the first read in `reads` that no longer matches the state.
    fn stale_read(state: &LedgerState, reads: &LedgerReadSet) -> Option<String> {
        if let Some((address, _)) =
            reads.wallets.iter().find(|(address, seen)| state.wallets.get(*address) != seen.as_ref())
        {
            return Some(format!("wallet {address}"));
        }
        if let Some((id, _)) =
            reads.operations.iter().find(|(id, seen)| state.operations.get(*id) != seen.as_ref())
        {
            return Some(format!("operation {id}"));
        }
        if let Some((id, _)) = reads
            .closed_operations
            .iter()
            .find(|(id, closed)| state.closed_operations.contains(*id) != **closed)
        {
            return Some(format!("closed operation {id}"));
        }
        if let Some((id, _)) =
            reads.dapp_data.iter().find(|(id, seen)| state.dapp_data.get(*id) != seen.as_ref())
        {
            return Some(format!("dapp data {id}"));
        }
        reads
            .balances
            .iter()
            .find(|(key, seen)| state.balances.get(*key).copied().unwrap_or(0) != **seen)
            .map(|(key, _)| format!("balance {}", key.owner))
    }

    /// Acquires the state lock.
    fn lock(&self) -> Result<MutexGuard<'_, LedgerState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Store("ledger store mutex poisoned".to_string()))
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load_wallet(&self, address: &Address) -> Result<Option<Wallet>, StoreError> {
        Ok(self.lock()?.wallets.get(address).cloned())
    }

    fn load_operation(&self, id: &OperationId) -> Result<Option<MultisigOp>, StoreError> {
        Ok(self.lock()?.operations.get(id).cloned())
    }

    fn load_dapp_data(&self, id: &OperationId) -> Result<Option<DAppMultisigData>, StoreError> {
        Ok(self.lock()?.dapp_data.get(id).cloned())
    }

    fn is_operation_closed(&self, id: &OperationId) -> Result<bool, StoreError> {
        Ok(self.lock()?.closed_operations.contains(id))
    }

    fn load_balance(&self, key: &BalanceKey) -> Result<u64, StoreError> {
        Ok(self.lock()?.balances.get(key).copied().unwrap_or(0))
    }

    fn apply(&self, changes: &LedgerChangeSet) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if let Some(stale) = Self::stale_read(&state, &changes.reads) {
            return Err(StoreError::Conflict(format!("{stale} changed since it was read")));
        }
        for (address, wallet) in &changes.wallets {
            state.wallets.insert(*address, wallet.clone());
        }
        for (id, change) in &changes.operations {
            match change {
                RecordChange::Upsert(op) => {
                    state.operations.insert(id.clone(), op.clone());
                }
                RecordChange::Delete => {
                    state.operations.remove(id);
                    state.closed_operations.insert(id.clone());
                }
            }
        }
        for (id, change) in &changes.dapp_data {
            match change {
                RecordChange::Upsert(data) => {
                    state.dapp_data.insert(id.clone(), data.clone());
                }
                RecordChange::Delete => {
                    state.dapp_data.remove(id);
                }
            }
        }
        for (key, amount) in &changes.balances {
            state.balances.insert(*key, *amount);
        }
        Ok(())
    }
}
