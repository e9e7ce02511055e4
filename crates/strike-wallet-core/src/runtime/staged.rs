// crates/strike-wallet-core/src/runtime/staged.rs
// ============================================================================
// Module: Strike Wallet Staged Ledger
// Description: Write-buffering overlay over a ledger store.
// Purpose: Let an instruction read through to the store while its writes stay pending.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`StagedLedger`] reads through to a [`LedgerStore`] and buffers writes in
//! a [`LedgerChangeSet`]. The processor commits the change set only when the
//! instruction succeeds. [`StagedLedger::fork`] copies the pending writes for
//! a throw-away simulation.
//!
//! The first value read from the store for each key is kept in a
//! [`LedgerReadSet`] and shipped with the writes, so the store can reject the
//! commit when another writer got there first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;

use crate::core::error::WalletError;
use crate::core::identifiers::Address;
use crate::core::identifiers::OperationId;
use crate::core::ledger::BalanceChange;
use crate::core::ledger::BalanceKey;
use crate::core::ledger::LedgerChangeSet;
use crate::core::ledger::LedgerReadSet;
use crate::core::ledger::RecordChange;
use crate::core::multisig_op::DAppMultisigData;
use crate::core::multisig_op::MultisigOp;
use crate::core::wallet::Wallet;
use crate::interfaces::LedgerStore;

// ============================================================================
// SECTION: Staged Ledger
// ============================================================================

/// Ledger overlay buffering the writes of one instruction.
pub struct StagedLedger<'a> {
    /// Backing store for reads.
    store: &'a dyn LedgerStore,
    /// Pending writes.
    changes: LedgerChangeSet,
    /// First store value observed per key.
    reads: RefCell<LedgerReadSet>,
}

impl<'a> StagedLedger<'a> {
    /// Creates an overlay with no pending writes.
    #[must_use]
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self {
            store,
            changes: LedgerChangeSet::default(),
            reads: RefCell::new(LedgerReadSet::default()),
        }
    }

    /// Returns an overlay with a copy of the pending writes.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            store: self.store,
            changes: self.changes.clone(),
            reads: RefCell::new(self.reads.borrow().clone()),
        }
    }

    // ------------------------------------------------------------------------
    // Wallets
    // ------------------------------------------------------------------------

    /// Loads the wallet at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Store`] when the store fails.
    pub fn wallet(&self, address: &Address) -> Result<Option<Wallet>, WalletError> {
        if let Some(wallet) = self.changes.wallets.get(address) {
            return Ok(Some(wallet.clone()));
        }
        let wallet = self.store.load_wallet(address)?;
        self.reads.borrow_mut().wallets.entry(*address).or_insert_with(|| wallet.clone());
        Ok(wallet)
    }

    /// Loads an initialized wallet.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::WalletNotInitialized`] when no initialized
    /// wallet exists at `address`.
    pub fn require_wallet(&self, address: &Address) -> Result<Wallet, WalletError> {
        match self.wallet(address)? {
            Some(wallet) if wallet.is_initialized => Ok(wallet),
            _ => Err(WalletError::WalletNotInitialized),
        }
    }

    /// Stages a wallet write.
    pub fn put_wallet(&mut self, address: Address, wallet: Wallet) {
        self.changes.wallets.insert(address, wallet);
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Loads an operation record.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Store`] when the store fails.
    pub fn operation(&self, id: &OperationId) -> Result<Option<MultisigOp>, WalletError> {
        if let Some(change) = self.changes.operations.get(id) {
            return Ok(change.as_record().cloned());
        }
        let op = self.store.load_operation(id)?;
        self.reads.borrow_mut().operations.entry(id.clone()).or_insert_with(|| op.clone());
        Ok(op)
    }

    /// Returns true when the operation id was used by an operation that has
    /// since been closed, here or in the store.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Store`] when the store fails.
    pub fn is_operation_closed(&self, id: &OperationId) -> Result<bool, WalletError> {
        if matches!(self.changes.operations.get(id), Some(RecordChange::Delete)) {
            return Ok(true);
        }
        let closed = self.store.is_operation_closed(id)?;
        self.reads.borrow_mut().closed_operations.entry(id.clone()).or_insert(closed);
        Ok(closed)
    }

    /// Loads an initialized operation record.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::OperationNotFound`] when absent.
    pub fn require_operation(&self, id: &OperationId) -> Result<MultisigOp, WalletError> {
        match self.operation(id)? {
            Some(op) if op.is_initialized => Ok(op),
            _ => Err(WalletError::OperationNotFound),
        }
    }

    /// Stages an operation write.
    pub fn put_operation(&mut self, id: OperationId, op: MultisigOp) {
        self.changes.operations.insert(id, RecordChange::Upsert(op));
    }

    /// Stages an operation deletion; the store keeps the id as closed.
    pub fn delete_operation(&mut self, id: OperationId) {
        self.changes.operations.insert(id, RecordChange::Delete);
    }

    /// Loads dApp transaction data.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Store`] when the store fails.
    pub fn dapp_data(&self, id: &OperationId) -> Result<Option<DAppMultisigData>, WalletError> {
        if let Some(change) = self.changes.dapp_data.get(id) {
            return Ok(change.as_record().cloned());
        }
        let data = self.store.load_dapp_data(id)?;
        self.reads.borrow_mut().dapp_data.entry(id.clone()).or_insert_with(|| data.clone());
        Ok(data)
    }

    /// Stages a dApp transaction data write.
    pub fn put_dapp_data(&mut self, id: OperationId, data: DAppMultisigData) {
        self.changes.dapp_data.insert(id, RecordChange::Upsert(data));
    }

    /// Stages a dApp transaction data deletion.
    pub fn delete_dapp_data(&mut self, id: OperationId) {
        self.changes.dapp_data.insert(id, RecordChange::Delete);
    }

    // ------------------------------------------------------------------------
    // Balances
    // ------------------------------------------------------------------------

    /// Returns a balance, zero when absent.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Store`] when the store fails.
    pub fn balance(&self, key: &BalanceKey) -> Result<u64, WalletError> {
        if let Some(amount) = self.changes.balances.get(key) {
            return Ok(*amount);
        }
        self.store_balance(key)
    }

    /// Reads a balance from the store and records the observation.
    fn store_balance(&self, key: &BalanceKey) -> Result<u64, WalletError> {
        let amount = self.store.load_balance(key)?;
        Ok(*self.reads.borrow_mut().balances.entry(*key).or_insert(amount))
    }

    /// Stages a balance write.
    pub fn set_balance(&mut self, key: BalanceKey, amount: u64) {
        self.changes.balances.insert(key, amount);
    }

    /// Adds `amount` to a balance.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::AmountOverflow`] when the balance would overflow.
    pub fn credit(&mut self, key: BalanceKey, amount: u64) -> Result<(), WalletError> {
        let balance = self.balance(&key)?.checked_add(amount).ok_or(WalletError::AmountOverflow)?;
        self.set_balance(key, balance);
        Ok(())
    }

    /// Subtracts `amount` from a balance.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InsufficientBalance`] when the balance is short.
    pub fn debit(&mut self, key: BalanceKey, amount: u64) -> Result<(), WalletError> {
        let balance =
            self.balance(&key)?.checked_sub(amount).ok_or(WalletError::InsufficientBalance)?;
        self.set_balance(key, balance);
        Ok(())
    }

    /// Moves `amount` from one balance to another.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] when the debit or credit fails.
    pub fn transfer(
        &mut self,
        from: BalanceKey,
        to: BalanceKey,
        amount: u64,
    ) -> Result<(), WalletError> {
        self.debit(from, amount)?;
        self.credit(to, amount)
    }

    /// Lists staged balances that differ from the store, sorted by key.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Store`] when the store fails.
    pub fn balance_changes(&self) -> Result<Vec<BalanceChange>, WalletError> {
        let mut changes = Vec::new();
        for (key, after) in &self.changes.balances {
            let before = self.store_balance(key)?;
            if let Some(change) = BalanceChange::between(*key, before, *after) {
                changes.push(change);
            }
        }
        Ok(changes)
    }

    // ------------------------------------------------------------------------
    // Change Set
    // ------------------------------------------------------------------------

    /// Consumes the overlay, returning the pending writes and the reads
    /// they depend on.
    #[must_use]
    pub fn into_change_set(self) -> LedgerChangeSet {
        let mut changes = self.changes;
        changes.reads = self.reads.into_inner();
        changes
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
