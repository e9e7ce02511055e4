// crates/strike-wallet-core/src/runtime/dapp.rs
// ============================================================================
// Module: Strike Wallet Builtin dApp Runtime
// Description: Deterministic dApp runtime moving native and token balances.
// Purpose: Execute and simulate dApp instructions without an external VM.
// Dependencies: serde, serde_json, crate::{core, interfaces, runtime::staged}
// ============================================================================

//! ## Overview
//! [`BuiltinDAppRuntime`] decodes instruction data as a JSON
//! [`BuiltinDAppCall`] and applies it to the staged ledger. Debits are only
//! allowed from the balance account the wallet signs for, and every touched
//! account must be listed as writable.
//!
//! Security posture: instruction data is untrusted and fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::Address;
use crate::core::ledger::BalanceKey;
use crate::core::multisig_op::DAppInstruction;
use crate::interfaces::DAppError;
use crate::interfaces::DAppRuntime;
use crate::runtime::staged::StagedLedger;

// ============================================================================
// SECTION: Calls
// ============================================================================

/// Call encoded in the data of a builtin dApp instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum BuiltinDAppCall {
    /// Native balance transfer.
    Transfer {
        /// Debited owner.
        from: Address,
        /// Credited owner.
        to: Address,
        /// Amount in base units.
        amount: u64,
    },
    /// Token balance transfer.
    TokenTransfer {
        /// Debited owner.
        from: Address,
        /// Credited owner.
        to: Address,
        /// Token mint.
        mint: Address,
        /// Amount in base units.
        amount: u64,
    },
}

impl BuiltinDAppCall {
    /// Encodes the call as instruction data.
    ///
    /// # Errors
    ///
    /// Returns [`DAppError::InvalidData`] when encoding fails.
    pub fn encode(&self) -> Result<Vec<u8>, DAppError> {
        serde_json::to_vec(self).map_err(|err| DAppError::InvalidData(err.to_string()))
    }

    /// Decodes instruction data.
    ///
    /// # Errors
    ///
    /// Returns [`DAppError::InvalidData`] when decoding fails.
    pub fn decode(data: &[u8]) -> Result<Self, DAppError> {
        serde_json::from_slice(data).map_err(|err| DAppError::InvalidData(err.to_string()))
    }

    /// Returns the debited and credited balance keys and the amount.
    const fn legs(&self) -> (BalanceKey, BalanceKey, u64) {
        match *self {
            Self::Transfer {
                from,
                to,
                amount,
            } => (BalanceKey::native(from), BalanceKey::native(to), amount),
            Self::TokenTransfer {
                from,
                to,
                mint,
                amount,
            } => (BalanceKey::token(from, mint), BalanceKey::token(to, mint), amount),
        }
    }
}

// ============================================================================
// SECTION: Runtime
// ============================================================================

/// Builtin dApp runtime.
#[derive(Debug, Clone, Default)]
pub struct BuiltinDAppRuntime {
    /// Program ids served; empty serves every program id.
    programs: BTreeSet<Address>,
}

impl BuiltinDAppRuntime {
    /// Creates a runtime serving every program id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runtime serving only the given program ids.
    #[must_use]
    pub fn with_programs(programs: impl IntoIterator<Item = Address>) -> Self {
        Self {
            programs: programs.into_iter().collect(),
        }
    }
}

impl DAppRuntime for BuiltinDAppRuntime {
    fn invoke(
        &self,
        ledger: &mut StagedLedger<'_>,
        instruction: &DAppInstruction,
        program_signer: &Address,
    ) -> Result<(), DAppError> {
        if !self.programs.is_empty() && !self.programs.contains(&instruction.program_id) {
            return Err(DAppError::UnsupportedProgram(instruction.program_id.to_string()));
        }
        let call = BuiltinDAppCall::decode(&instruction.data)?;
        let (from, to, amount) = call.legs();
        if from.owner != *program_signer {
            return Err(DAppError::MissingSigner(from.owner.to_string()));
        }
        for owner in [from.owner, to.owner] {
            let writable = instruction
                .accounts
                .iter()
                .any(|meta| meta.address == owner && meta.is_writable);
            if !writable {
                return Err(DAppError::InvalidData(format!("account {owner} is not writable")));
            }
        }
        ledger.transfer(from, to, amount)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
