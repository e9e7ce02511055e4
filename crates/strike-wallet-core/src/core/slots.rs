// crates/strike-wallet-core/src/core/slots.rs
// ============================================================================
// Module: Strike Wallet Slot Tables
// Description: Fixed-capacity slot tables and slot flag sets.
// Purpose: Address signers, address book entries, and dApps by stable slot index.
// Dependencies: serde, crate::core::error
// ============================================================================

//! ## Overview
//! Wallet collections are fixed-capacity tables. Approver sets and whitelists
//! refer to entries by [`SlotId`], so an entry keeps its index for its whole
//! lifetime and flags stay valid while other slots change.
//!
//! Security posture: batch inserts and removals are all-or-nothing; a batch
//! that fails any check leaves the table untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::core::error::WalletError;

// ============================================================================
// SECTION: Slot Identifier
// ============================================================================

/// Typed index into a slot table of `T`.
pub struct SlotId<T> {
    /// Zero-based slot index.
    index: usize,
    /// Item type marker.
    marker: PhantomData<fn() -> T>,
}

impl<T> SlotId<T> {
    /// Creates a slot identifier.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            marker: PhantomData,
        }
    }

    /// Returns the zero-based slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

impl<T> Clone for SlotId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SlotId<T> {}

impl<T> PartialEq for SlotId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for SlotId<T> {}

impl<T> PartialOrd for SlotId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for SlotId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for SlotId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for SlotId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({})", self.index)
    }
}

impl<T> Serialize for SlotId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let index = u64::try_from(self.index).map_err(serde::ser::Error::custom)?;
        serializer.serialize_u64(index)
    }
}

impl<'de, T> Deserialize<'de> for SlotId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = u64::deserialize(deserializer)?;
        usize::try_from(index).map(Self::new).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Slot Table
// ============================================================================

/// Fixed-capacity table of `N` optional entries.
///
/// # Invariants
/// - The backing vector always holds exactly `N` slots.
/// - An item occupies at most one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slots<T, const N: usize> {
    /// Slot storage; `None` marks an empty slot.
    items: Vec<Option<T>>,
}

impl<T, const N: usize> Default for Slots<T, N> {
    fn default() -> Self {
        Self {
            items: std::iter::repeat_with(|| None).take(N).collect(),
        }
    }
}

impl<T, const N: usize> Slots<T, N> {
    /// Table capacity.
    pub const CAPACITY: usize = N;

    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the item stored in a slot, if any.
    #[must_use]
    pub fn get(&self, id: SlotId<T>) -> Option<&T> {
        self.items.get(id.index()).and_then(Option::as_ref)
    }

    /// Returns the number of filled slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.iter().filter(|item| item.is_some()).count()
    }

    /// Returns true when no slot is filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.iter().all(Option::is_none)
    }

    /// Iterates filled slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId<T>, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| item.as_ref().map(|item| (SlotId::new(index), item)))
    }
}

impl<T: Clone + PartialEq, const N: usize> Slots<T, N> {
    /// Builds a table from positional entries, padding to capacity.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::SlotCannotBeInserted`] when more than `N`
    /// entries are supplied or an item appears in two slots.
    pub fn from_vec(mut items: Vec<Option<T>>) -> Result<Self, WalletError> {
        if items.len() > N {
            return Err(WalletError::SlotCannotBeInserted);
        }
        items.resize(N, None);
        let table = Self {
            items,
        };
        let filled: Vec<&T> = table.items.iter().flatten().collect();
        for (position, item) in filled.iter().enumerate() {
            if filled[position + 1..].contains(item) {
                return Err(WalletError::SlotCannotBeInserted);
            }
        }
        Ok(table)
    }

    /// Returns the slot holding `item`, if any.
    #[must_use]
    pub fn find_id(&self, item: &T) -> Option<SlotId<T>> {
        self.items.iter().position(|slot| slot.as_ref() == Some(item)).map(SlotId::new)
    }

    /// Returns true when `item` occupies some slot.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.find_id(item).is_some()
    }

    /// Returns true when `(slot, item)` names a filled slot holding `item`.
    #[must_use]
    pub fn holds(&self, id: SlotId<T>, item: &T) -> bool {
        self.get(id) == Some(item)
    }

    /// Returns filled slots as owned pairs.
    #[must_use]
    pub fn filled_slots(&self) -> Vec<(SlotId<T>, T)> {
        self.iter().map(|(id, item)| (id, item.clone())).collect()
    }

    /// Returns true when every entry could be inserted as one batch.
    ///
    /// Each slot must be in range and either empty or already holding the
    /// same item, and no item may land in two different slots.
    #[must_use]
    pub fn can_be_inserted(&self, entries: &[(SlotId<T>, T)]) -> bool {
        for (position, (id, item)) in entries.iter().enumerate() {
            let Some(current) = self.items.get(id.index()) else {
                return false;
            };
            if let Some(existing) = current
                && existing != item
            {
                return false;
            }
            if let Some(other) = self.find_id(item)
                && other != *id
            {
                return false;
            }
            for (earlier_id, earlier_item) in &entries[..position] {
                if (earlier_id == id) != (earlier_item == item) {
                    return false;
                }
            }
        }
        true
    }

    /// Inserts a batch of entries.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::SlotCannotBeInserted`] when the batch fails
    /// [`Slots::can_be_inserted`]; the table is unchanged.
    pub fn insert_many(&mut self, entries: &[(SlotId<T>, T)]) -> Result<(), WalletError> {
        if !self.can_be_inserted(entries) {
            return Err(WalletError::SlotCannotBeInserted);
        }
        for (id, item) in entries {
            if let Some(slot) = self.items.get_mut(id.index()) {
                *slot = Some(item.clone());
            }
        }
        Ok(())
    }

    /// Returns true when every slot holds exactly the given item.
    #[must_use]
    pub fn can_be_removed(&self, entries: &[(SlotId<T>, T)]) -> bool {
        entries.iter().all(|(id, item)| self.holds(*id, item))
    }

    /// Removes a batch of entries.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::SlotCannotBeRemoved`] when any slot does not
    /// hold the given item; the table is unchanged.
    pub fn remove_many(&mut self, entries: &[(SlotId<T>, T)]) -> Result<(), WalletError> {
        if !self.can_be_removed(entries) {
            return Err(WalletError::SlotCannotBeRemoved);
        }
        for (id, _) in entries {
            if let Some(slot) = self.items.get_mut(id.index()) {
                *slot = None;
            }
        }
        Ok(())
    }
}

/// Serialized form of one filled slot.
#[derive(Serialize)]
struct SlotEntryRef<'a, T> {
    /// Slot index.
    slot: usize,
    /// Slot item.
    item: &'a T,
}

/// Deserialized form of one filled slot.
#[derive(Deserialize)]
struct SlotEntry<T> {
    /// Slot index.
    slot: usize,
    /// Slot item.
    item: T,
}

impl<T: Serialize, const N: usize> Serialize for Slots<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(id, item)| SlotEntryRef {
            slot: id.index(),
            item,
        }))
    }
}

impl<'de, T: Deserialize<'de> + Clone + PartialEq, const N: usize> Deserialize<'de>
    for Slots<T, N>
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<SlotEntry<T>>::deserialize(deserializer)?;
        let mut items: Vec<Option<T>> = std::iter::repeat_with(|| None).take(N).collect();
        for entry in entries {
            let Some(slot) = items.get_mut(entry.slot) else {
                return Err(serde::de::Error::custom(format!(
                    "slot {} exceeds capacity {N}",
                    entry.slot
                )));
            };
            if slot.is_some() {
                return Err(serde::de::Error::custom(format!("slot {} is duplicated", entry.slot)));
            }
            *slot = Some(entry.item);
        }
        Self::from_vec(items).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Slot Flags
// ============================================================================

/// Ordered set of enabled slots in some table of `T`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotFlags<T> {
    /// Enabled slot identifiers.
    enabled: BTreeSet<SlotId<T>>,
}

impl<T> Default for SlotFlags<T> {
    fn default() -> Self {
        Self {
            enabled: BTreeSet::new(),
        }
    }
}

impl<T> SlotFlags<T> {
    /// Creates an empty flag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a flag set with the given slots enabled.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = SlotId<T>>) -> Self {
        Self {
            enabled: ids.into_iter().collect(),
        }
    }

    /// Enables a slot.
    pub fn enable(&mut self, id: SlotId<T>) {
        self.enabled.insert(id);
    }

    /// Disables a slot.
    pub fn disable(&mut self, id: SlotId<T>) {
        self.enabled.remove(&id);
    }

    /// Returns true when the slot is enabled.
    #[must_use]
    pub fn is_enabled(&self, id: SlotId<T>) -> bool {
        self.enabled.contains(&id)
    }

    /// Returns the number of enabled slots.
    #[must_use]
    pub fn count_enabled(&self) -> usize {
        self.enabled.len()
    }

    /// Iterates enabled slots in index order.
    pub fn iter_enabled(&self) -> impl Iterator<Item = SlotId<T>> + '_ {
        self.enabled.iter().copied()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::*;

    type Table = Slots<u32, 4>;

    fn id(index: usize) -> SlotId<u32> {
        SlotId::new(index)
    }

    #[test]
    fn insert_rejects_out_of_range_slot() {
        let mut table = Table::new();
        assert_eq!(table.insert_many(&[(id(4), 7)]), Err(WalletError::SlotCannotBeInserted));
        assert!(table.is_empty());
    }

    #[test]
    fn insert_rejects_item_in_other_slot() {
        let mut table = Table::new();
        table.insert_many(&[(id(0), 7)]).unwrap();
        assert_eq!(table.insert_many(&[(id(1), 7)]), Err(WalletError::SlotCannotBeInserted));
        // Same item in the same slot is accepted.
        table.insert_many(&[(id(0), 7)]).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn insert_rejects_conflicting_batch() {
        let mut table = Table::new();
        assert!(!table.can_be_inserted(&[(id(0), 1), (id(0), 2)]));
        assert!(!table.can_be_inserted(&[(id(0), 1), (id(1), 1)]));
        table.insert_many(&[(id(0), 1), (id(1), 2)]).unwrap();
        assert_eq!(table.get(id(1)), Some(&2));
    }

    #[test]
    fn remove_requires_exact_item() {
        let mut table = Table::new();
        table.insert_many(&[(id(2), 9)]).unwrap();
        assert_eq!(table.remove_many(&[(id(2), 8)]), Err(WalletError::SlotCannotBeRemoved));
        table.remove_many(&[(id(2), 9)]).unwrap();
        assert_eq!(table.get(id(2)), None);
    }

    #[test]
    fn serde_keeps_slot_positions() {
        let mut table = Table::new();
        table.insert_many(&[(id(3), 5), (id(1), 6)]).unwrap();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"slot": 1, "item": 6}, {"slot": 3, "item": 5}])
        );
        let back: Table = serde_json::from_value(json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn deserialize_rejects_out_of_range() {
        let json = serde_json::json!([{"slot": 9, "item": 1}]);
        assert!(serde_json::from_value::<Table>(json).is_err());
    }

    #[test]
    fn flags_track_enabled_slots() {
        let mut flags = SlotFlags::<u32>::new();
        flags.enable(id(3));
        flags.enable(id(1));
        flags.enable(id(3));
        assert_eq!(flags.count_enabled(), 2);
        assert_eq!(flags.iter_enabled().collect::<Vec<_>>(), vec![id(1), id(3)]);
        flags.disable(id(1));
        assert!(!flags.is_enabled(id(1)));
    }
}
