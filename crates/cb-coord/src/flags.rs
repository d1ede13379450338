//! The shared flag assignment table.
//!
//! Twelve slots, each either empty or holding `(owner account, position)`.
//! Each slot is a last-write-wins register and `merge` is a plain per-slot
//! join. Concurrent writes can leave one account in two slots; readers only
//! see the owner's newest slot.

use std::cmp::Ordering;

use cb_core::{AccountId, Position};

use crate::Stamp;

/// Number of flag slots in the table.
pub const SLOT_COUNT: usize = 12;

/// One flag slot.  Unassigned when `owner` is `None` or `position` is `(0, 0)`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FlagSlot {
    pub owner: Option<AccountId>,
    pub position: Position,
    /// Stamp of the last write; `None` if the slot was never written.
    pub stamp: Option<Stamp>,
}

impl FlagSlot {
    fn empty(stamp: Stamp) -> Self {
        Self { owner: None, position: Position::ORIGIN, stamp: Some(stamp) }
    }

    /// `true` when the slot has an owner and a real position.
    pub fn is_assigned(&self) -> bool {
        self.owner.is_some() && !self.position.is_origin()
    }

    /// Total order used to pick the surviving write: stamp, then content.
    fn rank(&self, other: &FlagSlot) -> Ordering {
        self.stamp
            .cmp(&other.stamp)
            .then_with(|| self.owner.cmp(&other.owner))
            .then_with(|| self.position.x.total_cmp(&other.position.x))
            .then_with(|| self.position.y.total_cmp(&other.position.y))
    }

    fn wins_over(&self, other: &FlagSlot) -> bool {
        self.rank(other) == Ordering::Greater
    }
}

/// Twelve flag slots shared by the whole party.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentTable {
    slots: [FlagSlot; SLOT_COUNT],
}

impl Default for AssignmentTable {
    fn default() -> Self {
        Self { slots: std::array::from_fn(|_| FlagSlot::default()) }
    }
}

impl AssignmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, index: usize) -> Option<&FlagSlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[FlagSlot] {
        &self.slots
    }

    /// Slot index owned by `account`, if any.  When concurrent writes left
    /// the account in several slots, the newest one.
    pub fn index_of(&self, account: &AccountId) -> Option<usize> {
        (0..SLOT_COUNT)
            .filter(|&i| self.slots[i].owner.as_ref() == Some(account))
            .max_by(|&a, &b| self.slots[a].rank(&self.slots[b]))
    }

    /// Position of the flag assigned to `account`; `None` when the account
    /// owns no slot or its slot still sits at `(0, 0)`.
    pub fn assigned_position(&self, account: &AccountId) -> Option<Position> {
        let slot = &self.slots[self.index_of(account)?];
        slot.is_assigned().then_some(slot.position)
    }

    /// Assigned slots as readers see them: one per owner.
    pub fn assignments(&self) -> impl Iterator<Item = (usize, &FlagSlot)> + '_ {
        self.slots.iter().enumerate().filter(|(i, s)| {
            s.is_assigned() && s.owner.as_ref().and_then(|o| self.index_of(o)) == Some(*i)
        })
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments().count()
    }

    /// Newest stamp anywhere in the table.
    pub fn max_stamp(&self) -> Option<&Stamp> {
        self.slots.iter().filter_map(|s| s.stamp.as_ref()).max()
    }

    /// Give slot `index` to `owner` at `position`.
    ///
    /// Out-of-range indices and writes older than the slot's current stamp
    /// are ignored (`false`).  Other slots this replica sees held by `owner`
    /// are released under the same stamp.
    pub fn assign(&mut self, index: usize, owner: AccountId, position: Position, stamp: Stamp) -> bool {
        let previous: Vec<usize> = (0..SLOT_COUNT)
            .filter(|&i| i != index && self.slots[i].owner.as_ref() == Some(&owner))
            .collect();
        let candidate = FlagSlot { owner: Some(owner), position, stamp: Some(stamp.clone()) };
        if !self.write(index, candidate) {
            return false;
        }
        for i in previous {
            self.write(i, FlagSlot::empty(stamp.clone()));
        }
        true
    }

    /// Empty slot `index`.  Same staleness rules as [`assign`](Self::assign).
    pub fn release(&mut self, index: usize, stamp: Stamp) -> bool {
        self.write(index, FlagSlot::empty(stamp))
    }

    /// Empty every slot.
    pub fn clear(&mut self, stamp: Stamp) {
        for i in 0..SLOT_COUNT {
            self.release(i, stamp.clone());
        }
    }

    /// Fold `other` into `self`, keeping the newest write per slot.
    pub fn merge(&mut self, other: &AssignmentTable) {
        for (index, theirs) in other.slots.iter().enumerate() {
            self.write(index, theirs.clone());
        }
    }

    /// Apply one received slot verbatim if it beats the current one.
    pub(crate) fn merge_slot(&mut self, index: usize, slot: FlagSlot) -> bool {
        self.write(index, slot)
    }

    fn write(&mut self, index: usize, candidate: FlagSlot) -> bool {
        let Some(current) = self.slots.get(index) else {
            return false;
        };
        if !candidate.wins_over(current) {
            return false;
        }
        self.slots[index] = candidate;
        true
    }
}
