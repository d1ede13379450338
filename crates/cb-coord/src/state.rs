//! The complete shared state: one mergeable unit per replica.

use crate::{AssignmentTable, SharedToggles, Stamp};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SharedState {
    pub flags: AssignmentTable,
    pub toggles: SharedToggles,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: &SharedState) {
        self.flags.merge(&other.flags);
        self.toggles.merge(&other.toggles);
    }

    /// Newest stamp anywhere in the state.
    pub fn max_stamp(&self) -> Option<&Stamp> {
        self.flags.max_stamp().max(self.toggles.max_stamp())
    }
}
