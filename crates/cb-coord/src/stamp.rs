//! Last-write-wins stamps.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use cb_core::{AccountId, Millis};

/// When and by whom a shared register was last written.
///
/// Ordered by time first, then by writer identity, so two writes made in the
/// same millisecond by different accounts still have a deterministic winner.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Stamp {
    pub at: Millis,
    pub writer: AccountId,
}

impl Stamp {
    pub fn new(at: Millis, writer: AccountId) -> Self {
        Self { at, writer }
    }
}

impl Ord for Stamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at).then_with(|| self.writer.cmp(&other.writer))
    }
}

impl PartialOrd for Stamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.writer, self.at)
    }
}
