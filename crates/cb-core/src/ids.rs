//! Strongly typed identifier wrappers.
//!
//! Numeric IDs are `Copy + Ord + Hash` so they can be used as map keys and
//! sorted collection elements without ceremony.  `AccountId` is the one
//! string identity: it is the stable key used across processes, whereas
//! `AgentId` is the transient in-session identifier that the environment
//! reassigns on every map transition.

use std::fmt;
use std::sync::Arc;

use crate::{CoreError, CoreResult};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// In-session agent identifier (changes across environment transitions).
    pub struct AgentId(u32);
}

typed_id! {
    /// Registration index of a candidate inside one decision loop.
    /// Lower index = registered earlier = wins the final tie-break.
    pub struct CandidateId(u32);
}

typed_id! {
    /// Identifier of a skill in the environment's skill table.
    pub struct SkillId(u32);
}

typed_id! {
    /// Model identifier of an inventory item (consumables, traps, …).
    pub struct ItemModelId(u32);
}

// ── AccountId ─────────────────────────────────────────────────────────────────

/// Stable account/session identity (e.g. the account e-mail).
///
/// Cheap to clone (`Arc<str>`).  Ordering is lexicographic, which makes it
/// usable as the deterministic tie-breaker of last-write-wins stamps.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AccountId(Arc<str>);

impl AccountId {
    /// Build an identity, rejecting empty or whitespace-only strings.
    pub fn new(value: impl AsRef<str>) -> CoreResult<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidAccount("identity is empty".into()));
        }
        Ok(Self(Arc::from(trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = CoreError;
    fn from_str(s: &str) -> CoreResult<Self> {
        Self::new(s)
    }
}
