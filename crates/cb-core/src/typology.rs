//! Candidate typologies and their fixed tie-break priority.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// Broad category of a candidate action.
///
/// When two candidates produce the same score, the one whose typology has
/// the lower [`priority`][Typology::priority] wins.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Typology {
    Healing,
    Protection,
    Combat,
    Buffing,
    Following,
    Coordination,
    Utility,
}

impl Typology {
    pub const ALL: [Typology; 7] = [
        Typology::Healing,
        Typology::Protection,
        Typology::Combat,
        Typology::Buffing,
        Typology::Following,
        Typology::Coordination,
        Typology::Utility,
    ];

    /// Tie-break rank; lower wins.
    #[inline]
    pub fn priority(self) -> u8 {
        match self {
            Typology::Healing      => 1,
            Typology::Protection   => 2,
            Typology::Combat       => 3,
            Typology::Buffing      => 4,
            Typology::Following    => 5,
            Typology::Coordination => 6,
            Typology::Utility      => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Typology::Healing      => "healing",
            Typology::Protection   => "protection",
            Typology::Combat       => "combat",
            Typology::Buffing      => "buffing",
            Typology::Following    => "following",
            Typology::Coordination => "coordination",
            Typology::Utility      => "utility",
        }
    }
}

impl fmt::Display for Typology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Typology {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Typology::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| CoreError::UnknownTypology(s.to_string()))
    }
}
