//! Agent professions.
//!
//! The set is closed: buff configurations store one activation flag per
//! variant in a fixed-size array indexed by [`Role::index`].

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// The profession of a party member.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Warrior,
    Ranger,
    Monk,
    Necromancer,
    Mesmer,
    Elementalist,
    Assassin,
    Ritualist,
    Paragon,
    Dervish,
}

impl Role {
    /// Number of variants; size of per-role arrays.
    pub const COUNT: usize = 10;

    /// Every role in declaration order.
    pub const ALL: [Role; Role::COUNT] = [
        Role::Warrior,
        Role::Ranger,
        Role::Monk,
        Role::Necromancer,
        Role::Mesmer,
        Role::Elementalist,
        Role::Assassin,
        Role::Ritualist,
        Role::Paragon,
        Role::Dervish,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Melee and physical-damage professions.
    pub fn is_martial(self) -> bool {
        matches!(
            self,
            Role::Warrior | Role::Ranger | Role::Assassin | Role::Paragon | Role::Dervish
        )
    }

    /// Spellcasting professions (the complement of [`is_martial`][Self::is_martial]).
    pub fn is_caster(self) -> bool {
        !self.is_martial()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Warrior      => "warrior",
            Role::Ranger       => "ranger",
            Role::Monk         => "monk",
            Role::Necromancer  => "necromancer",
            Role::Mesmer       => "mesmer",
            Role::Elementalist => "elementalist",
            Role::Assassin     => "assassin",
            Role::Ritualist    => "ritualist",
            Role::Paragon      => "paragon",
            Role::Dervish      => "dervish",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == lower)
            .ok_or_else(|| CoreError::UnknownRole(s.to_string()))
    }
}
