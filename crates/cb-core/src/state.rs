//! The coarse situational state an agent is in for one tick.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// Recomputed from environment signals at the start of every tick.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorState {
    /// Not in a playable area, or signals unavailable.  Nothing runs.
    #[default]
    Idle,
    /// Fighting, or a hostile is within aggro range.
    InAggro,
    /// A hostile is near but outside aggro range.
    CloseToAggro,
    /// Playable area with no hostile nearby.
    FarFromAggro,
}

impl BehaviorState {
    pub const ALL: [BehaviorState; 4] = [
        BehaviorState::Idle,
        BehaviorState::InAggro,
        BehaviorState::CloseToAggro,
        BehaviorState::FarFromAggro,
    ];

    /// The three states in which candidates may act.
    pub const ACTIVE: [BehaviorState; 3] = [
        BehaviorState::InAggro,
        BehaviorState::CloseToAggro,
        BehaviorState::FarFromAggro,
    ];

    #[inline]
    pub fn is_idle(self) -> bool {
        self == BehaviorState::Idle
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorState::Idle         => "idle",
            BehaviorState::InAggro      => "in_aggro",
            BehaviorState::CloseToAggro => "close_to_aggro",
            BehaviorState::FarFromAggro => "far_from_aggro",
        }
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BehaviorState {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let lower = s.trim().to_ascii_lowercase();
        BehaviorState::ALL
            .into_iter()
            .find(|st| st.as_str() == lower)
            .ok_or_else(|| CoreError::UnknownState(s.to_string()))
    }
}
