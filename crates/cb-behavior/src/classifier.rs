//! Behavior state classification.

use serde::{Deserialize, Serialize};

use cb_core::{BehaviorState, Range};
use cb_world::Signals;

/// Distance bands separating the three active states.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// A hostile at or inside this distance means `InAggro`.
    pub aggro_range: f32,
    /// A hostile at or inside this distance (but outside aggro) means `CloseToAggro`.
    pub close_range: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            aggro_range: Range::Earshot.units(),
            close_range: Range::Spirit.units(),
        }
    }
}

/// Map this tick's signals to exactly one [`BehaviorState`].
///
/// Missing signals or a non-explorable area yield `Idle`.  An unknown or
/// non-finite hostile distance counts as "no hostile".
pub fn classify(signals: Option<&Signals>, cfg: &ClassifierConfig) -> BehaviorState {
    let Some(s) = signals else {
        return BehaviorState::Idle;
    };
    if !s.in_explorable {
        return BehaviorState::Idle;
    }
    let nearest = s.nearest_hostile.filter(|d| d.is_finite());
    if s.in_combat || nearest.is_some_and(|d| d <= cfg.aggro_range) {
        return BehaviorState::InAggro;
    }
    if nearest.is_some_and(|d| d <= cfg.close_range) {
        return BehaviorState::CloseToAggro;
    }
    BehaviorState::FarFromAggro
}
