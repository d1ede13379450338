//! Distance gating for flag following.

use serde::{Deserialize, Serialize};

/// How urgently an agent should move back to its flag.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Tier {
    /// Close enough; do nothing.
    Hold,
    Normal,
    Urgent,
}

/// Distance thresholds.  Defaults: `near_threshold = 10`,
/// `movement_threshold = 100`.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagGate {
    pub near_threshold: f32,
    pub movement_threshold: f32,
}

impl Default for FlagGate {
    fn default() -> Self {
        Self { near_threshold: 10.0, movement_threshold: 100.0 }
    }
}

impl FlagGate {
    pub fn new(near_threshold: f32, movement_threshold: f32) -> Self {
        Self { near_threshold, movement_threshold }
    }

    /// Both thresholds finite and non-negative, `near` not above `movement`.
    pub fn is_valid(&self) -> bool {
        let finite = self.near_threshold.is_finite() && self.movement_threshold.is_finite();
        finite && self.near_threshold >= 0.0 && self.near_threshold <= self.movement_threshold
    }

    pub fn tier(&self, distance: f32) -> Tier {
        if !distance.is_finite() || distance < self.near_threshold {
            Tier::Hold
        } else if distance > self.movement_threshold * 2.0 {
            Tier::Urgent
        } else if distance > self.movement_threshold {
            Tier::Normal
        } else {
            Tier::Hold
        }
    }
}
