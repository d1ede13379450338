//! Per-tick environment signals consumed by the state classifier.

/// Raw situational inputs.  A `None` from [`Environment::signals`] means the
/// environment is not loaded (map transition, character select, …).
///
/// [`Environment::signals`]: crate::Environment::signals
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signals {
    /// `true` in areas where fighting is possible (not a town or outpost).
    pub in_explorable: bool,
    /// The agent is currently engaged in combat.
    pub in_combat: bool,
    /// Distance to the nearest known hostile, if any is known.
    pub nearest_hostile: Option<f32>,
}

impl Signals {
    /// Signals for a peaceful explorable area with no hostile in sight.
    pub fn quiet() -> Self {
        Self { in_explorable: true, in_combat: false, nearest_hostile: None }
    }

    /// Signals for a town: nothing should run.
    pub fn town() -> Self {
        Self { in_explorable: false, in_combat: false, nearest_hostile: None }
    }
}
