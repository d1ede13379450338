//! Score every registered candidate for one tick.
//!
//! Gates are checked in a fixed order and the first one that fails decides
//! the entry's status:
//!
//! 1. local enabled flag, local typology flag
//! 2. shared `Engine`, `Typology` and `Candidate` toggles
//! 3. allowed-state membership, then `pre_checks_valid`
//! 4. `evaluate`, with NaN treated as no score
//!
//! A panic in `pre_checks_valid` or `evaluate` is contained and counts as a
//! failed gate for that candidate only.
//!
//! `evaluate` is never called on a candidate that failed an earlier gate.

use std::fmt;

use rustc_hash::FxHashSet;
use tracing::{trace, warn};

use cb_behavior::{TickContext, sanitize};
use cb_core::{CandidateId, Typology};
use cb_coord::{CoordinationContext, ToggleKey};

use crate::executor::contain;
use crate::{Registry, Slot};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ScoreStatus {
    Scored,
    /// Turned off locally or through a shared toggle.
    Disabled,
    PreCheckFailed,
    /// Evaluated but not eligible.
    NoScore,
}

impl ScoreStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoreStatus::Scored => "scored",
            ScoreStatus::Disabled => "disabled",
            ScoreStatus::PreCheckFailed => "pre_check_failed",
            ScoreStatus::NoScore => "no_score",
        }
    }
}

impl fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate's result for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreEntry {
    pub candidate: CandidateId,
    pub name: String,
    pub typology: Typology,
    pub status: ScoreStatus,
    /// `Some` only when `status` is `Scored`.
    pub score: Option<f32>,
}

/// Engine-local switches consulted before the shared toggles.
#[derive(Clone, Debug, Default)]
pub struct LocalGates {
    pub disabled_typologies: FxHashSet<Typology>,
}

impl LocalGates {
    pub fn typology_enabled(&self, typology: Typology) -> bool {
        !self.disabled_typologies.contains(&typology)
    }

    pub fn set_typology(&mut self, typology: Typology, enabled: bool) {
        if enabled {
            self.disabled_typologies.remove(&typology);
        } else {
            self.disabled_typologies.insert(typology);
        }
    }
}

/// `true` when neither a local switch nor a shared toggle turns the slot off.
pub fn switched_on(slot: &Slot, gates: &LocalGates, coord: &CoordinationContext) -> bool {
    let info = slot.candidate.info();
    slot.enabled
        && gates.typology_enabled(info.typology)
        && coord.is_enabled(&ToggleKey::Engine, true)
        && coord.is_enabled(&ToggleKey::Typology(info.typology), true)
        && coord.is_enabled(&ToggleKey::candidate(info.name.as_str()), true)
}

/// Score every candidate in registration order.
pub fn score_all(
    registry:  &Registry,
    gates:     &LocalGates,
    ctx:       &TickContext<'_>,
    attempted: &[&str],
) -> Vec<ScoreEntry> {
    registry
        .iter()
        .map(|(id, slot)| {
            let info = slot.candidate.info();
            let entry = |status, score| ScoreEntry {
                candidate: id,
                name: info.name.clone(),
                typology: info.typology,
                status,
                score,
            };

            if !switched_on(slot, gates, ctx.coord) {
                return entry(ScoreStatus::Disabled, None);
            }
            let passed = info.allows(ctx.state)
                && contain(&info.name, "pre_checks_valid", || slot.candidate.pre_checks_valid(ctx))
                    .unwrap_or(false);
            if !passed {
                return entry(ScoreStatus::PreCheckFailed, None);
            }

            let raw = contain(&info.name, "evaluate", || slot.candidate.evaluate(ctx, attempted)).flatten();
            if raw.is_some_and(f32::is_nan) {
                warn!(candidate = %info.name, "evaluate returned NaN; treating as no score");
            }
            match sanitize(raw) {
                Some(score) => {
                    trace!(candidate = %info.name, score, "scored");
                    entry(ScoreStatus::Scored, Some(score))
                }
                None => entry(ScoreStatus::NoScore, None),
            }
        })
        .collect()
}
