//! Deterministic winner selection.

use std::cmp::Ordering;

use crate::{ScoreEntry, ScoreStatus};

/// Highest score; ties go to the lower typology priority, then to the
/// earlier registration.  `None` when nothing scored.
pub fn select(entries: &[ScoreEntry]) -> Option<&ScoreEntry> {
    entries
        .iter()
        .filter(|e| e.status == ScoreStatus::Scored)
        .filter_map(|e| e.score.map(|s| (e, s)))
        .min_by(|(a, sa), (b, sb)| rank(a, *sa, b, *sb))
        .map(|(e, _)| e)
}

/// `Less` means `a` is preferred.
fn rank(a: &ScoreEntry, sa: f32, b: &ScoreEntry, sb: f32) -> Ordering {
    sb.total_cmp(&sa)
        .then(a.typology.priority().cmp(&b.typology.priority()))
        .then(a.candidate.cmp(&b.candidate))
}
