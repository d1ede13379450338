//! Score definitions.
//!
//! A score is `Option<f32>`: `None` means "not eligible this tick" and is
//! distinct from `Some(0.0)`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a candidate's score is produced, for inspection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScoreDefinition {
    /// Always the same value when eligible.
    Static(f32),
    /// Computed per tick, never above `max`.
    Dynamic { max: f32 },
}

impl ScoreDefinition {
    /// The fixed value of a static definition.
    pub fn value(&self) -> Option<f32> {
        match *self {
            ScoreDefinition::Static(v) => Some(v),
            ScoreDefinition::Dynamic { .. } => None,
        }
    }

    /// Highest score this definition can produce.
    pub fn max(&self) -> f32 {
        match *self {
            ScoreDefinition::Static(v) => v,
            ScoreDefinition::Dynamic { max } => max,
        }
    }

    /// Human-readable descriptor, e.g. `"33"` or `"up to 95"`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ScoreDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ScoreDefinition::Static(v) => write!(f, "{v}"),
            ScoreDefinition::Dynamic { max } => write!(f, "up to {max}"),
        }
    }
}

/// Treat NaN as ineligible.
#[inline]
pub fn sanitize(score: Option<f32>) -> Option<f32> {
    score.filter(|s| !s.is_nan())
}
