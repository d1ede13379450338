//! Shared boolean toggles.
//!
//! A toggle that was never written is absent; readers fall back to their own
//! local default through [`SharedToggles::is_enabled`].

use std::cmp::Ordering;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use cb_core::{Role, Typology};

use crate::Stamp;

/// What a shared toggle controls.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ToggleKey {
    /// Party-wide master switch.
    Engine,
    /// Every candidate of one typology.
    Typology(Typology),
    /// One candidate, by name.
    Candidate(String),
    /// Whether candidate `candidate` may target members of `role`.
    Buff { candidate: String, role: Role },
}

impl ToggleKey {
    pub fn candidate(name: impl Into<String>) -> Self {
        ToggleKey::Candidate(name.into())
    }

    pub fn buff(candidate: impl Into<String>, role: Role) -> Self {
        ToggleKey::Buff { candidate: candidate.into(), role }
    }
}

impl fmt::Display for ToggleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleKey::Engine => f.write_str("engine"),
            ToggleKey::Typology(t) => write!(f, "typology:{t}"),
            ToggleKey::Candidate(n) => write!(f, "candidate:{n}"),
            ToggleKey::Buff { candidate, role } => write!(f, "buff:{candidate}:{role}"),
        }
    }
}

/// A single last-write-wins boolean.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ToggleValue {
    pub enabled: bool,
    pub stamp: Stamp,
}

impl ToggleValue {
    fn wins_over(&self, other: &ToggleValue) -> bool {
        self.stamp
            .cmp(&other.stamp)
            .then_with(|| self.enabled.cmp(&other.enabled))
            == Ordering::Greater
    }
}

/// Map of toggles shared by the whole party.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SharedToggles {
    values: FxHashMap<ToggleKey, ToggleValue>,
}

impl SharedToggles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Published value of `key`, if any.
    pub fn get(&self, key: &ToggleKey) -> Option<bool> {
        self.values.get(key).map(|v| v.enabled)
    }

    /// Published value of `key`, or `default` when nothing was published.
    pub fn is_enabled(&self, key: &ToggleKey, default: bool) -> bool {
        self.get(key).unwrap_or(default)
    }

    /// Write `key`; ignored (`false`) if an equal or newer write exists.
    pub fn set(&mut self, key: ToggleKey, enabled: bool, stamp: Stamp) -> bool {
        let value = ToggleValue { enabled, stamp };
        self.apply(key, value)
    }

    pub fn merge(&mut self, other: &SharedToggles) {
        for (key, value) in &other.values {
            self.apply(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ToggleKey, &ToggleValue)> {
        self.values.iter()
    }

    pub fn max_stamp(&self) -> Option<&Stamp> {
        self.values.values().map(|v| &v.stamp).max()
    }

    fn apply(&mut self, key: ToggleKey, value: ToggleValue) -> bool {
        match self.values.get(&key) {
            Some(current) if !value.wins_over(current) => false,
            _ => {
                self.values.insert(key, value);
                true
            }
        }
    }
}
