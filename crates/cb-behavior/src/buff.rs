//! Per-role activation of a targeted buff.
//!
//! The local configuration is only a default: once any account publishes a
//! `ToggleKey::Buff` for `(candidate, role)`, that shared value wins on every
//! replica.

use serde::{Deserialize, Serialize};

use cb_core::Role;
use cb_coord::{SharedToggles, ToggleKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffConfiguration {
    activation: [bool; Role::COUNT],
}

impl BuffConfiguration {
    pub fn all() -> Self {
        Self { activation: [true; Role::COUNT] }
    }

    pub fn none() -> Self {
        Self { activation: [false; Role::COUNT] }
    }

    pub fn martial() -> Self {
        Self::from_predicate(Role::is_martial)
    }

    pub fn casters() -> Self {
        Self::from_predicate(Role::is_caster)
    }

    pub fn from_roles(roles: &[Role]) -> Self {
        let mut cfg = Self::none();
        for &r in roles {
            cfg.set(r, true);
        }
        cfg
    }

    fn from_predicate(pred: fn(Role) -> bool) -> Self {
        let mut cfg = Self::none();
        for r in Role::ALL {
            cfg.set(r, pred(r));
        }
        cfg
    }

    #[inline]
    pub fn is_active(&self, role: Role) -> bool {
        self.activation[role.index()]
    }

    pub fn set(&mut self, role: Role, active: bool) {
        self.activation[role.index()] = active;
    }

    pub fn active_roles(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|r| self.is_active(*r))
    }

    /// Activation after applying the shared toggle for `(candidate, role)`.
    pub fn effective(&self, candidate: &str, role: Role, toggles: &SharedToggles) -> bool {
        toggles.is_enabled(&ToggleKey::buff(candidate, role), self.is_active(role))
    }
}

impl Default for BuffConfiguration {
    fn default() -> Self {
        Self::all()
    }
}
