//! The `Environment` trait: the only window the engine has on the world.

use cb_core::{AccountId, AgentId, ItemModelId, Position, Role, SkillId};

use crate::{Signals, WorldResult};

/// A party member other than the controlled agent, as perceived this tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllyInfo {
    pub agent: AgentId,
    pub role: Role,
    pub position: Position,
    /// Current energy as a fraction of maximum, in `[0, 1]`.
    pub energy_ratio: f32,
    pub alive: bool,
}

/// Perception and command surface of one controlled agent.
///
/// Perception is infallible: unavailable data is `None`, an empty list, or
/// `false`.  Commands return [`WorldResult`] so that executions can turn a
/// refusal into a skipped action.
pub trait Environment {
    // ── Perception ────────────────────────────────────────────────────────

    /// Classifier inputs; `None` while the environment is not loaded.
    fn signals(&self) -> Option<Signals>;

    /// Stable account identity of the controlled agent.
    fn account(&self) -> Option<AccountId>;

    /// Transient in-session id of the controlled agent.
    fn self_agent(&self) -> Option<AgentId>;

    fn position(&self) -> Option<Position>;

    /// Current absolute energy.
    fn energy(&self) -> Option<f32>;

    fn is_party_leader(&self) -> bool;

    /// Living and dead allies, excluding the controlled agent.
    fn allies(&self) -> Vec<AllyInfo>;

    fn item_count(&self, model: ItemModelId) -> u32;

    /// `true` if `skill` is part of the agent's build.
    fn has_skill(&self, skill: SkillId) -> bool;

    /// `true` if `skill` is in the build and recharged.
    fn skill_ready(&self, skill: SkillId) -> bool;

    fn is_casting(&self) -> bool;

    // ── Commands ──────────────────────────────────────────────────────────

    fn move_to(&mut self, target: Position) -> WorldResult<()>;

    /// Cast `skill` on `target` (`None` = self / untargeted).
    fn cast_skill(&mut self, skill: SkillId, target: Option<AgentId>) -> WorldResult<()>;

    fn use_item(&mut self, model: ItemModelId) -> WorldResult<()>;
}
