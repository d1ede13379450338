//! World/command error type.

use thiserror::Error;

use cb_core::{AgentId, ItemModelId, SkillId};

/// Errors produced when an environment command cannot be carried out.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("environment not loaded")]
    NotLoaded,

    #[error("unknown target {0}")]
    UnknownTarget(AgentId),

    #[error("target {0} out of range")]
    OutOfRange(AgentId),

    #[error("skill {0} not in build")]
    UnknownSkill(SkillId),

    #[error("skill {0} is recharging")]
    OnCooldown(SkillId),

    #[error("not enough energy: need {needed}, have {available}")]
    NotEnoughEnergy { needed: f32, available: f32 },

    #[error("no {0} left in inventory")]
    ItemMissing(ItemModelId),

    #[error("agent is busy casting")]
    Busy,
}

pub type WorldResult<T> = Result<T, WorldError>;
