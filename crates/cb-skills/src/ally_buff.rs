//! Cast a buff on the ally that needs it most.
//!
//! Eligible targets are living allies in range whose role is activated in
//! the effective buff configuration (shared toggle if published, local
//! default otherwise).  Lowest energy wins, then the closest.

use serde::{Deserialize, Serialize};

use cb_core::{AgentId, BehaviorState, Range, Role, SkillId, Typology};
use cb_behavior::{
    BuffConfiguration, Candidate, CandidateInfo, Execution, Finished, ScoreDefinition, StepContext,
    Then, TickContext, default_pre_checks,
};

use crate::scores::ALLY_BUFF;
use crate::targeting::{TargetingOrder, first_ally};

const ORDER: [TargetingOrder; 2] = [TargetingOrder::EnergyAsc, TargetingOrder::DistanceAsc];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllyBuffConfig {
    pub name: String,
    pub skill: SkillId,
    pub score: f32,
    pub required_energy: f32,
    pub range: f32,
    /// How long to wait after the cast order before deciding again.
    pub aftercast_ms: u64,
    pub allowed_states: Vec<BehaviorState>,
    pub buffs: BuffConfiguration,
}

impl AllyBuffConfig {
    pub fn new(name: impl Into<String>, skill: SkillId, buffs: BuffConfiguration) -> Self {
        Self {
            name: name.into(),
            skill,
            score: ALLY_BUFF,
            required_energy: 10.0,
            range: Range::Spellcast.units(),
            aftercast_ms: 250,
            allowed_states: vec![BehaviorState::InAggro, BehaviorState::CloseToAggro],
            buffs,
        }
    }

    /// Paragon chant buffing martial allies.
    pub fn blazing_finale(skill: SkillId) -> Self {
        Self::new(
            "Blazing Finale",
            skill,
            BuffConfiguration::from_roles(&[Role::Ranger, Role::Warrior, Role::Assassin, Role::Dervish]),
        )
    }
}

pub struct AllyBuff {
    info: CandidateInfo,
    skill: SkillId,
    range: f32,
    aftercast_ms: u64,
    buffs: BuffConfiguration,
}

impl AllyBuff {
    pub fn new(cfg: AllyBuffConfig) -> Self {
        let info = CandidateInfo::new(cfg.name, Typology::Buffing, ScoreDefinition::Static(cfg.score))
            .energy(cfg.required_energy)
            .states(&cfg.allowed_states);
        Self {
            info,
            skill: cfg.skill,
            range: cfg.range,
            aftercast_ms: cfg.aftercast_ms,
            buffs: cfg.buffs,
        }
    }

    fn target(&self, ctx: &TickContext<'_>) -> Option<AgentId> {
        let toggles = ctx.coord.toggles();
        first_ally(
            ctx.env,
            self.range,
            |ally| self.buffs.effective(&self.info.name, ally.role, toggles),
            &ORDER,
        )
        .map(|a| a.agent)
    }
}

impl Candidate for AllyBuff {
    fn info(&self) -> &CandidateInfo {
        &self.info
    }

    fn pre_checks_valid(&self, ctx: &TickContext<'_>) -> bool {
        default_pre_checks(&self.info, ctx) && ctx.env.skill_ready(self.skill) && !ctx.env.is_casting()
    }

    fn evaluate(&self, ctx: &TickContext<'_>, _attempted: &[&str]) -> Option<f32> {
        self.target(ctx)?;
        self.info.score.value()
    }

    fn execute(&mut self, ctx: &TickContext<'_>) -> Box<dyn Execution> {
        let Some(target) = self.target(ctx) else {
            return Finished::skipped();
        };
        let skill = self.skill;
        Box::new(Then::new(
            move |step: &mut StepContext<'_>| step.env.cast_skill(skill, Some(target)),
            self.aftercast_ms,
        ))
    }

    fn buff_configuration(&self) -> Option<&BuffConfiguration> {
        Some(&self.buffs)
    }

    fn buff_configuration_mut(&mut self) -> Option<&mut BuffConfiguration> {
        Some(&mut self.buffs)
    }
}
