//! Execute commands that peers sent to this account.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cb_core::{BehaviorState, Typology};
use cb_coord::Command;
use cb_behavior::{
    Candidate, CandidateInfo, Execution, ExecutionFault, ExecutionResult, ScoreDefinition, Step,
    StepContext, TickContext,
};

use crate::broadcast::UseRepeatedly;
use crate::scores::PARTY_COMMAND;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyCommandConfig {
    pub score: f32,
    pub allowed_states: Vec<BehaviorState>,
}

impl Default for PartyCommandConfig {
    fn default() -> Self {
        Self { score: PARTY_COMMAND, allowed_states: BehaviorState::ACTIVE.to_vec() }
    }
}

/// Eligible whenever the de-duplicated inbox holds a message.  Each
/// execution handles the oldest message only.
pub struct ObeyPartyCommands {
    info: CandidateInfo,
}

impl ObeyPartyCommands {
    pub const NAME: &'static str = "obey_party_commands";

    pub fn new(cfg: PartyCommandConfig) -> Self {
        let info = CandidateInfo::new(Self::NAME, Typology::Coordination, ScoreDefinition::Static(cfg.score))
            .states(&cfg.allowed_states);
        Self { info }
    }
}

impl Default for ObeyPartyCommands {
    fn default() -> Self {
        Self::new(PartyCommandConfig::default())
    }
}

impl Candidate for ObeyPartyCommands {
    fn info(&self) -> &CandidateInfo {
        &self.info
    }

    fn evaluate(&self, ctx: &TickContext<'_>, _attempted: &[&str]) -> Option<f32> {
        if ctx.coord.inbox_len() == 0 {
            return None;
        }
        self.info.score.value()
    }

    fn execute(&mut self, _ctx: &TickContext<'_>) -> Box<dyn Execution> {
        Box::new(ObeyNext { item: None })
    }
}

struct ObeyNext {
    item: Option<UseRepeatedly>,
}

impl Execution for ObeyNext {
    fn poll(&mut self, ctx: &mut StepContext<'_>) -> Result<Step, ExecutionFault> {
        if let Some(item) = self.item.as_mut() {
            return item.poll(ctx);
        }

        let Some(message) = ctx.coord.pop_inbox() else {
            return Ok(Step::Done(ExecutionResult::Skipped));
        };
        let Some(command) = message.decode() else {
            debug!(id = %message.id, "ignoring command with invalid parameters");
            return Ok(Step::Done(ExecutionResult::Skipped));
        };

        match command {
            Command::UseItem { .. } => {
                let item = self.item.insert(UseRepeatedly::new(command, false));
                item.poll(ctx)
            }
            Command::UseSkill { skill, target } => {
                if !ctx.env.has_skill(skill) {
                    debug!(%skill, "commanded skill not in build");
                    return Ok(Step::Done(ExecutionResult::Skipped));
                }
                match ctx.env.cast_skill(skill, target) {
                    Ok(()) => Ok(Step::Done(ExecutionResult::Performed)),
                    Err(e) => {
                        debug!(%skill, error = %e, "commanded cast refused");
                        Ok(Step::Done(ExecutionResult::Skipped))
                    }
                }
            }
        }
    }
}
