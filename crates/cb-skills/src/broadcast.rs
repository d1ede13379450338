//! Leader-initiated party-wide consumable use.
//!
//! The leader tells every other registered account to use the item, then
//! uses it locally `repeat` times, `delay_ms` apart.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cb_core::{BehaviorState, ItemModelId, Millis, Typology};
use cb_coord::Command;
use cb_world::WorldError;
use cb_behavior::{
    Candidate, CandidateInfo, Execution, ExecutionFault, ExecutionResult, ScoreDefinition, Step,
    StepContext, TickContext, default_pre_checks,
};

use crate::scores::BROADCAST;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BroadcastConfig {
    pub name: String,
    pub item: ItemModelId,
    pub repeat: u32,
    pub delay_ms: u64,
    pub score: f32,
    pub throttle_ms: u64,
    pub allowed_states: Vec<BehaviorState>,
}

impl BroadcastConfig {
    pub fn new(name: impl Into<String>, item: ItemModelId) -> Self {
        Self {
            name: name.into(),
            item,
            repeat: 1,
            delay_ms: 250,
            score: BROADCAST,
            throttle_ms: 60_000,
            allowed_states: BehaviorState::ACTIVE.to_vec(),
        }
    }
}

pub struct BroadcastConsumable {
    info: CandidateInfo,
    command: Command,
}

impl BroadcastConsumable {
    pub fn new(cfg: BroadcastConfig) -> Self {
        let info = CandidateInfo::new(cfg.name, Typology::Coordination, ScoreDefinition::Static(cfg.score))
            .states(&cfg.allowed_states)
            .throttle(cfg.throttle_ms);
        let command = Command::UseItem {
            model: cfg.item,
            repeat: cfg.repeat.max(1),
            delay_ms: cfg.delay_ms,
        };
        Self { info, command }
    }

    fn item(&self) -> Option<ItemModelId> {
        match self.command {
            Command::UseItem { model, .. } => Some(model),
            Command::UseSkill { .. } => None,
        }
    }
}

impl Candidate for BroadcastConsumable {
    fn info(&self) -> &CandidateInfo {
        &self.info
    }

    fn pre_checks_valid(&self, ctx: &TickContext<'_>) -> bool {
        default_pre_checks(&self.info, ctx)
            && ctx.env.is_party_leader()
            && self.item().is_some_and(|m| ctx.env.item_count(m) > 0)
    }

    fn evaluate(&self, _ctx: &TickContext<'_>, _attempted: &[&str]) -> Option<f32> {
        self.info.score.value()
    }

    fn execute(&mut self, _ctx: &TickContext<'_>) -> Box<dyn Execution> {
        Box::new(UseRepeatedly::new(self.command, true))
    }
}

// ── UseRepeatedly ─────────────────────────────────────────────────────────────

/// Use an item `repeat` times with a delay in between, optionally telling
/// every peer to do the same first.
pub(crate) struct UseRepeatedly {
    command: Command,
    broadcast: bool,
    used: u32,
    next_at: Option<Millis>,
}

impl UseRepeatedly {
    pub(crate) fn new(command: Command, broadcast: bool) -> Self {
        Self { command, broadcast, used: 0, next_at: None }
    }

    fn finish(&self) -> Step {
        if self.used > 0 {
            Step::Done(ExecutionResult::Performed)
        } else {
            Step::Done(ExecutionResult::Skipped)
        }
    }
}

impl Execution for UseRepeatedly {
    fn poll(&mut self, ctx: &mut StepContext<'_>) -> Result<Step, ExecutionFault> {
        let Command::UseItem { model, repeat, delay_ms } = self.command else {
            return Err(ExecutionFault::Invariant("item execution given a skill command".into()));
        };

        if self.broadcast {
            self.broadcast = false;
            let sent = ctx.coord.broadcast(self.command);
            debug!(%model, sent, "broadcast item use");
        }

        if self.next_at.is_some_and(|t| ctx.now < t) {
            return Ok(Step::Pending);
        }

        match ctx.env.use_item(model) {
            Ok(()) => self.used += 1,
            Err(WorldError::ItemMissing(_)) => return Ok(self.finish()),
            Err(e) => return Err(e.into()),
        }

        if self.used >= repeat {
            return Ok(self.finish());
        }
        self.next_at = Some(ctx.now.plus(delay_ms));
        Ok(Step::Pending)
    }
}
