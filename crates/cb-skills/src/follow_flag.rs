//! Move to the flag the party leader assigned to this account.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cb_core::{BehaviorState, Position, Typology};
use cb_coord::{FlagGate, Tier};
use cb_behavior::{
    BehaviorError, BehaviorResult, Candidate, CandidateInfo, Execution, ExecutionFault, ExecutionResult,
    ScoreDefinition, Step, StepContext, TickContext, WaitFor, default_pre_checks,
};

use crate::scores::{FOLLOW_FLAG, FOLLOW_FLAG_REQUIRED};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowFlagConfig {
    #[serde(flatten)]
    pub gate: FlagGate,
    pub throttle_ms: u64,
    /// Time spent waiting after the move order before the next decision.
    pub arrival_wait_ms: u64,
    pub allowed_states: Vec<BehaviorState>,
}

impl FollowFlagConfig {
    pub fn validate(&self) -> BehaviorResult<()> {
        if !self.gate.is_valid() {
            return Err(BehaviorError::Config(format!(
                "{}: thresholds must be non-negative numbers with near ({}) <= movement ({})",
                FollowFlag::NAME,
                self.gate.near_threshold,
                self.gate.movement_threshold
            )));
        }
        Ok(())
    }
}

impl Default for FollowFlagConfig {
    fn default() -> Self {
        Self {
            gate: FlagGate::default(),
            throttle_ms: 1_000,
            arrival_wait_ms: 1_000,
            allowed_states: BehaviorState::ACTIVE.to_vec(),
        }
    }
}

/// Followers walk to their assigned flag; the leader never does.
pub struct FollowFlag {
    info: CandidateInfo,
    gate: FlagGate,
    arrival_wait_ms: u64,
}

impl FollowFlag {
    pub const NAME: &'static str = "follow_flag";

    /// Build from `cfg`, rejecting unusable distance thresholds.
    pub fn new(cfg: FollowFlagConfig) -> BehaviorResult<Self> {
        cfg.validate()?;
        Ok(Self::from_config(cfg))
    }

    fn from_config(cfg: FollowFlagConfig) -> Self {
        let info = CandidateInfo::new(
            Self::NAME,
            Typology::Following,
            ScoreDefinition::Dynamic { max: FOLLOW_FLAG_REQUIRED },
        )
        .states(&cfg.allowed_states)
        .throttle(cfg.throttle_ms);
        Self { info, gate: cfg.gate, arrival_wait_ms: cfg.arrival_wait_ms }
    }

    fn assigned_flag(ctx: &TickContext<'_>) -> Option<Position> {
        let account = ctx.env.account()?;
        ctx.coord.flags().assigned_position(&account)
    }
}

impl Default for FollowFlag {
    fn default() -> Self {
        Self::from_config(FollowFlagConfig::default())
    }
}

impl Candidate for FollowFlag {
    fn info(&self) -> &CandidateInfo {
        &self.info
    }

    fn pre_checks_valid(&self, ctx: &TickContext<'_>) -> bool {
        default_pre_checks(&self.info, ctx) && !ctx.env.is_party_leader()
    }

    fn evaluate(&self, ctx: &TickContext<'_>, _attempted: &[&str]) -> Option<f32> {
        let flag = Self::assigned_flag(ctx)?;
        let me = ctx.env.position()?;
        match self.gate.tier(me.distance(flag)) {
            Tier::Urgent => Some(FOLLOW_FLAG_REQUIRED),
            Tier::Normal => Some(FOLLOW_FLAG),
            Tier::Hold => None,
        }
    }

    fn execute(&mut self, _ctx: &TickContext<'_>) -> Box<dyn Execution> {
        Box::new(MoveToFlag { wait: None, arrival_wait_ms: self.arrival_wait_ms })
    }
}

/// Re-reads the flag when it starts, so a flag released between scoring and
/// execution is not followed.
struct MoveToFlag {
    wait: Option<WaitFor>,
    arrival_wait_ms: u64,
}

impl Execution for MoveToFlag {
    fn poll(&mut self, ctx: &mut StepContext<'_>) -> Result<Step, ExecutionFault> {
        if self.wait.is_none() {
            let flag = ctx
                .env
                .account()
                .and_then(|a| ctx.coord.flags().assigned_position(&a));
            let Some(flag) = flag else {
                return Ok(Step::Done(ExecutionResult::Skipped));
            };
            if let Err(e) = ctx.env.move_to(flag) {
                debug!(error = %e, "move to flag refused");
                return Ok(Step::Done(ExecutionResult::Skipped));
            }
            self.wait = Some(WaitFor::new(self.arrival_wait_ms, ExecutionResult::Performed));
        }
        match self.wait.as_mut() {
            Some(w) => w.poll(ctx),
            None => Err(ExecutionFault::Invariant("flag wait not started".into())),
        }
    }
}
