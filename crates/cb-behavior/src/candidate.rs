//! The `Candidate` trait: the main extension point for user code.

use cb_core::{BehaviorState, Typology};

use crate::{BehaviorError, BehaviorResult, BuffConfiguration, Execution, ScoreDefinition, TickContext};

/// Static description of a candidate action.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateInfo {
    /// Stable name; also the key of the candidate's shared toggle.
    pub name: String,
    pub typology: Typology,
    /// Energy that must be available before the candidate is considered.
    pub required_energy: f32,
    pub allowed_states: Vec<BehaviorState>,
    pub score: ScoreDefinition,
    /// Minimum time between two performed executions.
    pub throttle_ms: u64,
}

impl CandidateInfo {
    /// A candidate allowed in every active state, with no energy cost and no
    /// throttle.
    pub fn new(name: impl Into<String>, typology: Typology, score: ScoreDefinition) -> Self {
        Self {
            name: name.into(),
            typology,
            required_energy: 0.0,
            allowed_states: BehaviorState::ACTIVE.to_vec(),
            score,
            throttle_ms: 0,
        }
    }

    pub fn energy(mut self, required: f32) -> Self {
        self.required_energy = required;
        self
    }

    pub fn states(mut self, states: &[BehaviorState]) -> Self {
        self.allowed_states = states.to_vec();
        self
    }

    pub fn throttle(mut self, ms: u64) -> Self {
        self.throttle_ms = ms;
        self
    }

    #[inline]
    pub fn allows(&self, state: BehaviorState) -> bool {
        self.allowed_states.contains(&state)
    }

    pub fn validate(&self) -> BehaviorResult<()> {
        if self.name.trim().is_empty() {
            return Err(BehaviorError::Config("candidate name is empty".into()));
        }
        if !self.required_energy.is_finite() || self.required_energy < 0.0 {
            return Err(BehaviorError::Config(format!(
                "{}: required energy must be a non-negative number",
                self.name
            )));
        }
        if self.allowed_states.is_empty() {
            return Err(BehaviorError::Config(format!("{}: no allowed states", self.name)));
        }
        if self.allowed_states.contains(&BehaviorState::Idle) {
            return Err(BehaviorError::Config(format!("{}: Idle cannot be an allowed state", self.name)));
        }
        Ok(())
    }
}

/// Checks every candidate shares: not idle, allowed in this state, and
/// enough energy.  Unknown energy only fails candidates that need some.
pub fn default_pre_checks(info: &CandidateInfo, ctx: &TickContext<'_>) -> bool {
    if ctx.state.is_idle() || !info.allows(ctx.state) {
        return false;
    }
    if info.required_energy <= 0.0 {
        return true;
    }
    ctx.env.energy().is_some_and(|e| e >= info.required_energy)
}

/// A pluggable candidate action.
///
/// # Required methods
///
/// [`info`][Self::info], [`evaluate`][Self::evaluate] and
/// [`execute`][Self::execute].  Pre-checks default to
/// [`default_pre_checks`]; buff configuration defaults to none.
///
/// `evaluate` is only called when `pre_checks_valid` returned `true`.
/// `attempted` names the candidates whose executions were skipped since this
/// agent last performed anything.
pub trait Candidate: Send {
    fn info(&self) -> &CandidateInfo;

    fn pre_checks_valid(&self, ctx: &TickContext<'_>) -> bool {
        default_pre_checks(self.info(), ctx)
    }

    fn evaluate(&self, ctx: &TickContext<'_>, attempted: &[&str]) -> Option<f32>;

    /// Start an execution.  Called at most once per selection.
    fn execute(&mut self, ctx: &TickContext<'_>) -> Box<dyn Execution>;

    fn buff_configuration(&self) -> Option<&BuffConfiguration> {
        None
    }

    fn buff_configuration_mut(&mut self) -> Option<&mut BuffConfiguration> {
        None
    }
}
