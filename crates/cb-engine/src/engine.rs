//! The `DecisionLoop` struct and its tick.

use std::fmt;

use tracing::debug;

use cb_behavior::{
    BuffConfiguration, ClassifierConfig, ExecutionResult, Step, StepContext, TickContext, classify,
};
use cb_core::{AccountId, BehaviorState, CandidateId, Millis, Role, Tick, TickClock, Typology};
use cb_coord::{BusEvent, CoordinationContext, EventBus, ToggleKey};
use cb_world::Environment;

use crate::executor::{Active, contain};
use crate::scoring::{LocalGates, score_all, switched_on};
use crate::{
    EngineError, EngineResult, LoopObserver, NoopObserver, Registry, ScoreEntry, TickReport, select,
};

// ── Phase / outcome ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum LoopPhase {
    /// Nothing in flight and the last evaluation found no eligible
    /// candidate, or only a throttled one.  Also the phase before the first
    /// tick.
    #[default]
    Idle,
    Evaluating,
    Executing,
}

impl LoopPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            LoopPhase::Idle => "idle",
            LoopPhase::Evaluating => "evaluating",
            LoopPhase::Executing => "executing",
        }
    }
}

/// What one call to [`DecisionLoop::tick`] did.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    /// Nothing was eligible.
    Idle,
    /// The winner's throttle had not expired; nothing else was tried.
    Throttled(CandidateId),
    /// An execution stepped and is still pending.
    InProgress(CandidateId),
    Completed(CandidateId, ExecutionResult),
    /// The in-flight candidate was disabled; its execution was dropped.
    Cancelled(CandidateId),
}

impl TickOutcome {
    pub fn candidate(self) -> Option<CandidateId> {
        match self {
            TickOutcome::Idle => None,
            TickOutcome::Throttled(id)
            | TickOutcome::InProgress(id)
            | TickOutcome::Completed(id, _)
            | TickOutcome::Cancelled(id) => Some(id),
        }
    }

    pub fn result(self) -> Option<ExecutionResult> {
        match self {
            TickOutcome::Completed(_, r) => Some(r),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TickOutcome::Idle => "idle",
            TickOutcome::Throttled(_) => "throttled",
            TickOutcome::InProgress(_) => "in_progress",
            TickOutcome::Completed(..) => "completed",
            TickOutcome::Cancelled(_) => "cancelled",
        }
    }
}

impl fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickOutcome::Idle => f.write_str("idle"),
            TickOutcome::Completed(id, r) => write!(f, "completed {id} ({})", r.as_str()),
            other => write!(f, "{} {}", other.as_str(), other.candidate().unwrap_or_default()),
        }
    }
}

/// Read-only view of one registered candidate for inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateView<'a> {
    pub id: CandidateId,
    pub name: &'a str,
    pub typology: Typology,
    pub enabled: bool,
    pub last_score: Option<f32>,
    pub required_energy: f32,
    pub allowed_states: &'a [BehaviorState],
    /// e.g. `"33"` or `"up to 95"`.
    pub score: String,
    pub throttle_ms: u64,
}

// ── DecisionLoop ──────────────────────────────────────────────────────────────

/// One agent's decision loop.
///
/// Each [`tick`](Self::tick):
///
/// 1. delivers queued local events (toggles, throttle resets);
/// 2. syncs the coordination context;
/// 3. steps the in-flight execution if there is one, cancelling it if its
///    candidate was disabled and it is still pending;
/// 4. otherwise classifies, scores every candidate, selects a winner, checks
///    its throttle and starts it, polling the first step immediately.
///
/// At most one execution is in flight.  `tick` never fails.
///
/// Create via [`DecisionLoopBuilder`][crate::DecisionLoopBuilder].
pub struct DecisionLoop {
    account: AccountId,
    registry: Registry,
    coord: CoordinationContext,
    events: EventBus,
    gates: LocalGates,
    classifier: ClassifierConfig,
    phase: LoopPhase,
    state: BehaviorState,
    active: Option<Active>,
    /// Candidates skipped since the last performed execution.
    attempted: Vec<String>,
    last_scores: Vec<ScoreEntry>,
    tick: Tick,
}

impl DecisionLoop {
    pub(crate) fn from_parts(
        registry:   Registry,
        coord:      CoordinationContext,
        classifier: ClassifierConfig,
    ) -> Self {
        Self {
            account: coord.account().clone(),
            registry,
            coord,
            events: EventBus::new(),
            gates: LocalGates::default(),
            classifier,
            phase: LoopPhase::Idle,
            state: BehaviorState::Idle,
            active: None,
            attempted: Vec::new(),
            last_scores: Vec::new(),
            tick: Tick::ZERO,
        }
    }

    // ── Ticking ───────────────────────────────────────────────────────────

    pub fn tick(&mut self, env: &mut dyn Environment, now: Millis) -> TickOutcome {
        self.tick_observed(env, now, &mut NoopObserver)
    }

    /// Like [`tick`](Self::tick), reporting the result to `observer`.
    pub fn tick_observed<O: LoopObserver + ?Sized>(
        &mut self,
        env:      &mut dyn Environment,
        now:      Millis,
        observer: &mut O,
    ) -> TickOutcome {
        let tick = self.tick;
        self.tick = self.tick + 1;

        self.apply_events(now);
        self.coord.sync(now);
        self.state = classify(env.signals().as_ref(), &self.classifier);

        let (outcome, evaluated) = if self.active.is_some() {
            (self.step_active(env, tick, now), false)
        } else {
            (self.evaluate_and_start(env, tick, now), true)
        };

        let candidate = outcome
            .candidate()
            .and_then(|id| self.registry.get(id))
            .map(|slot| slot.name());
        observer.on_tick(&TickReport {
            account: &self.account,
            tick,
            now,
            state: self.state,
            scores: if evaluated { &self.last_scores } else { &[] },
            outcome,
            candidate,
        });
        outcome
    }

    /// Run `n` ticks against one environment, taking time from `clock`.
    pub fn run_ticks<O: LoopObserver + ?Sized>(
        &mut self,
        n:        u64,
        env:      &mut dyn Environment,
        clock:    &mut TickClock,
        observer: &mut O,
    ) -> Vec<TickOutcome> {
        let mut outcomes = Vec::with_capacity(n as usize);
        for _ in 0..n {
            outcomes.push(self.tick_observed(env, clock.now(), observer));
            clock.advance();
        }
        observer.on_run_end(self.tick);
        outcomes
    }

    fn evaluate_and_start(&mut self, env: &mut dyn Environment, tick: Tick, now: Millis) -> TickOutcome {
        self.phase = LoopPhase::Evaluating;

        let execution = {
            let attempted: Vec<&str> = self.attempted.iter().map(String::as_str).collect();
            let ctx = TickContext::new(tick, now, self.state, &*env, &self.coord);
            let entries = score_all(&self.registry, &self.gates, &ctx, &attempted);
            for e in &entries {
                if let Some(slot) = self.registry.get_mut(e.candidate) {
                    slot.last_score = e.score;
                }
            }
            let winner = select(&entries).map(|e| (e.candidate, e.score));
            self.last_scores = entries;

            let Some((id, score)) = winner else {
                debug!(account = %self.account, state = %self.state, "no eligible candidate");
                self.phase = LoopPhase::Idle;
                return TickOutcome::Idle;
            };
            let Some(slot) = self.registry.get_mut(id) else {
                self.phase = LoopPhase::Idle;
                return TickOutcome::Idle;
            };
            if !slot.throttle.is_ready(now) {
                debug!(
                    account = %self.account,
                    candidate = slot.name(),
                    remaining_ms = slot.throttle.remaining_ms(now),
                    "throttled"
                );
                self.phase = LoopPhase::Idle;
                return TickOutcome::Throttled(id);
            }
            debug!(account = %self.account, candidate = slot.name(), score, state = %self.state, "selected");
            let candidate = &mut slot.candidate;
            (id, contain(id, "execute", || candidate.execute(&ctx)))
        };

        let (id, execution) = execution;
        let Some(execution) = execution else {
            self.finish(id, ExecutionResult::Skipped, now);
            self.phase = LoopPhase::Evaluating;
            return TickOutcome::Completed(id, ExecutionResult::Skipped);
        };
        self.phase = LoopPhase::Executing;
        self.active = Some(Active::new(id, execution, now));
        self.step_active(env, tick, now)
    }

    fn step_active(&mut self, env: &mut dyn Environment, tick: Tick, now: Millis) -> TickOutcome {
        let Some(mut active) = self.active.take() else {
            self.phase = LoopPhase::Evaluating;
            return TickOutcome::Idle;
        };
        let id = active.candidate;

        let step = {
            let mut ctx = StepContext::new(tick, now, self.state, env, &mut self.coord);
            active.step(&mut ctx)
        };

        match step {
            Step::Done(result) => {
                self.finish(id, result, now);
                self.phase = LoopPhase::Evaluating;
                TickOutcome::Completed(id, result)
            }
            Step::Pending if !self.is_switched_on(id) => {
                debug!(account = %self.account, candidate = %id, polls = active.polls, "cancelled");
                self.phase = LoopPhase::Evaluating;
                TickOutcome::Cancelled(id)
            }
            Step::Pending => {
                self.active = Some(active);
                TickOutcome::InProgress(id)
            }
        }
    }

    fn finish(&mut self, id: CandidateId, result: ExecutionResult, now: Millis) {
        let Some(slot) = self.registry.get_mut(id) else {
            return;
        };
        debug!(account = %self.account, candidate = slot.name(), result = result.as_str(), "finished");
        match result {
            ExecutionResult::Performed => {
                slot.throttle.record_performed(now);
                self.attempted.clear();
            }
            ExecutionResult::Skipped => {
                let name = slot.name();
                if !self.attempted.iter().any(|a| a == name) {
                    self.attempted.push(name.to_owned());
                }
            }
        }
    }

    fn is_switched_on(&self, id: CandidateId) -> bool {
        self.registry
            .get(id)
            .is_some_and(|slot| switched_on(slot, &self.gates, &self.coord))
    }

    fn apply_events(&mut self, now: Millis) {
        for event in self.events.drain() {
            match event {
                BusEvent::EngineToggled { enabled } => {
                    self.coord.set_toggle(ToggleKey::Engine, enabled, now);
                }
                BusEvent::TypologyToggled { typology, enabled } => {
                    self.gates.set_typology(typology, enabled);
                }
                BusEvent::CandidateToggled { name, enabled } => {
                    match self.registry.id_of(&name).and_then(|id| self.registry.get_mut(id)) {
                        Some(slot) => slot.enabled = enabled,
                        None => debug!(account = %self.account, candidate = %name, "toggle for unknown candidate"),
                    }
                }
                BusEvent::ThrottlesReset => {
                    for slot in self.registry.slots_mut() {
                        slot.throttle.reset();
                    }
                }
            }
        }
    }

    // ── Inspection ────────────────────────────────────────────────────────

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> Tick {
        self.tick
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// State classified on the last tick.
    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn active_candidate(&self) -> Option<CandidateId> {
        self.active.as_ref().map(|a| a.candidate)
    }

    pub fn attempted(&self) -> &[String] {
        &self.attempted
    }

    /// Entries from the last tick that ran scoring.
    pub fn last_scores(&self) -> &[ScoreEntry] {
        &self.last_scores
    }

    pub fn candidate_id(&self, name: &str) -> Option<CandidateId> {
        self.registry.id_of(name)
    }

    pub fn candidates(&self) -> Vec<CandidateView<'_>> {
        self.registry
            .iter()
            .map(|(id, slot)| {
                let info = slot.candidate.info();
                CandidateView {
                    id,
                    name: &info.name,
                    typology: info.typology,
                    enabled: slot.enabled,
                    last_score: slot.last_score,
                    required_energy: info.required_energy,
                    allowed_states: &info.allowed_states,
                    score: info.score.describe(),
                    throttle_ms: slot.throttle.min_interval_ms,
                }
            })
            .collect()
    }

    pub fn is_enabled(&self, id: CandidateId) -> Option<bool> {
        self.registry.get(id).map(|s| s.enabled)
    }

    /// Local enabled flag.  Takes effect from the next scoring pass; an
    /// in-flight execution is dropped after its current step.
    pub fn set_enabled(&mut self, id: CandidateId, enabled: bool) -> EngineResult<()> {
        let slot = self.registry.get_mut(id).ok_or(EngineError::UnknownCandidate(id))?;
        slot.enabled = enabled;
        Ok(())
    }

    pub fn buff_configuration(&self, id: CandidateId) -> Option<&BuffConfiguration> {
        self.registry.get(id)?.candidate.buff_configuration()
    }

    /// Effective activation: the shared toggle if published, else the
    /// candidate's local configuration.
    pub fn buff_activation(&self, id: CandidateId, role: Role) -> Option<bool> {
        let slot = self.registry.get(id)?;
        let buffs = slot.candidate.buff_configuration()?;
        Some(buffs.effective(slot.name(), role, self.coord.toggles()))
    }

    /// Update the local configuration and publish the shared toggle.
    pub fn set_buff_activation(
        &mut self,
        id:     CandidateId,
        role:   Role,
        active: bool,
        now:    Millis,
    ) -> EngineResult<()> {
        let slot = self.registry.get_mut(id).ok_or(EngineError::UnknownCandidate(id))?;
        let name = slot.name().to_owned();
        let buffs = slot
            .candidate
            .buff_configuration_mut()
            .ok_or_else(|| EngineError::Config(format!("{name} has no buff configuration")))?;
        buffs.set(role, active);
        self.coord.set_toggle(ToggleKey::buff(name, role), active, now);
        Ok(())
    }

    /// Queue for local toggle events; drained at the start of every tick.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn coord(&self) -> &CoordinationContext {
        &self.coord
    }

    pub fn coord_mut(&mut self) -> &mut CoordinationContext {
        &mut self.coord
    }

    pub fn classifier(&self) -> &ClassifierConfig {
        &self.classifier
    }
}
