//! Unit tests for cb-behavior.

use std::sync::Arc;

use cb_core::{AccountId, AgentId, ItemModelId, Position, SkillId};
use cb_coord::{CoordinationConfig, CoordinationContext, MemoryBus};
use cb_world::{AllyInfo, Environment, Signals, WorldError, WorldResult};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Minimal scripted environment.
#[derive(Default)]
struct FakeEnv {
    energy: Option<f32>,
    moves: Vec<Position>,
    refuse_moves: bool,
}

impl Environment for FakeEnv {
    fn signals(&self) -> Option<Signals> {
        Some(Signals::quiet())
    }
    fn account(&self) -> Option<AccountId> {
        AccountId::new("me").ok()
    }
    fn self_agent(&self) -> Option<AgentId> {
        Some(AgentId(0))
    }
    fn position(&self) -> Option<Position> {
        Some(Position::ORIGIN)
    }
    fn energy(&self) -> Option<f32> {
        self.energy
    }
    fn is_party_leader(&self) -> bool {
        false
    }
    fn allies(&self) -> Vec<AllyInfo> {
        Vec::new()
    }
    fn item_count(&self, _model: ItemModelId) -> u32 {
        0
    }
    fn has_skill(&self, _skill: SkillId) -> bool {
        false
    }
    fn skill_ready(&self, _skill: SkillId) -> bool {
        false
    }
    fn is_casting(&self) -> bool {
        false
    }
    fn move_to(&mut self, target: Position) -> WorldResult<()> {
        if self.refuse_moves {
            return Err(WorldError::NotLoaded);
        }
        self.moves.push(target);
        Ok(())
    }
    fn cast_skill(&mut self, skill: SkillId, _target: Option<AgentId>) -> WorldResult<()> {
        Err(WorldError::UnknownSkill(skill))
    }
    fn use_item(&mut self, model: ItemModelId) -> WorldResult<()> {
        Err(WorldError::ItemMissing(model))
    }
}

fn coord() -> CoordinationContext {
    let bus = MemoryBus::new();
    CoordinationContext::new(AccountId::new("me").unwrap(), Arc::new(bus), CoordinationConfig::default())
        .unwrap()
}

// ── Classifier ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod classifier {
    use cb_core::BehaviorState;
    use cb_world::Signals;

    use crate::{ClassifierConfig, classify};

    fn sig(explorable: bool, combat: bool, nearest: Option<f32>) -> Signals {
        Signals { in_explorable: explorable, in_combat: combat, nearest_hostile: nearest }
    }

    #[test]
    fn missing_signals_are_idle() {
        assert_eq!(classify(None, &ClassifierConfig::default()), BehaviorState::Idle);
    }

    #[test]
    fn town_is_idle_even_in_combat() {
        let s = sig(false, true, Some(10.0));
        assert_eq!(classify(Some(&s), &ClassifierConfig::default()), BehaviorState::Idle);
    }

    #[test]
    fn distance_bands() {
        let cfg = ClassifierConfig::default();
        assert_eq!(classify(Some(&sig(true, false, Some(1012.0))), &cfg), BehaviorState::InAggro);
        assert_eq!(classify(Some(&sig(true, false, Some(1013.0))), &cfg), BehaviorState::CloseToAggro);
        assert_eq!(classify(Some(&sig(true, false, Some(2500.0))), &cfg), BehaviorState::CloseToAggro);
        assert_eq!(classify(Some(&sig(true, false, Some(2501.0))), &cfg), BehaviorState::FarFromAggro);
        assert_eq!(classify(Some(&sig(true, false, None)), &cfg), BehaviorState::FarFromAggro);
    }

    #[test]
    fn combat_overrides_distance() {
        let cfg = ClassifierConfig::default();
        assert_eq!(classify(Some(&sig(true, true, None)), &cfg), BehaviorState::InAggro);
    }

    #[test]
    fn nan_distance_is_unknown() {
        let cfg = ClassifierConfig::default();
        assert_eq!(classify(Some(&sig(true, false, Some(f32::NAN))), &cfg), BehaviorState::FarFromAggro);
    }

    #[test]
    fn custom_ranges() {
        let cfg = ClassifierConfig { aggro_range: 100.0, close_range: 200.0 };
        assert_eq!(classify(Some(&sig(true, false, Some(150.0))), &cfg), BehaviorState::CloseToAggro);
    }
}

// ── Candidate info & pre-checks ───────────────────────────────────────────────

#[cfg(test)]
mod candidate {
    use cb_core::{BehaviorState, Millis, Tick, Typology};

    use super::{FakeEnv, coord};
    use crate::{CandidateInfo, ScoreDefinition, TickContext, default_pre_checks};

    fn info() -> CandidateInfo {
        CandidateInfo::new("finale", Typology::Buffing, ScoreDefinition::Static(33.0))
            .energy(10.0)
            .states(&[BehaviorState::InAggro, BehaviorState::CloseToAggro])
    }

    #[test]
    fn pre_checks_follow_state_and_energy() {
        let c = coord();
        let mut env = FakeEnv { energy: Some(12.0), ..Default::default() };
        let ok = |env: &FakeEnv, state| {
            let ctx = TickContext::new(Tick(1), Millis(0), state, env, &c);
            default_pre_checks(&info(), &ctx)
        };
        assert!(ok(&env, BehaviorState::InAggro));
        assert!(!ok(&env, BehaviorState::FarFromAggro));
        assert!(!ok(&env, BehaviorState::Idle));
        env.energy = Some(9.0);
        assert!(!ok(&env, BehaviorState::InAggro));
        env.energy = None;
        assert!(!ok(&env, BehaviorState::InAggro));
    }

    #[test]
    fn unknown_energy_ok_when_free() {
        let c = coord();
        let env = FakeEnv::default();
        let free = CandidateInfo::new("free", Typology::Utility, ScoreDefinition::Static(1.0));
        let ctx = TickContext::new(Tick(1), Millis(0), BehaviorState::FarFromAggro, &env, &c);
        assert!(default_pre_checks(&free, &ctx));
    }

    #[test]
    fn validate_rejects_bad_info() {
        assert!(info().validate().is_ok());
        assert!(info().energy(-1.0).validate().is_err());
        assert!(info().states(&[]).validate().is_err());
        assert!(info().states(&[BehaviorState::Idle]).validate().is_err());
        let blank = CandidateInfo::new(" ", Typology::Utility, ScoreDefinition::Static(1.0));
        assert!(blank.validate().is_err());
    }
}

// ── Scores ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod score {
    use crate::{ScoreDefinition, sanitize};

    #[test]
    fn descriptors() {
        assert_eq!(ScoreDefinition::Static(33.0).describe(), "33");
        assert_eq!(ScoreDefinition::Dynamic { max: 95.0 }.describe(), "up to 95");
        assert_eq!(ScoreDefinition::Dynamic { max: 95.0 }.max(), 95.0);
        assert_eq!(ScoreDefinition::Dynamic { max: 95.0 }.value(), None);
    }

    #[test]
    fn nan_is_ineligible() {
        assert_eq!(sanitize(Some(f32::NAN)), None);
        assert_eq!(sanitize(Some(0.0)), Some(0.0));
        assert_eq!(sanitize(None), None);
    }
}

// ── Buff configuration ────────────────────────────────────────────────────────

#[cfg(test)]
mod buff {
    use cb_core::{AccountId, Millis, Role};
    use cb_coord::{SharedToggles, Stamp, ToggleKey};

    use crate::BuffConfiguration;

    #[test]
    fn presets() {
        assert_eq!(BuffConfiguration::all().active_roles().count(), Role::COUNT);
        assert_eq!(BuffConfiguration::none().active_roles().count(), 0);
        assert!(BuffConfiguration::martial().is_active(Role::Warrior));
        assert!(!BuffConfiguration::martial().is_active(Role::Monk));
        assert!(BuffConfiguration::casters().is_active(Role::Elementalist));
        let custom = BuffConfiguration::from_roles(&[Role::Ranger, Role::Dervish]);
        assert_eq!(custom.active_roles().collect::<Vec<_>>(), vec![Role::Ranger, Role::Dervish]);
    }

    #[test]
    fn shared_toggle_overrides_local_default() {
        let cfg = BuffConfiguration::martial();
        let mut toggles = SharedToggles::new();
        assert!(cfg.effective("finale", Role::Warrior, &toggles));
        assert!(!cfg.effective("finale", Role::Monk, &toggles));

        let stamp = Stamp::new(Millis(1), AccountId::new("lead").unwrap());
        toggles.set(ToggleKey::buff("finale", Role::Warrior), false, stamp.clone());
        toggles.set(ToggleKey::buff("finale", Role::Monk), true, stamp);
        assert!(!cfg.effective("finale", Role::Warrior, &toggles));
        assert!(cfg.effective("finale", Role::Monk, &toggles));
        // Other candidates are unaffected.
        assert!(cfg.effective("other", Role::Warrior, &toggles));
    }
}

// ── Execution helpers ─────────────────────────────────────────────────────────

#[cfg(test)]
mod execution {
    use cb_core::{BehaviorState, Millis, Position, Tick};

    use super::{FakeEnv, coord};
    use crate::{Execution, ExecutionResult, Finished, Step, StepContext, Then, WaitFor};

    fn poll(exec: &mut dyn Execution, env: &mut FakeEnv, now: u64) -> Step {
        let mut c = coord();
        let mut ctx = StepContext::new(Tick(0), Millis(now), BehaviorState::InAggro, env, &mut c);
        exec.poll(&mut ctx).unwrap()
    }

    #[test]
    fn finished_is_immediate() {
        let mut env = FakeEnv::default();
        let step = poll(&mut Finished(ExecutionResult::Performed), &mut env, 0);
        assert_eq!(step, Step::Done(ExecutionResult::Performed));
    }

    #[test]
    fn wait_for_counts_from_first_poll() {
        let mut env = FakeEnv::default();
        let mut w = WaitFor::new(1_000, ExecutionResult::Performed);
        assert_eq!(poll(&mut w, &mut env, 500), Step::Pending);
        assert_eq!(poll(&mut w, &mut env, 1_499), Step::Pending);
        assert_eq!(poll(&mut w, &mut env, 1_500), Step::Done(ExecutionResult::Performed));
    }

    #[test]
    fn then_runs_command_once() {
        let mut env = FakeEnv::default();
        let target = Position::new(5.0, 5.0);
        let mut t = Then::new(move |ctx: &mut StepContext<'_>| ctx.env.move_to(target), 200);
        assert_eq!(poll(&mut t, &mut env, 0), Step::Pending);
        assert_eq!(poll(&mut t, &mut env, 100), Step::Pending);
        assert_eq!(poll(&mut t, &mut env, 200), Step::Done(ExecutionResult::Performed));
        assert_eq!(env.moves, vec![target]);
    }

    #[test]
    fn then_refused_is_skipped() {
        let mut env = FakeEnv { refuse_moves: true, ..Default::default() };
        let mut t = Then::new(|ctx: &mut StepContext<'_>| ctx.env.move_to(Position::new(1.0, 1.0)), 200);
        assert_eq!(poll(&mut t, &mut env, 0), Step::Done(ExecutionResult::Skipped));
    }
}

// ── Noop ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod noop {
    use cb_core::{BehaviorState, Millis, Tick};

    use super::{FakeEnv, coord};
    use crate::{Candidate, NoopCandidate, TickContext};

    #[test]
    fn never_scores() {
        let c = coord();
        let env = FakeEnv::default();
        let ctx = TickContext::new(Tick(0), Millis(0), BehaviorState::InAggro, &env, &c);
        let n = NoopCandidate::new("placeholder");
        assert!(n.pre_checks_valid(&ctx));
        assert_eq!(n.evaluate(&ctx, &[]), None);
        assert!(n.buff_configuration().is_none());
    }
}
