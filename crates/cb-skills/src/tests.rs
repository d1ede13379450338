//! Unit tests for cb-skills.
//!
//! Every test runs candidates against a small `SimWorld` party whose members
//! share one `MemoryBus`.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use cb_behavior::{
        Candidate, ClassifierConfig, ExecutionResult, Step, StepContext, TickContext, classify,
    };
    use cb_core::{AccountId, ItemModelId, Position, Role, SkillId, Tick};
    use cb_coord::{CoordinationConfig, CoordinationContext, MemoryBus};
    use cb_world::{Environment, MemberSpec, SimSkill, SimWorld, SimWorldBuilder};

    pub const FINALE: SkillId = SkillId(1);
    pub const SIGNET: SkillId = SkillId(5);
    pub const POT: ItemModelId = ItemModelId(900);

    pub const LEAD: usize = 0;
    pub const WAR: usize = 1;
    pub const MONK: usize = 2;

    pub fn account(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    /// Leader paragon, a warrior 500 units east and a monk 2000 units east.
    /// One hostile 800 units north of the leader keeps the first two in
    /// aggro and the monk close to it.
    pub fn party() -> SimWorld {
        let mut b = SimWorldBuilder::new(5);
        b.member(
            MemberSpec::new(account("lead"), Role::Paragon, Position::new(1.0, 1.0))
                .leader()
                .with_skill(SimSkill::new(FINALE, 10.0, 250, 1_000))
                .with_item(POT, 3),
        );
        b.member(
            MemberSpec::new(account("war"), Role::Warrior, Position::new(501.0, 1.0))
                .with_skill(SimSkill::new(SIGNET, 5.0, 0, 0))
                .with_item(POT, 2),
        );
        b.member(MemberSpec::new(account("monk"), Role::Monk, Position::new(2001.0, 1.0)));
        b.hostile(Position::new(1.0, 801.0));
        b.build()
    }

    /// One coordination context per member, registered on a shared bus and
    /// synced once so every context knows its peers.
    pub fn contexts(world: &SimWorld) -> Vec<CoordinationContext> {
        let bus = MemoryBus::new();
        let mut out: Vec<CoordinationContext> = (0..world.member_count())
            .map(|i| {
                let account = world.account_of(i).unwrap().clone();
                CoordinationContext::new(account, Arc::new(bus.clone()), CoordinationConfig::default())
                    .unwrap()
            })
            .collect();
        for c in &mut out {
            c.sync(world.now());
        }
        out
    }

    /// Pre-checks then evaluate, the way the decision loop scores.
    pub fn score(
        candidate: &dyn Candidate,
        world: &mut SimWorld,
        member: usize,
        coord: &CoordinationContext,
    ) -> Option<f32> {
        let now = world.now();
        let env = world.member_env(member).unwrap();
        let state = classify(env.signals().as_ref(), &ClassifierConfig::default());
        let ctx = TickContext::new(Tick::ZERO, now, state, &env, coord);
        if !candidate.pre_checks_valid(&ctx) {
            return None;
        }
        candidate.evaluate(&ctx, &[])
    }

    /// Start an execution and poll it to completion, advancing the world by
    /// `dt_ms` between polls.
    pub fn run(
        candidate: &mut dyn Candidate,
        world: &mut SimWorld,
        member: usize,
        coord: &mut CoordinationContext,
        dt_ms: u64,
    ) -> ExecutionResult {
        let mut execution = {
            let now = world.now();
            let env = world.member_env(member).unwrap();
            let state = classify(env.signals().as_ref(), &ClassifierConfig::default());
            let ctx = TickContext::new(Tick::ZERO, now, state, &env, coord);
            candidate.execute(&ctx)
        };
        for _ in 0..100 {
            {
                let now = world.now();
                let mut env = world.member_env(member).unwrap();
                let state = classify(env.signals().as_ref(), &ClassifierConfig::default());
                let mut step = StepContext::new(Tick::ZERO, now, state, &mut env, coord);
                if let Step::Done(result) = execution.poll(&mut step).unwrap() {
                    return result;
                }
            }
            world.advance(dt_ms);
        }
        panic!("execution never finished");
    }
}

#[cfg(test)]
mod targeting {
    use super::helpers::*;
    use crate::{TargetingOrder, first_ally};

    #[test]
    fn distance_orders() {
        let mut world = party();
        let war = world.agent_of(WAR).unwrap();
        let monk = world.agent_of(MONK).unwrap();
        let env = world.member_env(LEAD).unwrap();

        let near = first_ally(&env, 5_000.0, |_| true, &[TargetingOrder::DistanceAsc]).unwrap();
        let far = first_ally(&env, 5_000.0, |_| true, &[TargetingOrder::DistanceDesc]).unwrap();
        assert_eq!(near.agent, war);
        assert_eq!(far.agent, monk);
    }

    #[test]
    fn range_limits_candidates() {
        let mut world = party();
        let war = world.agent_of(WAR).unwrap();
        let env = world.member_env(LEAD).unwrap();
        let a = first_ally(&env, 1_000.0, |_| true, &[TargetingOrder::DistanceDesc]).unwrap();
        assert_eq!(a.agent, war);
    }

    #[test]
    fn dead_allies_are_ignored() {
        let mut world = party();
        world.set_alive(WAR, false);
        let monk = world.agent_of(MONK).unwrap();
        let env = world.member_env(LEAD).unwrap();
        let a = first_ally(&env, 5_000.0, |_| true, &[TargetingOrder::DistanceAsc]).unwrap();
        assert_eq!(a.agent, monk);
    }

    #[test]
    fn later_keys_break_ties() {
        let mut world = party();
        let war = world.agent_of(WAR).unwrap();
        // Both allies at full energy; distance decides.
        let env = world.member_env(LEAD).unwrap();
        let order = [TargetingOrder::EnergyAsc, TargetingOrder::DistanceAsc];
        assert_eq!(first_ally(&env, 5_000.0, |_| true, &order).unwrap().agent, war);
    }

    #[test]
    fn condition_filters() {
        let mut world = party();
        let env = world.member_env(LEAD).unwrap();
        assert!(first_ally(&env, 5_000.0, |a| a.energy_ratio < 0.5, &[]).is_none());
    }
}

#[cfg(test)]
mod follow_flag {
    use cb_behavior::{BehaviorError, ExecutionResult};
    use cb_core::Position;
    use cb_coord::{CoordinationContext, FlagGate};
    use cb_world::SimWorld;

    use super::helpers::*;
    use crate::{FollowFlag, FollowFlagConfig};

    /// Leader assigns `war` a flag at `pos` and both sides sync.
    fn flag_for_war(world: &SimWorld, coords: &mut [CoordinationContext], pos: Position) {
        coords[LEAD].assign_flag(1, account("war"), pos, world.now());
        coords[LEAD].sync(world.now());
        coords[WAR].sync(world.now());
    }

    #[test]
    fn no_flag_no_score() {
        let mut world = party();
        let coords = contexts(&world);
        assert_eq!(score(&FollowFlag::default(), &mut world, WAR, &coords[WAR]), None);
    }

    #[test]
    fn far_flag_is_urgent() {
        let mut world = party();
        let mut coords = contexts(&world);
        flag_for_war(&world, &mut coords, Position::new(501.0, 400.0));
        assert_eq!(score(&FollowFlag::default(), &mut world, WAR, &coords[WAR]), Some(95.0));
    }

    #[test]
    fn moderate_distance_is_normal() {
        let mut world = party();
        let mut coords = contexts(&world);
        flag_for_war(&world, &mut coords, Position::new(501.0, 151.0));
        assert_eq!(score(&FollowFlag::default(), &mut world, WAR, &coords[WAR]), Some(45.0));
    }

    #[test]
    fn close_enough_holds() {
        let mut world = party();
        let mut coords = contexts(&world);
        flag_for_war(&world, &mut coords, Position::new(501.0, 51.0));
        assert_eq!(score(&FollowFlag::default(), &mut world, WAR, &coords[WAR]), None);
    }

    #[test]
    fn leader_never_follows() {
        let mut world = party();
        let mut coords = contexts(&world);
        let now = world.now();
        coords[LEAD].assign_flag(0, account("lead"), Position::new(1.0, 600.0), now);
        assert_eq!(score(&FollowFlag::default(), &mut world, LEAD, &coords[LEAD]), None);
    }

    #[test]
    fn execution_walks_towards_flag() {
        let mut world = party();
        let mut coords = contexts(&world);
        let flag = Position::new(501.0, 400.0);
        flag_for_war(&world, &mut coords, flag);

        let before = world.position_of(WAR).unwrap().distance(flag);
        let mut c = FollowFlag::default();
        let result = run(&mut c, &mut world, WAR, &mut coords[WAR], 250);

        assert_eq!(result, ExecutionResult::Performed);
        let after = world.position_of(WAR).unwrap().distance(flag);
        assert!(after < before - 200.0, "moved from {before} to {after}");
    }

    #[test]
    fn released_flag_is_not_followed() {
        let mut world = party();
        let mut coords = contexts(&world);
        flag_for_war(&world, &mut coords, Position::new(501.0, 400.0));
        let start = world.position_of(WAR).unwrap();

        let now = world.now();
        coords[WAR].release_flag(1, now);
        let mut c = FollowFlag::default();
        assert_eq!(run(&mut c, &mut world, WAR, &mut coords[WAR], 250), ExecutionResult::Skipped);
        assert_eq!(world.position_of(WAR), Some(start));
    }
    #[test]
    fn unusable_thresholds_are_rejected() {
        let mut cfg = FollowFlagConfig::default();
        cfg.gate = FlagGate::new(150.0, 100.0);
        assert!(matches!(FollowFlag::new(cfg.clone()), Err(BehaviorError::Config(_))));

        cfg.gate = FlagGate::new(10.0, f32::NAN);
        assert!(cfg.validate().is_err());

        let cfg = FollowFlagConfig { gate: FlagGate::new(5.0, 50.0), ..Default::default() };
        assert!(FollowFlag::new(cfg).is_ok());
    }
}

#[cfg(test)]
mod ally_buff {
    use cb_behavior::{Candidate, ExecutionResult};
    use cb_core::{Position, Role};
    use cb_coord::ToggleKey;
    use cb_world::{MemberSpec, SimSkill, SimWorldBuilder};

    use super::helpers::*;
    use crate::{AllyBuff, AllyBuffConfig};

    fn finale() -> AllyBuff {
        AllyBuff::new(AllyBuffConfig::blazing_finale(FINALE))
    }

    #[test]
    fn scores_when_martial_ally_in_range() {
        let mut world = party();
        let coords = contexts(&world);
        assert_eq!(score(&finale(), &mut world, LEAD, &coords[LEAD]), Some(33.0));
    }

    #[test]
    fn casts_on_the_warrior() {
        let mut world = party();
        let mut coords = contexts(&world);
        let war = world.agent_of(WAR).unwrap();
        let mut c = finale();

        let result = run(&mut c, &mut world, LEAD, &mut coords[LEAD], 100);

        assert_eq!(result, ExecutionResult::Performed);
        assert_eq!(world.casts(LEAD), &[(FINALE, Some(war))]);
        assert_eq!(world.buffs_received(WAR), 1);
    }

    #[test]
    fn recharging_skill_fails_pre_checks() {
        let mut world = party();
        let mut coords = contexts(&world);
        let mut c = finale();
        run(&mut c, &mut world, LEAD, &mut coords[LEAD], 100);
        assert_eq!(score(&c, &mut world, LEAD, &coords[LEAD]), None);
    }

    #[test]
    fn lowest_energy_ally_first() {
        let mut b = SimWorldBuilder::new(1);
        b.member(
            MemberSpec::new(account("lead"), Role::Paragon, Position::new(1.0, 1.0))
                .leader()
                .with_skill(SimSkill::new(FINALE, 10.0, 250, 1_000)),
        );
        b.member(MemberSpec::new(account("ranger"), Role::Ranger, Position::new(1.0, 201.0)));
        b.member(MemberSpec::new(account("war"), Role::Warrior, Position::new(801.0, 1.0)));
        b.hostile(Position::new(1.0, 501.0));
        let mut world = b.build();
        world.set_energy(2, 5.0);
        let war = world.agent_of(2).unwrap();
        let mut coords = contexts(&world);

        let mut c = finale();
        run(&mut c, &mut world, 0, &mut coords[0], 100);
        assert_eq!(world.casts(0), &[(FINALE, Some(war))]);
    }

    #[test]
    fn shared_toggle_overrides_local_activation() {
        let mut world = party();
        let mut coords = contexts(&world);
        let now = world.now();
        coords[LEAD].set_toggle(ToggleKey::buff("Blazing Finale", Role::Warrior), false, now);
        assert_eq!(score(&finale(), &mut world, LEAD, &coords[LEAD]), None);

        coords[LEAD].set_toggle(ToggleKey::buff("Blazing Finale", Role::Monk), true, now);
        assert_eq!(score(&finale(), &mut world, LEAD, &coords[LEAD]), None, "monk is out of range");
    }

    #[test]
    fn local_configuration_is_mutable() {
        let mut world = party();
        let coords = contexts(&world);
        let mut c = finale();
        c.buff_configuration_mut().unwrap().set(Role::Warrior, false);
        assert!(!c.buff_configuration().unwrap().is_active(Role::Warrior));
        assert_eq!(score(&c, &mut world, LEAD, &coords[LEAD]), None);
    }

    #[test]
    fn not_allowed_far_from_aggro() {
        let mut world = party();
        world.clear_hostiles_around(Position::new(1.0, 801.0), 10.0);
        let coords = contexts(&world);
        assert_eq!(score(&finale(), &mut world, LEAD, &coords[LEAD]), None);
    }

    #[test]
    fn not_enough_energy() {
        let mut world = party();
        world.set_energy(LEAD, 4.0);
        let coords = contexts(&world);
        assert_eq!(score(&finale(), &mut world, LEAD, &coords[LEAD]), None);
    }
}

#[cfg(test)]
mod broadcast {
    use cb_behavior::ExecutionResult;
    use cb_coord::Command;

    use super::helpers::*;
    use crate::{BroadcastConfig, BroadcastConsumable};

    fn pots(repeat: u32) -> BroadcastConsumable {
        let mut cfg = BroadcastConfig::new("party pots", POT);
        cfg.repeat = repeat;
        BroadcastConsumable::new(cfg)
    }

    #[test]
    fn only_the_leader_scores() {
        let mut world = party();
        let coords = contexts(&world);
        assert_eq!(score(&pots(1), &mut world, LEAD, &coords[LEAD]), Some(20.0));
        assert_eq!(score(&pots(1), &mut world, WAR, &coords[WAR]), None);
    }

    #[test]
    fn needs_the_item() {
        let mut world = party();
        let mut coords = contexts(&world);
        let mut c = pots(3);
        run(&mut c, &mut world, LEAD, &mut coords[LEAD], 250);
        assert_eq!(score(&c, &mut world, LEAD, &coords[LEAD]), None);
    }

    #[test]
    fn uses_locally_and_tells_peers() {
        let mut world = party();
        let mut coords = contexts(&world);
        let mut c = pots(2);

        let result = run(&mut c, &mut world, LEAD, &mut coords[LEAD], 250);
        assert_eq!(result, ExecutionResult::Performed);
        assert_eq!(world.items_used(LEAD, POT), 2);

        let now = world.now();
        coords[WAR].sync(now);
        coords[MONK].sync(now);
        assert_eq!(coords[WAR].inbox_len(), 1);
        assert_eq!(coords[MONK].inbox_len(), 1);
        let msg = coords[WAR].pop_inbox().unwrap();
        assert_eq!(msg.sender().as_str(), "lead");
        assert_eq!(msg.decode(), Some(Command::UseItem { model: POT, repeat: 2, delay_ms: 250 }));
    }

    #[test]
    fn running_out_midway_still_performs() {
        let mut world = party();
        let mut coords = contexts(&world);
        let mut c = pots(5);
        assert_eq!(run(&mut c, &mut world, LEAD, &mut coords[LEAD], 250), ExecutionResult::Performed);
        assert_eq!(world.items_used(LEAD, POT), 3);
    }
}

#[cfg(test)]
mod party_command {
    use cb_behavior::ExecutionResult;
    use cb_core::SkillId;
    use cb_coord::Command;

    use super::helpers::*;
    use crate::ObeyPartyCommands;

    #[test]
    fn scores_only_with_mail() {
        let mut world = party();
        let mut coords = contexts(&world);
        let c = ObeyPartyCommands::default();
        assert_eq!(score(&c, &mut world, WAR, &coords[WAR]), None);

        coords[LEAD].send(account("war"), Command::UseItem { model: POT, repeat: 1, delay_ms: 0 });
        coords[WAR].sync(world.now());
        assert_eq!(score(&c, &mut world, WAR, &coords[WAR]), Some(99.0));
    }

    #[test]
    fn uses_commanded_items() {
        let mut world = party();
        let mut coords = contexts(&world);
        coords[LEAD].send(account("war"), Command::UseItem { model: POT, repeat: 2, delay_ms: 500 });
        coords[WAR].sync(world.now());

        let mut c = ObeyPartyCommands::default();
        let result = run(&mut c, &mut world, WAR, &mut coords[WAR], 250);
        assert_eq!(result, ExecutionResult::Performed);
        assert_eq!(world.items_used(WAR, POT), 2);
        assert_eq!(coords[WAR].inbox_len(), 0);
    }

    #[test]
    fn missing_item_is_skipped() {
        let mut world = party();
        let mut coords = contexts(&world);
        coords[LEAD].send(account("monk"), Command::UseItem { model: POT, repeat: 1, delay_ms: 0 });
        coords[MONK].sync(world.now());

        let mut c = ObeyPartyCommands::default();
        assert_eq!(run(&mut c, &mut world, MONK, &mut coords[MONK], 250), ExecutionResult::Skipped);
    }

    #[test]
    fn casts_commanded_skill() {
        let mut world = party();
        let mut coords = contexts(&world);
        coords[LEAD].send(account("war"), Command::UseSkill { skill: SIGNET, target: None });
        coords[WAR].sync(world.now());

        let mut c = ObeyPartyCommands::default();
        assert_eq!(run(&mut c, &mut world, WAR, &mut coords[WAR], 250), ExecutionResult::Performed);
        assert_eq!(world.casts(WAR), &[(SIGNET, None)]);
    }

    #[test]
    fn unknown_skill_is_skipped() {
        let mut world = party();
        let mut coords = contexts(&world);
        coords[LEAD].send(account("war"), Command::UseSkill { skill: SkillId(77), target: None });
        coords[WAR].sync(world.now());

        let mut c = ObeyPartyCommands::default();
        assert_eq!(run(&mut c, &mut world, WAR, &mut coords[WAR], 250), ExecutionResult::Skipped);
        assert!(world.casts(WAR).is_empty());
    }

    #[test]
    fn messages_are_handled_oldest_first() {
        let mut world = party();
        let mut coords = contexts(&world);
        coords[LEAD].send(account("war"), Command::UseSkill { skill: SIGNET, target: None });
        coords[LEAD].send(account("war"), Command::UseItem { model: POT, repeat: 1, delay_ms: 0 });
        coords[WAR].sync(world.now());

        let mut c = ObeyPartyCommands::default();
        run(&mut c, &mut world, WAR, &mut coords[WAR], 250);
        assert_eq!(world.casts(WAR).len(), 1);
        assert_eq!(world.items_used(WAR, POT), 0);
        assert_eq!(coords[WAR].inbox_len(), 1);
    }
}
