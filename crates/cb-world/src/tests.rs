//! Unit tests for cb-world.
//!
//! Worlds are built by hand; no randomness unless a test asks for it.

#[cfg(test)]
mod helpers {
    use cb_core::{AccountId, ItemModelId, Position, Role, SkillId};

    use crate::{MemberSpec, SimSkill, SimWorld, SimWorldBuilder};

    pub const FINALE: SkillId = SkillId(1);
    pub const POT: ItemModelId = ItemModelId(900);

    pub fn account(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    /// Leader paragon at the origin-ish, a warrior 500 units east, a monk
    /// 2000 units east.  One hostile 800 units north of the leader.
    pub fn party() -> SimWorld {
        let mut b = SimWorldBuilder::new(11);
        b.member(
            MemberSpec::new(account("lead"), Role::Paragon, Position::new(1.0, 1.0))
                .leader()
                .with_skill(SimSkill::new(FINALE, 10.0, 250, 1_000))
                .with_item(POT, 3),
        );
        b.member(MemberSpec::new(account("war"), Role::Warrior, Position::new(501.0, 1.0)));
        b.member(MemberSpec::new(account("monk"), Role::Monk, Position::new(2001.0, 1.0)));
        b.hostile(Position::new(1.0, 801.0));
        b.build()
    }
}

#[cfg(test)]
mod hostiles {
    use cb_core::Position;

    use crate::HostileIndex;

    #[test]
    fn nearest_distance() {
        let idx = HostileIndex::new(vec![Position::new(0.0, 10.0), Position::new(0.0, 3.0)]);
        assert_eq!(idx.nearest_distance(Position::ORIGIN), Some(3.0));
    }

    #[test]
    fn empty_index_has_no_nearest() {
        assert_eq!(HostileIndex::empty().nearest_distance(Position::ORIGIN), None);
    }

    #[test]
    fn clear_around_rebuilds() {
        let mut idx = HostileIndex::new(vec![Position::new(0.0, 5.0), Position::new(100.0, 0.0)]);
        assert_eq!(idx.clear_around(Position::ORIGIN, 10.0), 1);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.nearest_distance(Position::ORIGIN), Some(100.0));
        assert_eq!(idx.within(Position::ORIGIN, 150.0), vec![0]);
    }
}

#[cfg(test)]
mod perception {
    use super::helpers::*;
    use crate::Environment;

    #[test]
    fn signals_report_nearest_hostile() {
        let mut world = party();
        let env = world.member_env(0).unwrap();
        let s = env.signals().unwrap();
        assert!(s.in_explorable);
        assert!(!s.in_combat);
        assert!((s.nearest_hostile.unwrap() - 800.0).abs() < 0.01);
    }

    #[test]
    fn unloaded_world_has_no_signals() {
        let mut world = party();
        world.set_loaded(false);
        let env = world.member_env(0).unwrap();
        assert!(env.signals().is_none());
        assert!(env.position().is_none());
        assert!(env.allies().is_empty());
    }

    #[test]
    fn allies_exclude_self() {
        let mut world = party();
        let env = world.member_env(1).unwrap();
        let allies = env.allies();
        assert_eq!(allies.len(), 2);
        assert!(allies.iter().all(|a| a.agent != env.self_agent().unwrap()));
        assert!(allies.iter().all(|a| (a.energy_ratio - 1.0).abs() < f32::EPSILON));
    }

    #[test]
    fn out_of_range_member_index() {
        let mut world = party();
        assert!(world.member_env(3).is_none());
    }

    #[test]
    fn transition_renumbers_agents_keeps_accounts() {
        let mut world = party();
        let before = world.agent_of(1).unwrap();
        world.transition();
        world.set_loaded(true);
        assert_ne!(world.agent_of(1).unwrap(), before);
        assert_eq!(world.account_of(1).unwrap().as_str(), "war");
    }

    #[test]
    fn hostile_close_means_combat() {
        let mut world = party();
        world.spawn_hostile(cb_core::Position::new(501.0, 100.0));
        let env = world.member_env(1).unwrap();
        assert!(env.signals().unwrap().in_combat);
    }
}

#[cfg(test)]
mod commands {
    use cb_core::{AgentId, ItemModelId, Position};

    use super::helpers::*;
    use crate::{Environment, WorldError};

    #[test]
    fn move_then_advance() {
        let mut world = party();
        world.member_env(1).unwrap().move_to(Position::new(501.0, 289.0)).unwrap();
        world.advance(500);
        let p = world.position_of(1).unwrap();
        assert!((p.y - 145.0).abs() < 0.01, "got {p}");
        world.advance(1_000);
        assert_eq!(world.position_of(1).unwrap(), Position::new(501.0, 289.0));
    }

    #[test]
    fn cast_consumes_energy_and_buffs_target() {
        let mut world = party();
        let war = world.agent_of(1).unwrap();
        {
            let mut env = world.member_env(0).unwrap();
            assert!(env.skill_ready(FINALE));
            env.cast_skill(FINALE, Some(war)).unwrap();
            assert!(env.is_casting());
            assert!(!env.skill_ready(FINALE));
        }
        assert_eq!(world.energy_of(0), Some(20.0));
        assert_eq!(world.buffs_received(1), 1);
        assert_eq!(world.casts(0), &[(FINALE, Some(war))]);
    }

    #[test]
    fn cast_rejects_far_or_unknown_target() {
        let mut world = party();
        let monk = world.agent_of(2).unwrap();
        let mut env = world.member_env(0).unwrap();
        assert!(matches!(env.cast_skill(FINALE, Some(monk)), Err(WorldError::OutOfRange(_))));
        assert!(matches!(
            env.cast_skill(FINALE, Some(AgentId(77))),
            Err(WorldError::UnknownTarget(_))
        ));
    }

    #[test]
    fn cast_requires_energy() {
        let mut world = party();
        world.set_energy(0, 5.0);
        let mut env = world.member_env(0).unwrap();
        assert!(matches!(env.cast_skill(FINALE, None), Err(WorldError::NotEnoughEnergy { .. })));
    }

    #[test]
    fn skill_recharges() {
        let mut world = party();
        world.member_env(0).unwrap().cast_skill(FINALE, None).unwrap();
        world.advance(1_000);
        assert!(!world.member_env(0).unwrap().skill_ready(FINALE));
        world.advance(250);
        assert!(world.member_env(0).unwrap().skill_ready(FINALE));
    }

    #[test]
    fn items_run_out() {
        let mut world = party();
        {
            let mut env = world.member_env(0).unwrap();
            for _ in 0..3 {
                env.use_item(POT).unwrap();
            }
            assert!(matches!(env.use_item(POT), Err(WorldError::ItemMissing(_))));
            assert_eq!(env.item_count(POT), 0);
        }
        assert_eq!(world.items_used(0, POT), 3);
        assert!(world.member_env(1).unwrap().use_item(ItemModelId(1)).is_err());
    }

    #[test]
    fn energy_regenerates_up_to_max() {
        let mut world = party();
        world.set_energy(1, 10.0);
        world.advance(5_000);
        assert_eq!(world.energy_of(1), Some(15.0));
        world.advance(60_000);
        assert_eq!(world.energy_of(1), Some(30.0));
    }
}

#[cfg(test)]
mod noise {
    use cb_core::{Position, Role};

    use super::helpers::account;
    use crate::{Environment, MemberSpec, SimWorldBuilder};

    #[test]
    fn sensor_noise_is_bounded_and_reproducible() {
        let build = || {
            let mut b = SimWorldBuilder::new(5).sensor_noise(20.0);
            b.member(MemberSpec::new(account("a"), Role::Monk, Position::new(1.0, 1.0)));
            b.hostile(Position::new(1.0, 1001.0));
            b.build()
        };
        let mut w1 = build();
        let mut w2 = build();
        for _ in 0..10 {
            w1.advance(100);
            w2.advance(100);
            let d1 = w1.member_env(0).unwrap().signals().unwrap().nearest_hostile.unwrap();
            let d2 = w2.member_env(0).unwrap().signals().unwrap().nearest_hostile.unwrap();
            assert_eq!(d1, d2);
            assert!((980.0..=1020.0).contains(&d1), "got {d1}");
        }
    }
}
