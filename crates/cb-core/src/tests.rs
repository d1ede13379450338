//! Unit tests for cb-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AccountId, AgentId, CandidateId};

    #[test]
    fn index_and_sentinel() {
        assert_eq!(CandidateId(3).index(), 3);
        assert_eq!(AgentId::try_from(42usize).unwrap(), AgentId(42));
        assert!(!AgentId::default().is_valid());
        assert_eq!(AgentId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }

    #[test]
    fn account_rejects_blank() {
        assert!(AccountId::new("   ").is_err());
        let a = AccountId::new(" leader@party ").unwrap();
        assert_eq!(a.as_str(), "leader@party");
    }

    #[test]
    fn account_ordering_is_lexicographic() {
        let a: AccountId = "alpha".parse().unwrap();
        let b: AccountId = "beta".parse().unwrap();
        assert!(a < b);
    }
}

#[cfg(test)]
mod geo {
    use crate::{Position, Range};

    #[test]
    fn distance_3_4_5() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_sq(b), 25.0);
    }

    #[test]
    fn origin_sentinel() {
        assert!(Position::ORIGIN.is_origin());
        assert!(!Position::new(0.0, 1.0).is_origin());
    }

    #[test]
    fn step_towards_stops_at_target() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(10.0, 0.0);
        assert_eq!(a.step_towards(b, 4.0), Position::new(4.0, 0.0));
        assert_eq!(a.step_towards(b, 40.0), b);
    }

    #[test]
    fn range_bands() {
        assert_eq!(Range::Earshot.units(), 1012.0);
        assert_eq!(Range::Spellcast.units(), 1248.0);
        assert!(Range::Spirit.contains(2500.0));
        assert!(!Range::Spirit.contains(2500.1));
    }
}

#[cfg(test)]
mod time {
    use crate::{Millis, Tick, TickClock};

    #[test]
    fn tick_arithmetic() {
        assert_eq!(Tick(10) + 5, Tick(15));
        assert_eq!(Tick(15).since(Tick(10)), 5);
        assert_eq!(Tick(3).since(Tick(10)), 0);
    }

    #[test]
    fn millis_saturates() {
        assert_eq!(Millis(500).since(Millis(200)), 300);
        assert_eq!(Millis(200).since(Millis(500)), 0);
    }

    #[test]
    fn clock_maps_ticks_to_millis() {
        let mut clock = TickClock::new(Millis(1_000), 100);
        assert_eq!(clock.now(), Millis(1_000));
        clock.advance();
        clock.advance();
        assert_eq!(clock.now(), Millis(1_200));
        assert_eq!(clock.ticks_for_ms(250), 3);
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = AgentRng::new(42, AgentId(1));
        let mut b = AgentRng::new(42, AgentId(1));
        for _ in 0..16 {
            assert_eq!(a.gen_range(0u32..1000), b.gen_range(0u32..1000));
        }
    }

    #[test]
    fn jitter_bounded() {
        let mut rng = AgentRng::new(7, AgentId(0));
        for _ in 0..100 {
            let j = rng.jitter(2.5);
            assert!((-2.5..=2.5).contains(&j));
        }
        assert_eq!(rng.jitter(0.0), 0.0);
    }
}

#[cfg(test)]
mod enums {
    use crate::{BehaviorState, Role, Typology};

    #[test]
    fn typology_priority_order() {
        let prios: Vec<u8> = Typology::ALL.iter().map(|t| t.priority()).collect();
        assert_eq!(prios, vec![1, 2, 3, 4, 5, 6, 7]);
        assert!(Typology::Healing.priority() < Typology::Protection.priority());
    }

    #[test]
    fn role_indices_are_dense() {
        for (i, r) in Role::ALL.iter().enumerate() {
            assert_eq!(r.index(), i);
        }
        assert!(Role::Dervish.is_martial());
        assert!(Role::Monk.is_caster());
    }

    #[test]
    fn parse_names() {
        assert_eq!("Paragon".parse::<Role>().unwrap(), Role::Paragon);
        assert_eq!("buffing".parse::<Typology>().unwrap(), Typology::Buffing);
        assert_eq!("in_aggro".parse::<BehaviorState>().unwrap(), BehaviorState::InAggro);
        assert!("bard".parse::<Role>().is_err());
    }

    #[test]
    fn idle_is_default() {
        assert_eq!(BehaviorState::default(), BehaviorState::Idle);
        assert!(!BehaviorState::ACTIVE.contains(&BehaviorState::Idle));
    }
}
