//! Several decision loops driving one simulated party.

use tracing::info;

use cb_core::{AccountId, Tick, TickClock};
use cb_world::SimWorld;

use crate::{DecisionLoop, EngineError, EngineResult, LoopObserver, TickOutcome};

struct Member {
    /// Index of the member in the world.
    index: usize,
    decision: DecisionLoop,
}

/// Runs one decision loop per account against a shared [`SimWorld`].
///
/// Every [`step`](Self::step) ticks each loop once, in the order the loops
/// were given, all at the same world time, then advances the world by one
/// tick duration.  Single-threaded and deterministic for a given seed.
pub struct Party {
    world: SimWorld,
    members: Vec<Member>,
    clock: TickClock,
}

impl Party {
    /// Pair every loop with the world member of the same account.
    pub fn new(world: SimWorld, loops: Vec<DecisionLoop>, tick_duration_ms: u32) -> EngineResult<Self> {
        if tick_duration_ms == 0 {
            return Err(EngineError::Config("tick_duration_ms must be positive".into()));
        }
        let mut members: Vec<Member> = Vec::with_capacity(loops.len());
        for decision in loops {
            let account = decision.account();
            let index = (0..world.member_count())
                .find(|&i| world.account_of(i) == Some(account))
                .ok_or_else(|| EngineError::UnknownMember(account.to_string()))?;
            if members.iter().any(|m| m.index == index) {
                return Err(EngineError::Config(format!("two loops for account {account}")));
            }
            members.push(Member { index, decision });
        }
        let clock = TickClock::new(world.now(), tick_duration_ms);
        Ok(Self { world, members, clock })
    }

    /// Tick every loop once, then advance the world.
    pub fn step<O: LoopObserver + ?Sized>(&mut self, observer: &mut O) -> Vec<TickOutcome> {
        let now = self.world.now();
        let mut outcomes = Vec::with_capacity(self.members.len());
        for m in &mut self.members {
            let Some(mut env) = self.world.member_env(m.index) else {
                continue;
            };
            outcomes.push(m.decision.tick_observed(&mut env, now, observer));
        }
        self.world.advance(self.clock.tick_duration_ms as u64);
        self.clock.advance();
        outcomes
    }

    pub fn run<O: LoopObserver + ?Sized>(&mut self, ticks: u64, observer: &mut O) {
        for _ in 0..ticks {
            self.step(observer);
        }
        info!(ticks, now = %self.world.now(), "party run finished");
        observer.on_run_end(self.clock.current_tick);
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SimWorld {
        &mut self.world
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn loops(&self) -> impl Iterator<Item = &DecisionLoop> {
        self.members.iter().map(|m| &m.decision)
    }

    pub fn loop_for(&self, account: &AccountId) -> Option<&DecisionLoop> {
        self.members.iter().map(|m| &m.decision).find(|d| d.account() == account)
    }

    pub fn loop_for_mut(&mut self, account: &AccountId) -> Option<&mut DecisionLoop> {
        self.members.iter_mut().map(|m| &mut m.decision).find(|d| d.account() == account)
    }
}
