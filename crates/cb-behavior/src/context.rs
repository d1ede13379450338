//! Per-tick views handed to candidates.

use cb_core::{BehaviorState, Millis, Tick};
use cb_coord::CoordinationContext;
use cb_world::Environment;

/// Read-only snapshot for scoring.
///
/// Built once per tick by the decision loop and shared by every candidate
/// during scoring.  All borrows live for that scoring pass only.
pub struct TickContext<'a> {
    pub tick: Tick,
    pub now: Millis,
    pub state: BehaviorState,
    pub env: &'a dyn Environment,
    pub coord: &'a CoordinationContext,
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(
        tick:  Tick,
        now:   Millis,
        state: BehaviorState,
        env:   &'a dyn Environment,
        coord: &'a CoordinationContext,
    ) -> Self {
        Self { tick, now, state, env, coord }
    }
}

/// Mutable view for one execution step: commands may be issued and
/// coordination messages sent or consumed.
pub struct StepContext<'a> {
    pub tick: Tick,
    pub now: Millis,
    pub state: BehaviorState,
    pub env: &'a mut dyn Environment,
    pub coord: &'a mut CoordinationContext,
}

impl<'a> StepContext<'a> {
    #[inline]
    pub fn new(
        tick:  Tick,
        now:   Millis,
        state: BehaviorState,
        env:   &'a mut dyn Environment,
        coord: &'a mut CoordinationContext,
    ) -> Self {
        Self { tick, now, state, env, coord }
    }
}
