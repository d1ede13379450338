//! Decision loop observer trait for tracing and data collection.

use cb_core::{AccountId, BehaviorState, Millis, Tick};

use crate::{ScoreEntry, TickOutcome};

/// Everything one tick of one loop produced.
pub struct TickReport<'a> {
    pub account: &'a AccountId,
    pub tick: Tick,
    pub now: Millis,
    pub state: BehaviorState,
    /// Empty on ticks that only advanced an in-flight execution.
    pub scores: &'a [ScoreEntry],
    pub outcome: TickOutcome,
    /// Name of the candidate `outcome` refers to.
    pub candidate: Option<&'a str>,
}

/// Callbacks invoked by the decision loop and the party runner.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait LoopObserver {
    /// Called once at the end of every tick of every loop.
    fn on_tick(&mut self, _report: &TickReport<'_>) {}

    /// Called once after a `run_ticks` call completes.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`LoopObserver`] that does nothing.
pub struct NoopObserver;

impl LoopObserver for NoopObserver {}
