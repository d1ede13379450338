//! Resumable execution steps.
//!
//! An [`Execution`] is polled once per tick.  Each poll may issue commands
//! through the [`StepContext`] and then either finishes with an
//! [`ExecutionResult`] or returns [`Step::Pending`] to be resumed next tick.

use cb_core::Millis;
use cb_world::WorldResult;
use tracing::debug;

use crate::{ExecutionFault, StepContext};

/// Outcome of a finished execution.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ExecutionResult {
    /// The action had an effect; the candidate's throttle restarts.
    Performed,
    /// Nothing happened; the throttle is untouched.
    Skipped,
}

impl ExecutionResult {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionResult::Performed => "performed",
            ExecutionResult::Skipped => "skipped",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Step {
    Pending,
    Done(ExecutionResult),
}

pub trait Execution: Send {
    fn poll(&mut self, ctx: &mut StepContext<'_>) -> Result<Step, ExecutionFault>;
}

// ── Finished ──────────────────────────────────────────────────────────────────

/// Completes on the first poll with a fixed result.
pub struct Finished(pub ExecutionResult);

impl Finished {
    pub fn performed() -> Box<dyn Execution> {
        Box::new(Finished(ExecutionResult::Performed))
    }

    pub fn skipped() -> Box<dyn Execution> {
        Box::new(Finished(ExecutionResult::Skipped))
    }
}

impl Execution for Finished {
    fn poll(&mut self, _ctx: &mut StepContext<'_>) -> Result<Step, ExecutionFault> {
        Ok(Step::Done(self.0))
    }
}

// ── WaitFor ───────────────────────────────────────────────────────────────────

/// Stays pending for `duration_ms` from its first poll, then finishes.
pub struct WaitFor {
    duration_ms: u64,
    deadline: Option<Millis>,
    result: ExecutionResult,
}

impl WaitFor {
    pub fn new(duration_ms: u64, result: ExecutionResult) -> Self {
        Self { duration_ms, deadline: None, result }
    }
}

impl Execution for WaitFor {
    fn poll(&mut self, ctx: &mut StepContext<'_>) -> Result<Step, ExecutionFault> {
        let deadline = *self.deadline.get_or_insert(ctx.now.plus(self.duration_ms));
        if ctx.now >= deadline {
            Ok(Step::Done(self.result))
        } else {
            Ok(Step::Pending)
        }
    }
}

// ── Then ──────────────────────────────────────────────────────────────────────

/// Issue one command on the first poll, then wait.
///
/// A refused command finishes the execution as `Skipped` right away; an
/// accepted one waits `wait_ms` and finishes as `Performed`.
pub struct Then<F> {
    command: Option<F>,
    wait: WaitFor,
}

impl<F> Then<F>
where
    F: FnOnce(&mut StepContext<'_>) -> WorldResult<()> + Send,
{
    pub fn new(command: F, wait_ms: u64) -> Self {
        Self {
            command: Some(command),
            wait: WaitFor::new(wait_ms, ExecutionResult::Performed),
        }
    }
}

impl<F> Execution for Then<F>
where
    F: FnOnce(&mut StepContext<'_>) -> WorldResult<()> + Send,
{
    fn poll(&mut self, ctx: &mut StepContext<'_>) -> Result<Step, ExecutionFault> {
        if let Some(command) = self.command.take() {
            if let Err(e) = command(ctx) {
                debug!(error = %e, "command refused");
                return Ok(Step::Done(ExecutionResult::Skipped));
            }
        }
        self.wait.poll(ctx)
    }
}
