//! Drives one in-flight execution, and keeps panics in user candidate code
//! from unwinding out of the decision loop.

use std::any::Any;
use std::fmt::Display;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::warn;

use cb_behavior::{Execution, ExecutionResult, Step, StepContext};
use cb_core::{CandidateId, Millis};

/// The execution currently owned by a decision loop.
pub struct Active {
    pub candidate: CandidateId,
    pub started: Millis,
    pub polls: u32,
    execution: Box<dyn Execution>,
}

impl Active {
    pub fn new(candidate: CandidateId, execution: Box<dyn Execution>, started: Millis) -> Self {
        Self { candidate, started, polls: 0, execution }
    }

    /// Poll one step.  A fault or a panic is logged and ends the execution
    /// as `Skipped`.
    pub fn step(&mut self, ctx: &mut StepContext<'_>) -> Step {
        self.polls += 1;
        let candidate = self.candidate;
        let execution = &mut self.execution;
        match contain(candidate, "poll", || execution.poll(ctx)) {
            Some(Ok(step)) => step,
            Some(Err(fault)) => {
                warn!(candidate = %candidate, error = %fault, "execution fault");
                Step::Done(ExecutionResult::Skipped)
            }
            None => Step::Done(ExecutionResult::Skipped),
        }
    }
}

/// Run `f`, turning a panic into `None` plus a warning naming `candidate`
/// and the `call` that panicked.
pub fn contain<T>(candidate: impl Display, call: &str, f: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            warn!(candidate = %candidate, call, panic = panic_message(&*payload), "candidate panicked");
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
