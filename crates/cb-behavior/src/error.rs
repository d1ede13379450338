use thiserror::Error;

use cb_world::WorldError;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("candidate configuration error: {0}")]
    Config(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;

/// An execution step failed in a way the candidate did not anticipate.
///
/// The executor logs it and records the step as skipped.
#[derive(Debug, Error)]
pub enum ExecutionFault {
    #[error("environment refused command: {0}")]
    World(#[from] WorldError),

    #[error("execution invariant broken: {0}")]
    Invariant(String),
}
