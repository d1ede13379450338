use cb_behavior::BehaviorError;
use cb_core::CandidateId;
use cb_coord::BusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine configuration error: {0}")]
    Config(String),

    #[error("candidate `{0}` is already registered")]
    DuplicateCandidate(String),

    #[error("no candidate with id {0}")]
    UnknownCandidate(CandidateId),

    #[error("account `{0}` is not a member of the simulated party")]
    UnknownMember(String),

    #[error(transparent)]
    Candidate(#[from] BehaviorError),

    #[error("coordination bus error: {0}")]
    Bus(#[from] BusError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
