//! Coordination error type.
//!
//! Every variant is transient from the decision loop's point of view: a
//! failed sync keeps the previous replica and is retried next tick.

use thiserror::Error;

use cb_core::AccountId;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("shared bus unavailable")]
    Unavailable,

    #[error("shared bus lock poisoned")]
    Poisoned,

    #[error("account {0} is not registered on the bus")]
    UnknownAccount(AccountId),

    #[error("wire codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

pub type BusResult<T> = Result<T, BusError>;
