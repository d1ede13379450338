//! Framework error type.
//!
//! Sub-crates define their own error enums and keep them separate; this one
//! covers the few fallible conversions that live in `cb-core` itself.

use thiserror::Error;

/// The error type for `cb-core` parsing and validation helpers.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown role name `{0}`")]
    UnknownRole(String),

    #[error("unknown typology name `{0}`")]
    UnknownTypology(String),

    #[error("unknown behavior state `{0}`")]
    UnknownState(String),

    #[error("invalid account identity: {0}")]
    InvalidAccount(String),
}

/// Shorthand result type for `cb-core`.
pub type CoreResult<T> = Result<T, CoreError>;
