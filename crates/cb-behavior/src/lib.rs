//! `cb-behavior`: the candidate action contract.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                                    |
//! |----------------|---------------------------------------------------------------              |
//! | [`classifier`] | `classify`, `ClassifierConfig`                                              |
//! | [`candidate`]  | `Candidate` trait, `CandidateInfo`, `default_pre_checks`                    |
//! | [`score`]      | `ScoreDefinition`, `sanitize`                                               |
//! | [`execution`]  | `Execution` trait, `Step`, `ExecutionResult`, `Finished`, `WaitFor`, `Then` |
//! | [`context`]    | `TickContext<'a>` (read-only) and `StepContext<'a>` (commands)              |
//! | [`buff`]       | `BuffConfiguration`: per-role activation                                    |
//! | [`noop`]       | `NoopCandidate`: registered but never eligible                              |
//! | [`error`]      | `BehaviorError`, `ExecutionFault`                                           |
//!
//! # Design notes
//!
//! A tick of the decision loop in cb-engine works as follows:
//!
//! 1. **Scoring** (read-only): every candidate sees the same `&TickContext`.
//!    `pre_checks_valid` and `evaluate` take `&self`; nothing is mutated.
//!
//! 2. **Execution** (mutating): the winner's `execute` returns a boxed
//!    [`Execution`] that the loop polls once per tick with a
//!    `&mut StepContext` until it reports [`Step::Done`].
//!
//! An `Execution` is a resumable state machine; returning [`Step::Pending`]
//! is the only way to yield control back to the loop.

pub mod buff;
pub mod candidate;
pub mod classifier;
pub mod context;
pub mod error;
pub mod execution;
pub mod noop;
pub mod score;

#[cfg(test)]
mod tests;

pub use buff::BuffConfiguration;
pub use candidate::{Candidate, CandidateInfo, default_pre_checks};
pub use classifier::{ClassifierConfig, classify};
pub use context::{StepContext, TickContext};
pub use error::{BehaviorError, BehaviorResult, ExecutionFault};
pub use execution::{Execution, ExecutionResult, Finished, Step, Then, WaitFor};
pub use noop::NoopCandidate;
pub use score::{ScoreDefinition, sanitize};
