//! `cb-world`: what a decision loop can see and do.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`environment`] | `Environment` trait, `AllyInfo`                           |
//! | [`signals`]     | `Signals`: the per-tick inputs of the state classifier    |
//! | [`hostiles`]    | `HostileIndex` (R-tree over hostile positions)            |
//! | [`sim`]         | `SimWorld`, `SimWorldBuilder`, `MemberSpec`, `MemberEnv`  |
//! | [`error`]       | `WorldError`, `WorldResult<T>`                            |
//!
//! # Design notes
//!
//! Everything above this crate talks to the environment only through the
//! [`Environment`] trait.  Perception methods are `&self` and return `None`
//! (or an empty list) when data is momentarily unavailable; only commands
//! return `Result`, and callers treat a command error as "nothing happened".
//!
//! [`SimWorld`] is a deterministic stand-in used by tests and the demo.  One
//! world holds the whole party; [`SimWorld::member_env`] hands out a
//! per-member view implementing `Environment`.

pub mod environment;
pub mod error;
pub mod hostiles;
pub mod signals;
pub mod sim;

#[cfg(test)]
mod tests;

pub use environment::{AllyInfo, Environment};
pub use error::{WorldError, WorldResult};
pub use hostiles::HostileIndex;
pub use signals::Signals;
pub use sim::{MemberEnv, MemberSpec, SimSkill, SimWorld, SimWorldBuilder};
