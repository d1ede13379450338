//! `cb-core`: foundational types for the `rust_cb` decision engine.
//!
//! This crate is a dependency of every other `cb-*` crate.  It intentionally
//! has no `cb-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                        |
//! |-----------------|-------------------------------------------------------          |
//! | [`ids`]         | `AgentId`, `CandidateId`, `SkillId`, `ItemModelId`, `AccountId` |
//! | [`geo`]         | `Position`, `Range`, planar distance                            |
//! | [`time`]        | `Tick`, `Millis`, `TickClock`                                   |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)                       |
//! | [`role`]        | `Role` (profession) enum                                        |
//! | [`typology`]    | `Typology` enum and its tie-break priority                      |
//! | [`state`]       | `BehaviorState`                                                 |
//! | [`error`]       | `CoreError`, `CoreResult`                                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by the `cb-coord` wire codec.                     |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod role;
pub mod state;
pub mod time;
pub mod typology;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Position, Range};
pub use ids::{AccountId, AgentId, CandidateId, ItemModelId, SkillId};
pub use rng::{AgentRng, SimRng};
pub use role::Role;
pub use state::BehaviorState;
pub use time::{Millis, Tick, TickClock};
pub use typology::Typology;
