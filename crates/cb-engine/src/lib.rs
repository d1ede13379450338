//! `cb-engine`: decision loop orchestrator for the rust_cb framework.
//!
//! # One tick
//!
//! ```text
//! tick(env, now):
//!   ① Events   : drain local toggle events into the loop's switches.
//!   ② Sync     : publish pending shared writes, pull, drain the inbox.
//!   ③ Classify : signals → BehaviorState.
//!   ④ Execution in flight?
//!        yes → poll one step; Done → throttle/attempted bookkeeping;
//!              still pending but candidate disabled → drop (Cancelled).
//!        no  → score all (gates, pre-checks, evaluate) → select →
//!              throttle check → execute → poll the first step.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`registry`] | `Registry`, `Slot` (candidate + enabled + throttle)    |
//! | [`scoring`]  | `score_all`, `ScoreEntry`, `ScoreStatus`, `LocalGates` |
//! | [`selector`] | `select`                                               |
//! | [`throttle`] | `Throttle`                                             |
//! | [`executor`] | `Active`, the in-flight execution                      |
//! | [`engine`]   | `DecisionLoop`, `TickOutcome`, `LoopPhase`, inspection |
//! | [`builder`]  | `DecisionLoopBuilder`                                  |
//! | [`observer`] | `LoopObserver`, `TickReport`, `NoopObserver`           |
//! | [`config`]   | `EngineConfig` (TOML)                                  |
//! | [`party`]    | `Party`, several loops over one `SimWorld`             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let bus: Arc<dyn SharedBus> = Arc::new(MemoryBus::new());
//! let lead = DecisionLoopBuilder::new(lead_account, bus.clone())
//!     .candidate(AllyBuff::new(AllyBuffConfig::blazing_finale(FINALE)))
//!     .build()?;
//! let mut party = Party::new(world, vec![lead], 250)?;
//! party.run(400, &mut NoopObserver);
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod observer;
pub mod party;
pub mod registry;
pub mod scoring;
pub mod selector;
pub mod throttle;


pub use builder::DecisionLoopBuilder;
pub use config::EngineConfig;
pub use engine::{CandidateView, DecisionLoop, LoopPhase, TickOutcome};
pub use error::{EngineError, EngineResult};
pub use observer::{LoopObserver, NoopObserver, TickReport};
pub use party::Party;
pub use registry::{Registry, Slot};
pub use scoring::{LocalGates, ScoreEntry, ScoreStatus, score_all};
pub use selector::select;
pub use throttle::Throttle;
