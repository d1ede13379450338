//! `cb-coord`: state shared between cooperating agent processes.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`stamp`]   | `Stamp`: last-write-wins ordering `(Millis, AccountId)`         |
//! | [`flags`]   | `AssignmentTable` (12 flag slots), `FlagSlot`, `SLOT_COUNT`     |
//! | [`toggles`] | `SharedToggles`, `ToggleKey`                                    |
//! | [`state`]   | `SharedState`: flags + toggles, one mergeable unit              |
//! | [`message`] | `CoordinationMessage`, `MessageId`, `Command`, `SeenMessages`   |
//! | [`bus`]     | `SharedBus` trait, `MemoryBus`                                  |
//! | [`context`] | `CoordinationContext`: one agent's replica and mailbox          |
//! | [`gate`]    | `FlagGate`, `Tier`: distance gating for flag following          |
//! | [`events`]  | `EventBus`, `BusEvent`, `Topic`: in-process notifications       |
//! | [`wire`]    | JSON codec for a real transport adapter                         |
//! | [`error`]   | `BusError`, `BusResult<T>`                                      |
//!
//! # Consistency model
//!
//! Every agent owns a full replica of the [`SharedState`].  Writes are
//! applied locally with a fresh [`Stamp`] and published on the next
//! [`CoordinationContext::sync`]; the bus merges what it receives and hands
//! out snapshots.  Merging is per-register last-write-wins, so replicas
//! converge regardless of the order in which they exchange state.  A reader
//! may see stale data for one sync interval; stale data is never an error.

pub mod bus;
pub mod context;
pub mod error;
pub mod events;
pub mod flags;
pub mod gate;
pub mod message;
pub mod stamp;
pub mod state;
pub mod toggles;
pub mod wire;


pub use bus::{MemoryBus, SharedBus};
pub use context::{CoordinationConfig, CoordinationContext, SyncReport};
pub use error::{BusError, BusResult};
pub use events::{BusEvent, EventBus, SubscriptionId, Topic};
pub use flags::{AssignmentTable, FlagSlot, SLOT_COUNT};
pub use gate::{FlagGate, Tier};
pub use message::{Command, CommandKind, CoordinationMessage, MessageId, SeenMessages};
pub use stamp::Stamp;
pub use state::SharedState;
pub use toggles::{SharedToggles, ToggleKey, ToggleValue};
