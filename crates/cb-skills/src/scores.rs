//! Score levels shared across candidates.
//!
//! Higher wins.  Commands from peers outrank everything so a party acts in
//! unison; being far from one's flag outranks routine buffing.

/// A peer asked this agent to do something.
pub const PARTY_COMMAND: f32 = 99.0;

/// Far (more than twice the movement threshold) from the assigned flag.
pub const FOLLOW_FLAG_REQUIRED: f32 = 95.0;

/// Outside the movement threshold of the assigned flag.
pub const FOLLOW_FLAG: f32 = 45.0;

/// Default for targeted ally buffs.
pub const ALLY_BUFF: f32 = 33.0;

/// Leader-initiated party-wide consumable.
pub const BROADCAST: f32 = 20.0;
