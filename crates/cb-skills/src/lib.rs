//! `cb-skills`: ready-made candidates.
//!
//! | Module            | Candidate / helper                                        |
//! |-------------------|-----------------------------------------------------------|
//! | [`follow_flag`]   | `FollowFlag`: move to this account's shared flag          |
//! | [`ally_buff`]     | `AllyBuff`: cast a buff on the neediest eligible ally     |
//! | [`broadcast`]     | `BroadcastConsumable`: leader uses an item party-wide     |
//! | [`party_command`] | `ObeyPartyCommands`: execute commands sent by peers       |
//! | [`targeting`]     | ally selection with ordered sort keys                     |
//! | [`scores`]        | score constants shared by the candidates above            |

pub mod ally_buff;
pub mod broadcast;
pub mod follow_flag;
pub mod party_command;
pub mod scores;
pub mod targeting;

#[cfg(test)]
mod tests;

pub use ally_buff::{AllyBuff, AllyBuffConfig};
pub use broadcast::{BroadcastConfig, BroadcastConsumable};
pub use follow_flag::{FollowFlag, FollowFlagConfig};
pub use party_command::{ObeyPartyCommands, PartyCommandConfig};
pub use targeting::{TargetingOrder, first_ally};
