//! JSON wire format for a real transport adapter.
//!
//! Decoding is forgiving: malformed payloads yield `None` (logged at
//! `debug`), and flag slots with an out-of-range index are dropped while the
//! rest of the state is kept.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cb_core::{AccountId, Position};

use crate::toggles::ToggleValue;
use crate::{
    AssignmentTable, BusResult, CoordinationMessage, FlagSlot, SLOT_COUNT, SharedState, SharedToggles, Stamp,
    ToggleKey,
};

#[derive(Serialize, Deserialize)]
struct WireSlot {
    index: usize,
    owner: Option<AccountId>,
    position: Position,
    stamp: Stamp,
}

#[derive(Serialize, Deserialize)]
struct WireToggle {
    key: ToggleKey,
    #[serde(flatten)]
    value: ToggleValue,
}

#[derive(Serialize, Deserialize)]
struct WireState {
    slots: Vec<WireSlot>,
    toggles: Vec<WireToggle>,
}

pub fn encode_message(message: &CoordinationMessage) -> BusResult<String> {
    Ok(serde_json::to_string(message)?)
}

pub fn decode_message(payload: &str) -> Option<CoordinationMessage> {
    serde_json::from_str(payload)
        .map_err(|e| debug!(error = %e, "dropping malformed message"))
        .ok()
}

pub fn encode_state(state: &SharedState) -> BusResult<String> {
    let slots = state
        .flags
        .slots()
        .iter()
        .enumerate()
        .filter_map(|(index, s)| {
            s.stamp.clone().map(|stamp| WireSlot {
                index,
                owner: s.owner.clone(),
                position: s.position,
                stamp,
            })
        })
        .collect();
    let toggles = state
        .toggles
        .iter()
        .map(|(k, v)| WireToggle { key: k.clone(), value: v.clone() })
        .collect();
    Ok(serde_json::to_string(&WireState { slots, toggles })?)
}

/// Rebuild a [`SharedState`] by merging the payload's slots and toggles into
/// an empty state, so the usual last-write-wins rules apply.
pub fn decode_state(payload: &str) -> Option<SharedState> {
    let wire: WireState = serde_json::from_str(payload)
        .map_err(|e| debug!(error = %e, "dropping malformed shared state"))
        .ok()?;

    let mut flags = AssignmentTable::new();
    for slot in wire.slots {
        if slot.index >= SLOT_COUNT {
            debug!(index = slot.index, "dropping out-of-range flag slot");
            continue;
        }
        let stamp = Some(slot.stamp);
        flags.merge_slot(slot.index, FlagSlot { owner: slot.owner, position: slot.position, stamp });
    }

    let mut toggles = SharedToggles::new();
    for t in wire.toggles {
        toggles.set(t.key, t.value.enabled, t.value.stamp);
    }

    Some(SharedState { flags, toggles })
}
