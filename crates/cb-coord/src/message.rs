//! Point-to-point coordination messages and their de-duplication.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use cb_core::{AccountId, AgentId, ItemModelId, SkillId};

/// Unique identity of a message: the sender's session plus a sequence
/// number within that session.
///
/// `session` is drawn fresh for every [`CoordinationContext`](crate::CoordinationContext),
/// so a restarted sender never collides with ids remembered from before.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct MessageId {
    pub sender: AccountId,
    pub session: u64,
    pub seq: u64,
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:x}#{}", self.sender, self.session, self.seq)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum CommandKind {
    /// `params = [item model, repeat count, delay ms, unused]`
    UseItem,
    /// `params = [skill id, target agent id (negative = none), unused, unused]`
    UseSkill,
}

/// A command sent from one account to another.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CoordinationMessage {
    pub id: MessageId,
    pub receiver: AccountId,
    pub command: CommandKind,
    pub params: [f32; 4],
}

impl CoordinationMessage {
    pub fn sender(&self) -> &AccountId {
        &self.id.sender
    }

    /// Typed view of the raw parameters; `None` if they do not make sense.
    pub fn decode(&self) -> Option<Command> {
        Command::from_raw(self.command, self.params)
    }
}

// ── Command ───────────────────────────────────────────────────────────────────

/// Typed form of a message's `(command, params)` pair.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Command {
    UseItem { model: ItemModelId, repeat: u32, delay_ms: u64 },
    UseSkill { skill: SkillId, target: Option<AgentId> },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::UseItem { .. } => CommandKind::UseItem,
            Command::UseSkill { .. } => CommandKind::UseSkill,
        }
    }

    pub fn to_raw(&self) -> (CommandKind, [f32; 4]) {
        match *self {
            Command::UseItem { model, repeat, delay_ms } => {
                (CommandKind::UseItem, [model.0 as f32, repeat as f32, delay_ms as f32, 0.0])
            }
            Command::UseSkill { skill, target } => {
                let t = target.map_or(-1.0, |a| a.0 as f32);
                (CommandKind::UseSkill, [skill.0 as f32, t, 0.0, 0.0])
            }
        }
    }

    pub fn from_raw(kind: CommandKind, params: [f32; 4]) -> Option<Command> {
        match kind {
            CommandKind::UseItem => {
                let model = non_negative_int(params[0])?;
                let repeat = non_negative_int(params[1])?.max(1);
                let delay_ms = non_negative_int(params[2]).unwrap_or(0);
                Some(Command::UseItem { model: ItemModelId(model), repeat, delay_ms: delay_ms as u64 })
            }
            CommandKind::UseSkill => {
                let skill = non_negative_int(params[0])?;
                let target = non_negative_int(params[1]).map(AgentId);
                Some(Command::UseSkill { skill: SkillId(skill), target })
            }
        }
    }
}

fn non_negative_int(v: f32) -> Option<u32> {
    (v.is_finite() && v >= 0.0 && v <= u32::MAX as f32).then(|| v as u32)
}

// ── SeenMessages ──────────────────────────────────────────────────────────────

/// Bounded memory of already delivered message ids.
///
/// The oldest id is forgotten once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct SeenMessages {
    order: VecDeque<MessageId>,
    set: FxHashSet<MessageId>,
    capacity: usize,
}

impl SeenMessages {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            order: VecDeque::with_capacity(capacity),
            set: FxHashSet::default(),
            capacity,
        }
    }

    /// Record `id`; `true` if it had not been seen before.
    pub fn insert(&mut self, id: &MessageId) -> bool {
        if self.set.contains(id) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(old) = self.order.pop_front() {
                self.set.remove(&old);
            }
        }
        self.order.push_back(id.clone());
        self.set.insert(id.clone());
        true
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.set.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
