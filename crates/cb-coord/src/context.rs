//! One agent's view of the coordination layer.
//!
//! A `CoordinationContext` is created per agent session and passed by
//! reference to everything that needs shared data.  It owns the local
//! replica of the [`SharedState`] and the de-duplicated inbox; the bus is
//! only touched in [`sync`](CoordinationContext::sync),
//! [`send`](CoordinationContext::send) and
//! [`broadcast`](CoordinationContext::broadcast).

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use cb_core::{AccountId, Millis, Position};

use crate::{
    AssignmentTable, BusResult, Command, CoordinationMessage, MessageId, SeenMessages, SharedBus,
    SharedState, SharedToggles, Stamp, ToggleKey,
};

/// Tunables of the coordination layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinationConfig {
    /// Minimum time between two snapshot pulls.  Pending local writes and
    /// the inbox are always processed.
    pub sync_interval_ms: u64,
    /// How many delivered message ids are remembered for de-duplication.
    pub seen_message_capacity: usize,
    /// Unprocessed messages kept at most; the oldest are dropped first.
    pub inbox_capacity: usize,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self { sync_interval_ms: 0, seen_message_capacity: 256, inbox_capacity: 64 }
    }
}

/// What one [`CoordinationContext::sync`] call achieved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub published: bool,
    pub pulled: bool,
    pub received: usize,
    pub duplicates: usize,
    /// Unprocessed messages pushed out of a full inbox.
    pub dropped: usize,
    pub errors: usize,
}

pub struct CoordinationContext {
    account: AccountId,
    bus: Arc<dyn SharedBus>,
    config: CoordinationConfig,
    replica: SharedState,
    dirty: bool,
    peers: Vec<AccountId>,
    inbox: VecDeque<CoordinationMessage>,
    seen: SeenMessages,
    session: u64,
    next_seq: u64,
    /// Newest stamp time observed; local stamps are always later.
    clock_floor: Option<Millis>,
    last_pull: Option<Millis>,
}

impl CoordinationContext {
    /// Register `account` on `bus` and start a new message session with an
    /// empty replica.
    pub fn new(account: AccountId, bus: Arc<dyn SharedBus>, config: CoordinationConfig) -> BusResult<Self> {
        bus.register(&account)?;
        let seen = SeenMessages::new(config.seen_message_capacity);
        Ok(Self {
            account,
            bus,
            config,
            replica: SharedState::new(),
            dirty: false,
            peers: Vec::new(),
            inbox: VecDeque::new(),
            seen,
            session: rand::random(),
            next_seq: 0,
            clock_floor: None,
            last_pull: None,
        })
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn config(&self) -> &CoordinationConfig {
        &self.config
    }

    // ── Sync ──────────────────────────────────────────────────────────────

    /// Exchange state with the bus.
    ///
    /// Publishes pending local writes, pulls and merges the bus snapshot
    /// (at most once per `sync_interval_ms`), refreshes the peer list, and
    /// moves new messages into the inbox.  Failures are logged and leave the
    /// previous replica in place.
    pub fn sync(&mut self, now: Millis) -> SyncReport {
        let mut report = SyncReport::default();

        if self.dirty {
            match self.bus.publish(&self.replica) {
                Ok(()) => {
                    self.dirty = false;
                    report.published = true;
                }
                Err(e) => {
                    debug!(account = %self.account, error = %e, "publish failed");
                    report.errors += 1;
                }
            }
        }

        let due = self
            .last_pull
            .is_none_or(|last| now.since(last) >= self.config.sync_interval_ms);
        if due {
            match self.bus.snapshot() {
                Ok(snapshot) => {
                    self.replica.merge(&snapshot);
                    self.observe(self.replica.max_stamp().map(|s| s.at));
                    self.last_pull = Some(now);
                    report.pulled = true;
                }
                Err(e) => {
                    debug!(account = %self.account, error = %e, "snapshot failed");
                    report.errors += 1;
                }
            }
            match self.bus.accounts() {
                Ok(accounts) => self.peers = accounts,
                Err(e) => {
                    debug!(account = %self.account, error = %e, "account list failed");
                    report.errors += 1;
                }
            }
        }

        match self.bus.drain_inbox(&self.account) {
            Ok(messages) => {
                for msg in messages {
                    if msg.receiver != self.account {
                        continue;
                    }
                    if self.seen.insert(&msg.id) {
                        trace!(account = %self.account, id = %msg.id, "message received");
                        self.inbox.push_back(msg);
                        report.received += 1;
                        if self.inbox.len() > self.config.inbox_capacity.max(1) {
                            if let Some(old) = self.inbox.pop_front() {
                                debug!(account = %self.account, id = %old.id, "inbox full, dropping oldest");
                                report.dropped += 1;
                            }
                        }
                    } else {
                        report.duplicates += 1;
                    }
                }
            }
            Err(e) => {
                debug!(account = %self.account, error = %e, "inbox drain failed");
                report.errors += 1;
            }
        }

        report
    }

    fn observe(&mut self, at: Option<Millis>) {
        if let Some(at) = at {
            self.clock_floor = Some(self.clock_floor.map_or(at, |f| f.max(at)));
        }
    }

    /// A stamp for a local write at `now`, later than anything seen so far.
    fn stamp(&mut self, now: Millis) -> Stamp {
        let at = match self.clock_floor {
            Some(floor) if floor >= now => floor.plus(1),
            _ => now,
        };
        self.clock_floor = Some(at);
        Stamp::new(at, self.account.clone())
    }

    // ── Flags ─────────────────────────────────────────────────────────────

    pub fn flags(&self) -> &AssignmentTable {
        &self.replica.flags
    }

    /// Flag position assigned to this agent's own account.
    pub fn my_flag(&self) -> Option<Position> {
        self.replica.flags.assigned_position(&self.account)
    }

    pub fn assign_flag(&mut self, index: usize, owner: AccountId, position: Position, now: Millis) -> bool {
        let stamp = self.stamp(now);
        let applied = self.replica.flags.assign(index, owner, position, stamp);
        self.dirty |= applied;
        applied
    }

    pub fn release_flag(&mut self, index: usize, now: Millis) -> bool {
        let stamp = self.stamp(now);
        let applied = self.replica.flags.release(index, stamp);
        self.dirty |= applied;
        applied
    }

    pub fn clear_flags(&mut self, now: Millis) {
        let stamp = self.stamp(now);
        self.replica.flags.clear(stamp);
        self.dirty = true;
    }

    // ── Toggles ───────────────────────────────────────────────────────────

    pub fn toggles(&self) -> &SharedToggles {
        &self.replica.toggles
    }

    pub fn is_enabled(&self, key: &ToggleKey, default: bool) -> bool {
        self.replica.toggles.is_enabled(key, default)
    }

    pub fn set_toggle(&mut self, key: ToggleKey, enabled: bool, now: Millis) -> bool {
        let stamp = self.stamp(now);
        let applied = self.replica.toggles.set(key, enabled, stamp);
        self.dirty |= applied;
        applied
    }

    pub fn state(&self) -> &SharedState {
        &self.replica
    }

    pub fn has_pending_writes(&self) -> bool {
        self.dirty
    }

    // ── Messages ──────────────────────────────────────────────────────────

    /// Every registered account other than this one, as of the last pull.
    pub fn peers(&self) -> impl Iterator<Item = &AccountId> {
        self.peers.iter().filter(move |a| **a != self.account)
    }

    /// Send `command` to `receiver`.  `None` if the bus refused it.
    pub fn send(&mut self, receiver: AccountId, command: Command) -> Option<MessageId> {
        self.next_seq += 1;
        let (kind, params) = command.to_raw();
        let id = MessageId { sender: self.account.clone(), session: self.session, seq: self.next_seq };
        let message = CoordinationMessage { id: id.clone(), receiver, command: kind, params };
        match self.bus.send(message) {
            Ok(()) => Some(id),
            Err(e) => {
                debug!(account = %self.account, error = %e, "send failed");
                None
            }
        }
    }

    /// Send `command` to every peer; returns how many sends succeeded.
    pub fn broadcast(&mut self, command: Command) -> usize {
        let peers: Vec<AccountId> = self.peers().cloned().collect();
        peers
            .into_iter()
            .filter_map(|peer| self.send(peer, command))
            .count()
    }

    pub fn inbox(&self) -> impl Iterator<Item = &CoordinationMessage> {
        self.inbox.iter()
    }

    pub fn inbox_len(&self) -> usize {
        self.inbox.len()
    }

    /// Oldest unprocessed message.
    pub fn pop_inbox(&mut self) -> Option<CoordinationMessage> {
        self.inbox.pop_front()
    }

    /// Every unprocessed message, oldest first.
    pub fn take_inbox(&mut self) -> Vec<CoordinationMessage> {
        self.inbox.drain(..).collect()
    }
}
