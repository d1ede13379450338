//! The shared-bus contract and an in-memory implementation.
//!
//! A real deployment backs [`SharedBus`] with inter-process shared memory or
//! a socket; [`MemoryBus`] keeps everything behind one `RwLock` so several
//! agents in one process (tests, the demo) can cooperate.

use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;

use cb_core::AccountId;

use crate::{BusError, BusResult, CoordinationMessage, SharedState};

/// Transport between cooperating agents.
///
/// Every method may fail transiently; callers keep their previous view.
pub trait SharedBus: Send + Sync {
    /// Announce `account` so peers can address it.
    fn register(&self, account: &AccountId) -> BusResult<()>;

    /// Every registered account, in registration order.
    fn accounts(&self) -> BusResult<Vec<AccountId>>;

    /// Merge `state` into the bus copy.
    fn publish(&self, state: &SharedState) -> BusResult<()>;

    /// Current bus copy of the shared state.
    fn snapshot(&self) -> BusResult<SharedState>;

    fn send(&self, message: CoordinationMessage) -> BusResult<()>;

    /// Remove and return every message addressed to `account`.
    fn drain_inbox(&self, account: &AccountId) -> BusResult<Vec<CoordinationMessage>>;
}

#[derive(Default)]
struct Inner {
    state: SharedState,
    accounts: Vec<AccountId>,
    inboxes: FxHashMap<AccountId, Vec<CoordinationMessage>>,
    offline: bool,
}

/// In-process bus.  Cheap to clone; clones share the same storage.
#[derive(Clone, Default)]
pub struct MemoryBus {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every call fails with [`BusError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        match self.inner.write() {
            Ok(mut inner) => inner.offline = offline,
            Err(poisoned) => poisoned.into_inner().offline = offline,
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Inner) -> BusResult<T>) -> BusResult<T> {
        let inner = self.inner.read().map_err(|_| BusError::Poisoned)?;
        if inner.offline {
            return Err(BusError::Unavailable);
        }
        f(&inner)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Inner) -> BusResult<T>) -> BusResult<T> {
        let mut inner = self.inner.write().map_err(|_| BusError::Poisoned)?;
        if inner.offline {
            return Err(BusError::Unavailable);
        }
        f(&mut inner)
    }
}

impl SharedBus for MemoryBus {
    fn register(&self, account: &AccountId) -> BusResult<()> {
        self.write(|inner| {
            if !inner.accounts.contains(account) {
                inner.accounts.push(account.clone());
                inner.inboxes.entry(account.clone()).or_default();
            }
            Ok(())
        })
    }

    fn accounts(&self) -> BusResult<Vec<AccountId>> {
        self.read(|inner| Ok(inner.accounts.clone()))
    }

    fn publish(&self, state: &SharedState) -> BusResult<()> {
        self.write(|inner| {
            inner.state.merge(state);
            Ok(())
        })
    }

    fn snapshot(&self) -> BusResult<SharedState> {
        self.read(|inner| Ok(inner.state.clone()))
    }

    fn send(&self, message: CoordinationMessage) -> BusResult<()> {
        self.write(|inner| match inner.inboxes.get_mut(&message.receiver) {
            Some(inbox) => {
                inbox.push(message);
                Ok(())
            }
            None => Err(BusError::UnknownAccount(message.receiver.clone())),
        })
    }

    fn drain_inbox(&self, account: &AccountId) -> BusResult<Vec<CoordinationMessage>> {
        self.write(|inner| {
            inner
                .inboxes
                .get_mut(account)
                .map(std::mem::take)
                .ok_or_else(|| BusError::UnknownAccount(account.clone()))
        })
    }
}
