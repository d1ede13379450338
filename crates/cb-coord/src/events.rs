//! In-process event bus.
//!
//! Fire-and-forget notifications between the inspection surface and the
//! decision loop of the same agent.  Events are queued by
//! [`EventBus::publish`] and delivered in publish order by
//! [`EventBus::drain`], which the loop calls at the start of every tick.
//! Nothing crosses process boundaries here; see [`crate::SharedBus`] for that.

use std::collections::VecDeque;
use std::fmt;

use cb_core::Typology;

/// A local notification.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BusEvent {
    EngineToggled { enabled: bool },
    TypologyToggled { typology: Typology, enabled: bool },
    CandidateToggled { name: String, enabled: bool },
    ThrottlesReset,
}

impl BusEvent {
    pub fn topic(&self) -> Topic {
        match self {
            BusEvent::EngineToggled { .. } => Topic::Engine,
            BusEvent::TypologyToggled { .. } => Topic::Typology,
            BusEvent::CandidateToggled { .. } => Topic::Candidate,
            BusEvent::ThrottlesReset => Topic::Throttles,
        }
    }
}

/// Subscription filter.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Topic {
    Engine,
    Typology,
    Candidate,
    Throttles,
    /// Every event.
    All,
}

impl Topic {
    fn matches(self, event: &BusEvent) -> bool {
        self == Topic::All || self == event.topic()
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(u32);

type Handler = Box<dyn FnMut(&BusEvent) + Send>;

struct Subscriber {
    id: SubscriptionId,
    topic: Topic,
    handler: Handler,
}

#[derive(Default)]
pub struct EventBus {
    queue: VecDeque<BusEvent>,
    subscribers: Vec<Subscriber>,
    next_id: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: BusEvent) {
        self.queue.push_back(event);
    }

    pub fn subscribe<F>(&mut self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: FnMut(&BusEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, topic, handler: Box::new(handler) });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Deliver every queued event to matching subscribers and hand the
    /// events back to the caller in publish order.
    pub fn drain(&mut self) -> Vec<BusEvent> {
        let events: Vec<BusEvent> = self.queue.drain(..).collect();
        for event in &events {
            for sub in self.subscribers.iter_mut().filter(|s| s.topic.matches(event)) {
                (sub.handler)(event);
            }
        }
        events
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.queue.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
