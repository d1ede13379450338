//! Per-candidate minimum interval between performed executions.

use cb_core::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Throttle {
    pub min_interval_ms: u64,
    /// Time of the last `Performed` result; never moves backwards.
    pub last_performed: Option<Millis>,
}

impl Throttle {
    pub fn new(min_interval_ms: u64) -> Self {
        Self { min_interval_ms, last_performed: None }
    }

    #[inline]
    pub fn is_ready(&self, now: Millis) -> bool {
        self.remaining_ms(now) == 0
    }

    /// Milliseconds until the throttle expires.
    pub fn remaining_ms(&self, now: Millis) -> u64 {
        match self.last_performed {
            Some(last) => self.min_interval_ms.saturating_sub(now.since(last)),
            None => 0,
        }
    }

    pub fn record_performed(&mut self, now: Millis) {
        self.last_performed = Some(self.last_performed.map_or(now, |last| last.max(now)));
    }

    pub fn reset(&mut self) {
        self.last_performed = None;
    }
}
