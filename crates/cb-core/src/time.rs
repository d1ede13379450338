//! Decision-loop time model.
//!
//! # Design
//!
//! The loop counts decisions with a monotonically increasing `Tick`, while
//! throttles and timed execution windows are expressed in `Millis`, the
//! environment's millisecond clock.  `TickClock` maps one onto the other for
//! simulated runs:
//!
//!   now_ms = start_ms + tick * tick_duration_ms
//!
//! Live deployments feed the environment's own clock into the loop instead;
//! nothing below `cb-engine` assumes the mapping is linear.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute decision tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Millis ────────────────────────────────────────────────────────────────────

/// A point on the environment's millisecond clock.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// Milliseconds elapsed since `earlier`; zero if the clock went backwards.
    #[inline]
    pub fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    #[inline]
    pub fn plus(self, ms: u64) -> Millis {
        Millis(self.0.saturating_add(ms))
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ── TickClock ─────────────────────────────────────────────────────────────────

/// Converts between tick counts and environment milliseconds for simulated
/// runs.  Cheap to copy; holds no heap data.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickClock {
    /// Environment time of tick 0.
    pub start: Millis,
    /// How many milliseconds one tick represents.
    pub tick_duration_ms: u32,
    /// The current tick, advanced by `TickClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl TickClock {
    pub fn new(start: Millis, tick_duration_ms: u32) -> Self {
        Self {
            start,
            tick_duration_ms,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Environment time corresponding to `current_tick`.
    #[inline]
    pub fn now(&self) -> Millis {
        self.at(self.current_tick)
    }

    /// Environment time corresponding to an arbitrary tick.
    #[inline]
    pub fn at(&self, tick: Tick) -> Millis {
        self.start.plus(tick.0 * self.tick_duration_ms as u64)
    }

    /// How many ticks span `ms` milliseconds (rounds up).
    #[inline]
    pub fn ticks_for_ms(&self, ms: u64) -> u64 {
        ms.div_ceil(self.tick_duration_ms.max(1) as u64)
    }
}

impl fmt::Display for TickClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.current_tick, self.now())
    }
}
