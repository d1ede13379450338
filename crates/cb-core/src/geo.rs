//! Planar coordinates and the standard range bands.
//!
//! The environment reports positions in game units on a flat map, so plain
//! Euclidean distance is exact.  `(0, 0)` is used by the environment and the
//! assignment table as the "no position" sentinel.

/// A point on the map, in game units.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Position) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Squared distance; cheaper when only comparing.
    #[inline]
    pub fn distance_sq(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// `true` for the `(0, 0)` sentinel.
    #[inline]
    pub fn is_origin(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// `true` when both coordinates are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Step from `self` towards `target` by at most `max_step` units.
    pub fn step_towards(self, target: Position, max_step: f32) -> Position {
        let dist = self.distance(target);
        if dist <= max_step || dist == 0.0 {
            return target;
        }
        let t = max_step / dist;
        Position {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Named distance bands used by candidates and the state classifier.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Range {
    Adjacent,
    Nearby,
    Area,
    Earshot,
    Spellcast,
    Spirit,
    Compass,
}

impl Range {
    /// Radius of the band in game units.
    pub fn units(self) -> f32 {
        match self {
            Range::Adjacent  => 156.0,
            Range::Nearby    => 240.0,
            Range::Area      => 312.0,
            Range::Earshot   => 1_012.0,
            Range::Spellcast => 1_248.0,
            Range::Spirit    => 2_500.0,
            Range::Compass   => 5_000.0,
        }
    }

    /// `true` if `distance` falls inside this band.
    #[inline]
    pub fn contains(self, distance: f32) -> bool {
        distance <= self.units()
    }
}
