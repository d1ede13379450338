//! Spatial index over hostile positions.
//!
//! An R-tree (via `rstar`) answers "how far is the nearest hostile" for every
//! party member every tick.  The index is rebuilt in bulk whenever hostiles
//! move.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use cb_core::Position;

#[derive(Clone)]
struct HostileEntry {
    point: [f32; 2],
    id: u32,
}

impl RTreeObject for HostileEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for HostileEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Hostile positions plus an R-tree for nearest-neighbour queries.
pub struct HostileIndex {
    positions: Vec<Position>,
    tree: RTree<HostileEntry>,
}

impl HostileIndex {
    pub fn new(positions: Vec<Position>) -> Self {
        let tree = Self::bulk(&positions);
        Self { positions, tree }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    fn bulk(positions: &[Position]) -> RTree<HostileEntry> {
        let entries = positions
            .iter()
            .enumerate()
            .map(|(i, p)| HostileEntry { point: [p.x, p.y], id: i as u32 })
            .collect();
        RTree::bulk_load(entries)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Replace every hostile position and rebuild the tree.
    pub fn update<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &mut Position),
    {
        for (i, p) in self.positions.iter_mut().enumerate() {
            f(i, p);
        }
        self.tree = Self::bulk(&self.positions);
    }

    pub fn push(&mut self, pos: Position) {
        self.tree.insert(HostileEntry { point: [pos.x, pos.y], id: self.positions.len() as u32 });
        self.positions.push(pos);
    }

    /// Remove every hostile within `radius` of `center`; returns how many.
    pub fn clear_around(&mut self, center: Position, radius: f32) -> usize {
        let before = self.positions.len();
        self.positions.retain(|p| p.distance(center) > radius);
        self.tree = Self::bulk(&self.positions);
        before - self.positions.len()
    }

    /// Distance from `from` to the nearest hostile, or `None` if there is none.
    pub fn nearest_distance(&self, from: Position) -> Option<f32> {
        self.tree
            .nearest_neighbor(&[from.x, from.y])
            .map(|e| e.distance_2(&[from.x, from.y]).sqrt())
    }

    /// Indices of hostiles within `radius` of `from`.
    pub fn within(&self, from: Position, radius: f32) -> Vec<usize> {
        self.tree
            .locate_within_distance([from.x, from.y], radius * radius)
            .map(|e| e.id as usize)
            .collect()
    }
}
