//! Ally target selection.

use std::cmp::Ordering;

use cb_core::Position;
use cb_world::{AllyInfo, Environment};

/// One sort key; keys are applied in order, later keys break ties.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TargetingOrder {
    EnergyAsc,
    EnergyDesc,
    DistanceAsc,
    DistanceDesc,
}

impl TargetingOrder {
    fn compare(self, a: &AllyInfo, b: &AllyInfo, from: Position) -> Ordering {
        match self {
            TargetingOrder::EnergyAsc => a.energy_ratio.total_cmp(&b.energy_ratio),
            TargetingOrder::EnergyDesc => b.energy_ratio.total_cmp(&a.energy_ratio),
            TargetingOrder::DistanceAsc => a.position.distance(from).total_cmp(&b.position.distance(from)),
            TargetingOrder::DistanceDesc => b.position.distance(from).total_cmp(&a.position.distance(from)),
        }
    }
}

/// First living ally within `within` units that satisfies `condition`,
/// after sorting by `order`.  `None` if the agent's own position is unknown.
pub fn first_ally<F>(
    env:       &dyn Environment,
    within:    f32,
    condition: F,
    order:     &[TargetingOrder],
) -> Option<AllyInfo>
where
    F: Fn(&AllyInfo) -> bool,
{
    let from = env.position()?;
    env.allies()
        .into_iter()
        .filter(|a| a.alive && a.position.distance(from) <= within && condition(a))
        .min_by(|a, b| {
            order
                .iter()
                .map(|o| o.compare(a, b, from))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
}
