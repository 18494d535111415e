//! Heuristic lower-bound contract for A\*-family searches.
//!
//! Grounded on `original_source/algorithms/shortest_path/a_star.go`'s
//! `Heuristic[W]` interface: two methods, `init` once per search and
//! `evaluate` per node. [`Haversine`] is the geographic plugin; [`Zero`] is
//! the admissible-everywhere heuristic that degenerates A\* into Dijkstra,
//! useful as a baseline in tests and in the arc-flag-A\* router.

use geo::{Distance, Haversine as HaversineCalc, Point};

use crate::graph::{Geo, NodeId, Weight};

/// A lower bound on the remaining distance from a node to the search
/// target. Must never overestimate (admissible); consistency is preferred
/// but not required — ALT's heuristic is admissible without always being
/// consistent, and `evaluate` may be called on already-settled nodes as a
/// result (spec.md §4.3).
pub trait Heuristic<W: Weight> {
    /// Called exactly once before a search begins.
    fn init(&mut self, source: NodeId, target: NodeId);
    /// A lower bound on the true remaining distance from `node` to the
    /// target set by the last `init` call.
    fn evaluate(&self, node: NodeId) -> W;
}

/// The zero heuristic: always admissible, turns A\* into Dijkstra. Used as
/// a control in property tests and wherever no geographic or landmark data
/// is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct Zero;

impl<W: Weight> Heuristic<W> for Zero {
    fn init(&mut self, _source: NodeId, _target: NodeId) {}

    fn evaluate(&self, _node: NodeId) -> W {
        W::ZERO
    }
}

/// Great-circle (Haversine) lower bound for [`Geo`] node payloads, scaled
/// from metres to the graph's integer weight unit.
///
/// Road networks weighted in metres should use `scale = 1`; networks
/// weighted in another unit (seconds at a reference speed, centimetres,
/// ...) should scale accordingly, since the heuristic must stay in the
/// same unit as edge weights to remain admissible.
pub struct Haversine<'a, N> {
    nodes: &'a [N],
    target: Point<f64>,
    scale: f64,
}

impl<'a, N: Geo> Haversine<'a, N> {
    pub fn new(nodes: &'a [N], scale: f64) -> Self {
        Self {
            nodes,
            target: Point::new(0.0, 0.0),
            scale,
        }
    }

    fn point(&self, node: NodeId) -> Point<f64> {
        let n = &self.nodes[node as usize];
        Point::new(n.lon(), n.lat())
    }
}

impl<'a, N: Geo> Heuristic<u32> for Haversine<'a, N> {
    fn init(&mut self, _source: NodeId, target: NodeId) {
        self.target = self.point(target);
    }

    fn evaluate(&self, node: NodeId) -> u32 {
        let meters = HaversineCalc::distance(self.point(node), self.target);
        (meters * self.scale) as u32
    }
}

impl<'a, N: Geo> Heuristic<u64> for Haversine<'a, N> {
    fn init(&mut self, _source: NodeId, target: NodeId) {
        self.target = self.point(target);
    }

    fn evaluate(&self, node: NodeId) -> u64 {
        let meters = HaversineCalc::distance(self.point(node), self.target);
        (meters * self.scale) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::GeoPoint;

    #[test]
    fn zero_heuristic_is_always_zero() {
        let mut h = Zero;
        Heuristic::<u32>::init(&mut h, 0, 5);
        assert_eq!(Heuristic::<u32>::evaluate(&h, 3), 0);
    }

    #[test]
    fn haversine_lower_bounds_a_known_distance() {
        // Berlin to Hamburg is roughly 255 km as the crow flies.
        let nodes = vec![
            GeoPoint::new(52.5200, 13.4050),
            GeoPoint::new(53.5511, 9.9937),
        ];
        let mut h: Haversine<GeoPoint> = Haversine::new(&nodes, 1.0);
        Heuristic::<u32>::init(&mut h, 0, 1);
        let estimate: u32 = Heuristic::<u32>::evaluate(&h, 0);
        assert!(estimate > 200_000 && estimate < 300_000);
        assert_eq!(Heuristic::<u32>::evaluate(&h, 1), 0);
    }
}
