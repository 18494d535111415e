//! ALT (A\*, Landmarks, Triangle inequality) landmark table and heuristic.
//!
//! Grounded on `original_source/algorithms/shortest_path/alt.go`. That file's
//! `Evaluate` ignores its `id` argument and folds the triangle-inequality
//! bound around `ah.Source` instead — every query then returns the same
//! constant regardless of which node A\* is expanding, which defeats the
//! heuristic entirely. The bound implemented here evaluates per queried
//! node, `max_L max(From[target] - From[node], To[node] - To[target])`,
//! the textbook ALT formula and the one this crate's A\* searches rely on
//! to make progress.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::graph::csr::Csr;
use crate::graph::{HalfEdge, NodeId, Weight};
use crate::heuristic::Heuristic;
use crate::search::dijkstra;

/// Precomputed one-to-all / all-to-one distances for a single landmark.
#[derive(Serialize, Deserialize)]
struct LandmarkDistances<W> {
    from: Vec<W>,
    to: Vec<W>,
}

/// The full landmark table: one [`LandmarkDistances`] per selected landmark,
/// built once per graph and reused across every ALT query. `Serialize` so
/// the CLI can persist it alongside the landmark id file instead of
/// recomputing two one-to-all Dijkstras per landmark on every run.
#[derive(Serialize, Deserialize)]
pub struct AltTable<W> {
    landmarks: Vec<NodeId>,
    distances: Vec<LandmarkDistances<W>>,
}

impl<W: Weight> AltTable<W> {
    /// Builds the table, computing one one-to-all Dijkstra (forward and
    /// backward) per landmark in parallel via `rayon` — each landmark's pair
    /// of searches is independent, so there is no shared mutable state to
    /// serialize, unlike arc-flag preprocessing's single writable edge array.
    pub fn build<N, E>(forward: &Csr<N, E>, backward: &Csr<N, E>, landmarks: &[NodeId]) -> Self
    where
        N: Sync,
        E: HalfEdge<W> + Sync,
    {
        tracing::info!(count = landmarks.len(), "building ALT landmark table");
        let distances: Vec<LandmarkDistances<W>> = landmarks
            .par_iter()
            .map(|&landmark| {
                let from = dijkstra::one_to_all(forward, landmark);
                let to = dijkstra::one_to_all(backward, landmark);
                LandmarkDistances {
                    from: from
                        .lengths
                        .into_iter()
                        .map(|d| d.unwrap_or(W::MAX))
                        .collect(),
                    to: to.lengths.into_iter().map(|d| d.unwrap_or(W::MAX)).collect(),
                }
            })
            .collect();
        Self {
            landmarks: landmarks.to_vec(),
            distances,
        }
    }

    pub fn landmarks(&self) -> &[NodeId] {
        &self.landmarks
    }
}

/// The ALT heuristic: a lower bound built from the precomputed landmark
/// table, re-targeted per query via `init`.
pub struct AltHeuristic<'a, W> {
    table: &'a AltTable<W>,
    target: NodeId,
}

impl<'a, W: Weight> AltHeuristic<'a, W> {
    pub fn new(table: &'a AltTable<W>) -> Self {
        Self { table, target: 0 }
    }
}

impl<'a, W: Weight> Heuristic<W> for AltHeuristic<'a, W> {
    fn init(&mut self, _source: NodeId, target: NodeId) {
        self.target = target;
    }

    fn evaluate(&self, node: NodeId) -> W {
        let mut bound = W::ZERO;
        for landmark in &self.table.distances {
            let via_from = landmark.from[self.target as usize].saturating_sub(landmark.from[node as usize]);
            let via_to = landmark.to[node as usize].saturating_sub(landmark.to[self.target as usize]);
            bound = bound.max(via_from).max(via_to);
        }
        bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edge::WeightedEdge;
    use crate::graph::list::AdjacencyList;
    use crate::graph::node::Plain;
    use crate::search::{astar, dijkstra, ShortestPathResult};

    fn diamond() -> Csr<Plain, WeightedEdge<u32>> {
        let mut g: AdjacencyList<Plain, WeightedEdge<u32>> = AdjacencyList::new();
        for _ in 0..4 {
            g.append_node(Plain);
        }
        g.insert_edge(0, WeightedEdge::new(1, 7));
        g.insert_edge(0, WeightedEdge::new(2, 8));
        g.insert_edge(1, WeightedEdge::new(3, 8));
        g.insert_edge(2, WeightedEdge::new(3, 7));
        g.freeze()
    }

    #[test]
    fn alt_heuristic_matches_plain_dijkstra_distance() {
        let g = diamond();
        let t = g.transpose();
        let table: AltTable<u32> = AltTable::build(&g, &t, &[3]);
        let mut h = AltHeuristic::new(&table);
        let result: ShortestPathResult<u32> = astar::search(&g, &mut h, 0, 3, false);
        let plain: ShortestPathResult<u32> = dijkstra::one_to_one(&g, 0, 3, false);
        assert_eq!(result.length, plain.length);
    }

    #[test]
    fn alt_heuristic_is_zero_at_the_target() {
        let g = diamond();
        let t = g.transpose();
        let table: AltTable<u32> = AltTable::build(&g, &t, &[1, 2]);
        let mut h = AltHeuristic::new(&table);
        h.init(0, 3);
        assert_eq!(h.evaluate(3), 0);
    }
}
