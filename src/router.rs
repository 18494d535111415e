//! Uniform dispatch surface over every search algorithm: one trait, one
//! `route` method, so the CLI and bench harness can swap algorithms without
//! caring which one is behind the handle.
//!
//! Grounded on `original_source/algorithms/shortest_path/router.go`'s single-
//! method `Router[W]` interface and `shortest_path.go`'s `ShortestPathResult`.

use crate::graph::csr::Csr;
use crate::graph::edge::WeightedEdge;
use crate::graph::{Flagged, HalfEdge, NodeId, Partitioned, TwoLevelFlagged, TwoLevelPartitioned, Weight};
use crate::heuristic::Heuristic;
use crate::preprocess::alt::{AltHeuristic, AltTable};
use crate::search::{arcflag, astar, bidirectional, bidirectional_astar, dijkstra, ShortestPathResult};

/// Computes the shortest path between two nodes of the graph this router
/// was built from. `record_trace` asks for the full pop order, at a
/// measurable performance cost — callers doing bulk benchmarking should
/// leave it off.
pub trait Router<W: Weight> {
    fn route(&mut self, source: NodeId, target: NodeId, record_trace: bool) -> ShortestPathResult<W>;

    /// A short, human-readable name for logs and bench reports.
    fn name(&self) -> &str;
}

pub struct DijkstraRouter<'a, N, E> {
    pub graph: &'a Csr<N, E>,
}

impl<'a, N, E, W> Router<W> for DijkstraRouter<'a, N, E>
where
    E: HalfEdge<W>,
    W: Weight,
{
    fn route(&mut self, source: NodeId, target: NodeId, record_trace: bool) -> ShortestPathResult<W> {
        dijkstra::one_to_one(self.graph, source, target, record_trace)
    }

    fn name(&self) -> &str {
        "dijkstra"
    }
}

pub struct AStarRouter<'a, N, E, H> {
    pub graph: &'a Csr<N, E>,
    pub heuristic: H,
}

impl<'a, N, E, W, H> Router<W> for AStarRouter<'a, N, E, H>
where
    E: HalfEdge<W>,
    W: Weight,
    H: Heuristic<W>,
{
    fn route(&mut self, source: NodeId, target: NodeId, record_trace: bool) -> ShortestPathResult<W> {
        astar::search(self.graph, &mut self.heuristic, source, target, record_trace)
    }

    fn name(&self) -> &str {
        "astar"
    }
}

pub struct BidirectionalRouter<'a, N, E, W: Weight> {
    pub forward: &'a Csr<N, E>,
    pub backward: &'a Csr<N, WeightedEdge<W>>,
}

impl<'a, N, E, W> Router<W> for BidirectionalRouter<'a, N, E, W>
where
    E: HalfEdge<W>,
    W: Weight,
{
    fn route(&mut self, source: NodeId, target: NodeId, record_trace: bool) -> ShortestPathResult<W> {
        bidirectional::search(self.forward, self.backward, source, target, record_trace)
    }

    fn name(&self) -> &str {
        "bidirectional-dijkstra"
    }
}

pub struct BidirectionalAStarRouter<'a, N, E, W: Weight, HF, HB> {
    pub forward: &'a Csr<N, E>,
    pub backward: &'a Csr<N, WeightedEdge<W>>,
    pub forward_heuristic: HF,
    pub backward_heuristic: HB,
}

impl<'a, N, E, W, HF, HB> Router<W> for BidirectionalAStarRouter<'a, N, E, W, HF, HB>
where
    E: HalfEdge<W>,
    W: Weight,
    HF: Heuristic<W>,
    HB: Heuristic<W>,
{
    fn route(&mut self, source: NodeId, target: NodeId, record_trace: bool) -> ShortestPathResult<W> {
        bidirectional_astar::search(
            self.forward,
            self.backward,
            &mut self.forward_heuristic,
            &mut self.backward_heuristic,
            source,
            target,
            record_trace,
        )
    }

    fn name(&self) -> &str {
        "bidirectional-astar"
    }
}

/// ALT is bidirectional A\* whose two heuristics share one landmark table,
/// one built on the forward graph and one on the backward/transpose graph
/// (spec.md §4.9).
pub struct AltRouter<'a, N, E, W: Weight> {
    pub forward: &'a Csr<N, E>,
    pub backward: &'a Csr<N, WeightedEdge<W>>,
    pub forward_table: &'a AltTable<W>,
    pub backward_table: &'a AltTable<W>,
}

impl<'a, N, E, W> Router<W> for AltRouter<'a, N, E, W>
where
    E: HalfEdge<W>,
    W: Weight,
{
    fn route(&mut self, source: NodeId, target: NodeId, record_trace: bool) -> ShortestPathResult<W> {
        let mut forward_h = AltHeuristic::new(self.forward_table);
        let mut backward_h = AltHeuristic::new(self.backward_table);
        bidirectional_astar::search(
            self.forward,
            self.backward,
            &mut forward_h,
            &mut backward_h,
            source,
            target,
            record_trace,
        )
    }

    fn name(&self) -> &str {
        "alt"
    }
}

/// Unidirectional arc-flag Dijkstra, reading the target's partition off its
/// node payload.
pub struct ArcFlagRouter<'a, N, E> {
    pub graph: &'a Csr<N, E>,
}

impl<'a, N, E, W> Router<W> for ArcFlagRouter<'a, N, E>
where
    N: Partitioned,
    E: Flagged<W>,
    W: Weight,
{
    fn route(&mut self, source: NodeId, target: NodeId, record_trace: bool) -> ShortestPathResult<W> {
        let target_partition = self.graph.node(target).partition();
        arcflag::one_to_one(self.graph, source, target, target_partition, record_trace)
    }

    fn name(&self) -> &str {
        "arcflag-dijkstra"
    }
}

/// Arc-flag Dijkstra composed with a heuristic; arc-flag + ALT uses this
/// with an [`AltHeuristic`] built on the forward graph.
pub struct ArcFlagAStarRouter<'a, N, E, H> {
    pub graph: &'a Csr<N, E>,
    pub heuristic: H,
}

impl<'a, N, E, W, H> Router<W> for ArcFlagAStarRouter<'a, N, E, H>
where
    N: Partitioned,
    E: Flagged<W>,
    W: Weight,
    H: Heuristic<W>,
{
    fn route(&mut self, source: NodeId, target: NodeId, record_trace: bool) -> ShortestPathResult<W> {
        let target_partition = self.graph.node(target).partition();
        arcflag::astar(
            self.graph,
            &mut self.heuristic,
            source,
            target,
            target_partition,
            record_trace,
        )
    }

    fn name(&self) -> &str {
        "arcflag-astar"
    }
}

/// Bidirectional arc-flag Dijkstra over an independently flagged
/// forward/backward pair (spec.md §9 REDESIGN FLAG fix).
pub struct ArcFlagBidirectionalRouter<'a, N, E> {
    pub forward: &'a Csr<N, E>,
    pub backward: &'a Csr<N, E>,
}

impl<'a, N, E, W> Router<W> for ArcFlagBidirectionalRouter<'a, N, E>
where
    N: Partitioned,
    E: Flagged<W>,
    W: Weight,
{
    fn route(&mut self, source: NodeId, target: NodeId, record_trace: bool) -> ShortestPathResult<W> {
        let source_partition = self.forward.node(source).partition();
        let target_partition = self.forward.node(target).partition();
        arcflag::bidirectional(
            self.forward,
            self.backward,
            source,
            target,
            source_partition,
            target_partition,
            record_trace,
        )
    }

    fn name(&self) -> &str {
        "arcflag-bidirectional"
    }
}

pub struct TwoLevelArcFlagRouter<'a, N, E> {
    pub graph: &'a Csr<N, E>,
}

impl<'a, N, E, W> Router<W> for TwoLevelArcFlagRouter<'a, N, E>
where
    N: TwoLevelPartitioned,
    E: TwoLevelFlagged<W>,
    W: Weight,
{
    fn route(&mut self, source: NodeId, target: NodeId, record_trace: bool) -> ShortestPathResult<W> {
        let target_node = self.graph.node(target);
        let (l1_target, l2_target) = (target_node.l1(), target_node.l2());
        let graph = self.graph;
        arcflag::two_level(
            graph,
            source,
            target,
            |id: NodeId| graph.node(id).l1(),
            l1_target,
            l2_target,
            record_trace,
        )
    }

    fn name(&self) -> &str {
        "arcflag-two-level"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edge::WeightedEdge;
    use crate::graph::list::AdjacencyList;
    use crate::graph::node::Plain;
    use crate::heuristic::Zero;

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
    fn every_router_agrees_on_the_diamond() {
        let g = diamond();
        let t = g.transpose();

        let mut plain = DijkstraRouter { graph: &g };
        let mut astar = AStarRouter { graph: &g, heuristic: Zero };
        let mut bidir = BidirectionalRouter { forward: &g, backward: &t };
        let mut bidir_astar = BidirectionalAStarRouter {
            forward: &g,
            backward: &t,
            forward_heuristic: Zero,
            backward_heuristic: Zero,
        };

        let expected = plain.route(0, 3, false).length;
        assert_eq!(astar.route(0, 3, false).length, expected);
        assert_eq!(bidir.route(0, 3, false).length, expected);
        assert_eq!(bidir_astar.route(0, 3, false).length, expected);
    }

    #[test]
    fn arc_flag_bidirectional_router_matches_plain_dijkstra_on_directed_graph() {
        use crate::graph::edge::FlaggedEdge64;
        use crate::graph::node::PartitionedGeoPoint;
        use crate::preprocess::arcflags::{compute_arc_flags, flagged_transpose};

        let mut g: AdjacencyList<PartitionedGeoPoint, FlaggedEdge64<u32>> = AdjacencyList::new();
        g.append_node(PartitionedGeoPoint::new(0.0, 0.0, 0));
        g.append_node(PartitionedGeoPoint::new(0.0, 1.0, 0));
        g.append_node(PartitionedGeoPoint::new(1.0, 0.0, 1));
        g.append_node(PartitionedGeoPoint::new(1.0, 1.0, 1));
        g.insert_edge(0, FlaggedEdge64::new(1, 2));
        g.insert_edge(0, FlaggedEdge64::new(2, 9));
        g.insert_edge(1, FlaggedEdge64::new(3, 2));
        g.insert_edge(2, FlaggedEdge64::new(3, 1));
        let raw_forward = g.freeze();

        let raw_backward = flagged_transpose(&raw_forward);
        let flagged_forward = compute_arc_flags(&raw_forward, &raw_backward, 2);
        let flagged_backward = compute_arc_flags(&raw_backward, &raw_forward, 2);

        let mut bidir_arcflag = ArcFlagBidirectionalRouter {
            forward: &flagged_forward,
            backward: &flagged_backward,
        };
        let mut plain = DijkstraRouter { graph: &raw_forward };

        let expected = plain.route(0, 3, false).length;
        assert_eq!(bidir_arcflag.route(0, 3, false).length, expected);
    }
}
