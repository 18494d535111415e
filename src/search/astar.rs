//! A\* search: identical relaxation structure to plain Dijkstra, but keyed
//! on `f = g + h` and willing to reopen settled nodes when the heuristic is
//! admissible-but-inconsistent (spec.md §4.3).
//!
//! Grounded on `original_source/algorithms/shortest_path/a_star.go`: note
//! that file never checks a "settled" flag before relaxing — a successor
//! already popped can still have its distance improved, which is exactly
//! the reopening behaviour ALT relies on.

use crate::graph::csr::Csr;
use crate::graph::{HalfEdge, NodeId, Weight, NONE};
use crate::heuristic::Heuristic;
use crate::queue::IndexedHeap;

use super::{SearchState, ShortestPathResult, Tracer};

pub fn search<N, E, W, H>(
    graph: &Csr<N, E>,
    heuristic: &mut H,
    source: NodeId,
    target: NodeId,
    record_trace: bool,
) -> ShortestPathResult<W>
where
    E: HalfEdge<W>,
    W: Weight,
    H: Heuristic<W>,
{
    heuristic.init(source, target);

    let mut state: SearchState<W> = SearchState::new(graph.node_count());
    let mut heap: IndexedHeap<W> = IndexedHeap::with_capacity(graph.node_count());
    let mut tracer = Tracer::new(record_trace);
    let mut pq_pops = 0u64;

    if source == target {
        return ShortestPathResult {
            length: Some(W::ZERO),
            path: vec![source],
            pq_pops: 0,
            trace: tracer.into_inner(),
        };
    }

    state.relax(source, W::ZERO, NONE);
    heap.push(source, heuristic.evaluate(source));

    while let Some((u, _)) = heap.pop_min() {
        pq_pops += 1;
        tracer.record(u);

        let g_u = state.dist(u);

        if u == target {
            return ShortestPathResult {
                length: Some(g_u),
                path: state.reconstruct_path(source, target),
                pq_pops,
                trace: tracer.into_inner(),
            };
        }

        for edge in graph.edges_from(u) {
            let v = edge.to();
            let candidate_g = g_u.saturating_add(edge.weight());
            if candidate_g < state.dist(v) {
                state.relax(v, candidate_g, u);
                let f = candidate_g.saturating_add(heuristic.evaluate(v));
                heap.push_or_decrease(v, f);
            }
        }
    }

    ShortestPathResult::unreachable(pq_pops, tracer.into_inner())
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
    fn zero_heuristic_matches_dijkstra() {
        let g = diamond();
        let mut h = Zero;
        let result: ShortestPathResult<u32> = search(&g, &mut h, 0, 3, false);
        assert_eq!(result.length, Some(15));
    }

    #[test]
    fn source_equals_target_is_trivial() {
        let g = diamond();
        let mut h = Zero;
        let result: ShortestPathResult<u32> = search(&g, &mut h, 2, 2, false);
        assert_eq!(result.length, Some(0));
        assert_eq!(result.pq_pops, 0);
    }
}
