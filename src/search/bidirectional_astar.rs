//! Bidirectional A\*: Pohl's symmetric approach with Kwa's staged-meeting
//! refinement (spec.md §4.5).
//!
//! Grounded on `original_source/algorithms/shortest_path/bi_a_star.go`,
//! which — unlike its plain-Dijkstra sibling — correctly searches the
//! backward frontier on the transpose graph throughout.

use crate::graph::csr::Csr;
use crate::graph::edge::WeightedEdge;
use crate::graph::{HalfEdge, NodeId, Weight, NONE};
use crate::heuristic::Heuristic;
use crate::queue::IndexedHeap;

use super::{SearchState, ShortestPathResult, Tracer};

#[allow(clippy::too_many_arguments)]
pub fn search<N, E, W, HF, HB>(
    forward_graph: &Csr<N, E>,
    backward_graph: &Csr<N, WeightedEdge<W>>,
    forward_heuristic: &mut HF,
    backward_heuristic: &mut HB,
    source: NodeId,
    target: NodeId,
    record_trace: bool,
) -> ShortestPathResult<W>
where
    E: HalfEdge<W>,
    W: Weight,
    HF: Heuristic<W>,
    HB: Heuristic<W>,
{
    if source == target {
        return ShortestPathResult {
            length: Some(W::ZERO),
            path: vec![source],
            pq_pops: 0,
            trace: Tracer::new(record_trace).into_inner(),
        };
    }

    forward_heuristic.init(source, target);
    backward_heuristic.init(target, source);

    let n = forward_graph.node_count();
    let mut forward: SearchState<W> = SearchState::new(n);
    let mut backward: SearchState<W> = SearchState::new(n);
    let mut forward_heap: IndexedHeap<W> = IndexedHeap::with_capacity(n);
    let mut backward_heap: IndexedHeap<W> = IndexedHeap::with_capacity(n);
    let mut tracer = Tracer::new(record_trace);

    forward.relax(source, W::ZERO, NONE);
    forward_heap.push(source, forward_heuristic.evaluate(source));
    backward.relax(target, W::ZERO, NONE);
    backward_heap.push(target, backward_heuristic.evaluate(target));

    let mut mu = W::MAX;
    let mut mid = NONE;
    let mut pq_pops = 0u64;

    while !forward_heap.is_empty() && !backward_heap.is_empty() {
        let (f_node, f_priority) = forward_heap.pop_min().unwrap();
        forward.settle(f_node);
        let (b_node, b_priority) = backward_heap.pop_min().unwrap();
        backward.settle(b_node);
        pq_pops += 2;
        tracer.record(f_node);
        tracer.record(b_node);

        if f_priority >= mu {
            break;
        }

        let g_f = forward.dist(f_node);
        for edge in forward_graph.edges_from(f_node) {
            let v = edge.to();
            let candidate = g_f.saturating_add(edge.weight());
            let staged = mu != W::MAX && backward.is_settled(v);
            if staged {
                if candidate < forward.dist(v) {
                    forward.relax(v, candidate, f_node);
                }
            } else if candidate < forward.dist(v) {
                forward.relax(v, candidate, f_node);
                let f = candidate.saturating_add(forward_heuristic.evaluate(v));
                forward_heap.push_or_decrease(v, f);
            }
            if backward.get(v).predecessor != NONE || v == target {
                let joined = candidate.saturating_add(backward.dist(v));
                if joined < mu {
                    mu = joined;
                    mid = v;
                }
            }
        }

        if b_priority >= mu {
            break;
        }

        let g_b = backward.dist(b_node);
        for edge in backward_graph.edges_from(b_node) {
            let v = edge.to();
            let candidate = g_b.saturating_add(edge.weight());
            let staged = mu != W::MAX && forward.is_settled(v);
            if staged {
                if candidate < backward.dist(v) {
                    backward.relax(v, candidate, b_node);
                }
            } else if candidate < backward.dist(v) {
                backward.relax(v, candidate, b_node);
                let f = candidate.saturating_add(backward_heuristic.evaluate(v));
                backward_heap.push_or_decrease(v, f);
            }
            if forward.get(v).predecessor != NONE || v == source {
                let joined = forward.dist(v).saturating_add(candidate);
                if joined < mu {
                    mu = joined;
                    mid = v;
                }
            }
        }
    }

    if mid == NONE || mu == W::MAX {
        return ShortestPathResult::unreachable(pq_pops, tracer.into_inner());
    }

    let mut path = forward.reconstruct_path(source, mid);
    let mut backward_half = backward.reconstruct_path(target, mid);
    backward_half.reverse();
    path.extend(backward_half.into_iter().skip(1));

    ShortestPathResult {
        length: Some(mu),
        path,
        pq_pops,
        trace: tracer.into_inner(),
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
    fn zero_heuristics_match_plain_dijkstra() {
        let g = diamond();
        let t = g.transpose();
        let mut hf = Zero;
        let mut hb = Zero;
        let result = search(&g, &t, &mut hf, &mut hb, 0, 3, false);
        assert_eq!(result.length, Some(15));
    }

    #[test]
    fn trivial_source_equals_target() {
        let g = diamond();
        let t = g.transpose();
        let mut hf = Zero;
        let mut hb = Zero;
        let result = search(&g, &t, &mut hf, &mut hb, 2, 2, false);
        assert_eq!(result.length, Some(0));
        assert_eq!(result.pq_pops, 0);
    }
}
