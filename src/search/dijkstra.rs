//! Plain Dijkstra: one-to-one, one-to-all, and shortest-path-tree variants.
//!
//! `original_source/algorithms/shortest_path/dijkstra.go` itself was
//! stripped down to a signature by the distillation that produced this
//! crate's specification; `shortest_path_tree.go` survived intact and is
//! the real grounding for the relaxation loop below (same lazy
//! decrease-key structure, generalised to plain single-predecessor
//! Dijkstra as the common case and SPT as the predecessor-set case).

use crate::graph::csr::Csr;
use crate::graph::{HalfEdge, NodeId, Weight, NONE};
use crate::queue::IndexedHeap;

use super::{OneToAllResult, SearchState, ShortestPathResult, Tracer};

/// One-to-one shortest path. Terminates as soon as `target` is popped.
pub fn one_to_one<N, E, W>(
    graph: &Csr<N, E>,
    source: NodeId,
    target: NodeId,
    record_trace: bool,
) -> ShortestPathResult<W>
where
    E: HalfEdge<W>,
    W: Weight,
{
    let mut state: SearchState<W> = SearchState::new(graph.node_count());
    let mut heap: IndexedHeap<W> = IndexedHeap::with_capacity(graph.node_count());
    let mut tracer = Tracer::new(record_trace);
    let mut pq_pops = 0u64;

    state.relax(source, W::ZERO, NONE);
    heap.push(source, W::ZERO);

    if source == target {
        return ShortestPathResult {
            length: Some(W::ZERO),
            path: vec![source],
            pq_pops: 0,
            trace: tracer.into_inner(),
        };
    }

    while let Some((u, g_u)) = heap.pop_min() {
        pq_pops += 1;
        tracer.record(u);
        state.settle(u);

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
            if state.is_settled(v) {
                continue;
            }
            let candidate = g_u.saturating_add(edge.weight());
            if candidate < state.dist(v) {
                state.relax(v, candidate, u);
                heap.push_or_decrease(v, candidate);
            }
        }
    }

    ShortestPathResult::unreachable(pq_pops, tracer.into_inner())
}

/// One-to-all shortest paths from `source`. No early termination.
pub fn one_to_all<N, E, W>(graph: &Csr<N, E>, source: NodeId) -> OneToAllResult<W>
where
    E: HalfEdge<W>,
    W: Weight,
{
    let mut state: SearchState<W> = SearchState::new(graph.node_count());
    let mut heap: IndexedHeap<W> = IndexedHeap::with_capacity(graph.node_count());

    state.relax(source, W::ZERO, NONE);
    heap.push(source, W::ZERO);

    while let Some((u, g_u)) = heap.pop_min() {
        state.settle(u);
        for edge in graph.edges_from(u) {
            let v = edge.to();
            if state.is_settled(v) {
                continue;
            }
            let candidate = g_u.saturating_add(edge.weight());
            if candidate < state.dist(v) {
                state.relax(v, candidate, u);
                heap.push_or_decrease(v, candidate);
            }
        }
    }

    let mut lengths = Vec::with_capacity(graph.node_count());
    let mut predecessors = Vec::with_capacity(graph.node_count());
    for id in 0..graph.node_count() as NodeId {
        let item = state.get(id);
        lengths.push(if item.predecessor != NONE || id == source {
            Some(item.g)
        } else {
            None
        });
        predecessors.push(item.predecessor);
    }
    OneToAllResult {
        lengths,
        predecessors,
    }
}

/// A node of a [`ShortestPathTree`]: owns its children by index into the
/// tree's flat array rather than by pointer, so the DAG shape that arises
/// from tied shortest paths never needs reference counting (spec.md §9).
#[derive(Debug, Clone)]
pub struct SptNode {
    pub id: NodeId,
    pub children: Vec<u32>,
    visited: bool,
}

/// Output of [`shortest_path_tree`]: a DAG rooted at `root`, since ties in
/// shortest-path length fan a node out to multiple predecessors. Arc-flag
/// preprocessing walks every (parent, child) pair via [`ShortestPathTree::edges`]
/// to flag the corresponding original-graph edge.
pub struct ShortestPathTree {
    pub root: NodeId,
    nodes: Vec<SptNode>,
    index_of: Vec<u32>,
}

impl ShortestPathTree {
    fn index(&self, id: NodeId) -> u32 {
        self.index_of[id as usize]
    }

    /// Iterates every (parent, child) tree edge via a single-pass stack
    /// traversal from the root. Each node's `visited` flag guards against
    /// revisiting it through more than one parent — it is always fresh
    /// because a `ShortestPathTree` is single-use, built once per search.
    pub fn edges(&mut self) -> Vec<(NodeId, NodeId)> {
        let mut out = Vec::new();
        self.walk_until(|_| false, |parent, child| out.push((parent, child)));
        out
    }

    /// Single-pass stack traversal from the root, like [`ShortestPathTree::edges`],
    /// but lets the caller prune descent into a child: `stop_descent(child)`
    /// returning `true` means "record this tree edge but do not walk past
    /// `child`". Used by arc-flag preprocessing to stop a backward search
    /// once it re-enters the boundary node's own partition (spec.md §4.8).
    pub fn walk_until(
        &mut self,
        mut stop_descent: impl FnMut(NodeId) -> bool,
        mut visit: impl FnMut(NodeId, NodeId),
    ) {
        let root_idx = self.index(self.root);
        self.nodes[root_idx as usize].visited = true;
        let mut stack = vec![root_idx];
        while let Some(idx) = stack.pop() {
            let parent_id = self.nodes[idx as usize].id;
            let children = self.nodes[idx as usize].children.clone();
            for child_idx in children {
                let child_id = self.nodes[child_idx as usize].id;
                visit(parent_id, child_id);
                if !self.nodes[child_idx as usize].visited {
                    self.nodes[child_idx as usize].visited = true;
                    if !stop_descent(child_id) {
                        stack.push(child_idx);
                    }
                }
            }
        }
    }
}

/// Shortest-path tree from `source`: tracks every predecessor tied for
/// minimum distance, not just one. Used exclusively by the arc-flag
/// preprocessor (spec.md §4.2).
pub fn shortest_path_tree<N, E, W>(graph: &Csr<N, E>, source: NodeId) -> ShortestPathTree
where
    E: HalfEdge<W>,
    W: Weight,
{
    let node_count = graph.node_count();
    let mut dist = vec![W::MAX; node_count];
    let mut predecessors: Vec<Vec<NodeId>> = vec![Vec::new(); node_count];
    let mut reached = vec![false; node_count];
    let mut heap: IndexedHeap<W> = IndexedHeap::with_capacity(node_count);

    dist[source as usize] = W::ZERO;
    reached[source as usize] = true;
    heap.push(source, W::ZERO);

    let mut settled = vec![false; node_count];

    while let Some((u, g_u)) = heap.pop_min() {
        settled[u as usize] = true;
        for edge in graph.edges_from(u) {
            let v = edge.to();
            if settled[v as usize] {
                continue;
            }
            let candidate = g_u.saturating_add(edge.weight());
            if !reached[v as usize] {
                reached[v as usize] = true;
                dist[v as usize] = candidate;
                predecessors[v as usize] = vec![u];
                heap.push(v, candidate);
            } else if candidate < dist[v as usize] {
                dist[v as usize] = candidate;
                predecessors[v as usize] = vec![u];
                heap.push_or_decrease(v, candidate);
            } else if candidate == dist[v as usize] {
                predecessors[v as usize].push(u);
            }
        }
    }

    build_tree(source, &predecessors, &reached)
}

/// Like [`shortest_path_tree`], but stops expanding the frontier once
/// `stop` returns `true` for the most recently settled node. Used by
/// two-level arc-flag preprocessing to bound an L2 boundary node's backward
/// search to roughly the size of its own L1 partition (spec.md §4.8),
/// grounded on `prundedShortestPathTree` in
/// `original_source/algorithms/shortest_path/two_level_arc_flag_preprocessing.go`.
pub fn shortest_path_tree_pruned<N, E, W>(
    graph: &Csr<N, E>,
    source: NodeId,
    mut stop: impl FnMut(NodeId) -> bool,
) -> ShortestPathTree
where
    E: HalfEdge<W>,
    W: Weight,
{
    let node_count = graph.node_count();
    let mut dist = vec![W::MAX; node_count];
    let mut predecessors: Vec<Vec<NodeId>> = vec![Vec::new(); node_count];
    let mut reached = vec![false; node_count];
    let mut heap: IndexedHeap<W> = IndexedHeap::with_capacity(node_count);

    dist[source as usize] = W::ZERO;
    reached[source as usize] = true;
    heap.push(source, W::ZERO);

    let mut settled = vec![false; node_count];

    while let Some((u, g_u)) = heap.pop_min() {
        settled[u as usize] = true;
        for edge in graph.edges_from(u) {
            let v = edge.to();
            if settled[v as usize] {
                continue;
            }
            let candidate = g_u.saturating_add(edge.weight());
            if !reached[v as usize] {
                reached[v as usize] = true;
                dist[v as usize] = candidate;
                predecessors[v as usize] = vec![u];
                heap.push(v, candidate);
            } else if candidate < dist[v as usize] {
                dist[v as usize] = candidate;
                predecessors[v as usize] = vec![u];
                heap.push_or_decrease(v, candidate);
            } else if candidate == dist[v as usize] {
                predecessors[v as usize].push(u);
            }
        }
        if stop(u) {
            break;
        }
    }

    build_tree(source, &predecessors, &reached)
}

fn build_tree(source: NodeId, predecessors: &[Vec<NodeId>], reached: &[bool]) -> ShortestPathTree {
    let node_count = reached.len();
    let mut index_of = vec![NONE; node_count];
    let mut nodes = Vec::new();
    for id in 0..node_count as NodeId {
        if reached[id as usize] {
            index_of[id as usize] = nodes.len() as u32;
            nodes.push(SptNode {
                id,
                children: Vec::new(),
                visited: false,
            });
        }
    }
    for id in 0..node_count as NodeId {
        if !reached[id as usize] || id == source {
            continue;
        }
        let child_idx = index_of[id as usize];
        for &pred in &predecessors[id as usize] {
            let parent_idx = index_of[pred as usize];
            nodes[parent_idx as usize].children.push(child_idx);
        }
    }
    ShortestPathTree {
        root: source,
        nodes,
        index_of,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edge::WeightedEdge;
    use crate::graph::list::AdjacencyList;
    use crate::graph::node::Plain;

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

    fn linear_chain() -> Csr<Plain, WeightedEdge<u32>> {
        let mut g: AdjacencyList<Plain, WeightedEdge<u32>> = AdjacencyList::new();
        for _ in 0..4 {
            g.append_node(Plain);
        }
        g.insert_edge(0, WeightedEdge::new(1, 1));
        g.insert_edge(1, WeightedEdge::new(2, 1));
        g.insert_edge(2, WeightedEdge::new(3, 1));
        g.freeze()
    }

    #[test]
    fn diamond_shortest_path_is_fifteen() {
        let g = diamond();
        let result: ShortestPathResult<u32> = one_to_one(&g, 0, 3, false);
        assert_eq!(result.length, Some(15));
        assert_eq!(result.path.first(), Some(&0));
        assert_eq!(result.path.last(), Some(&3));
    }

    #[test]
    fn linear_chain_distance_and_reverse_unreachable() {
        let g = linear_chain();
        let forward: ShortestPathResult<u32> = one_to_one(&g, 0, 3, false);
        assert_eq!(forward.length, Some(3));
        let backward: ShortestPathResult<u32> = one_to_one(&g, 3, 0, false);
        assert_eq!(backward.length, None);
        assert!(backward.path.is_empty());
    }

    #[test]
    fn disconnected_components_are_unreachable() {
        let mut g: AdjacencyList<Plain, WeightedEdge<u32>> = AdjacencyList::new();
        for _ in 0..4 {
            g.append_node(Plain);
        }
        g.insert_edge(0, WeightedEdge::new(1, 1));
        g.insert_edge(2, WeightedEdge::new(3, 1));
        let g = g.freeze();
        let result: ShortestPathResult<u32> = one_to_one(&g, 0, 2, false);
        assert_eq!(result.length, None);
        assert!(result.path.is_empty());
    }

    #[test]
    fn single_node_query_is_trivial() {
        let g = diamond();
        let result: ShortestPathResult<u32> = one_to_one(&g, 0, 0, false);
        assert_eq!(result.length, Some(0));
        assert_eq!(result.path, vec![0]);
        assert_eq!(result.pq_pops, 0);
    }

    #[test]
    fn one_to_all_matches_one_to_one() {
        let g = diamond();
        let all: OneToAllResult<u32> = one_to_all(&g, 0);
        assert_eq!(all.lengths[3], Some(15));
        assert_eq!(all.lengths[0], Some(0));
    }

    #[test]
    fn shortest_path_tree_contains_both_diamond_branches() {
        let g = diamond();
        let mut tree = shortest_path_tree(&g, 0);
        let edges = tree.edges();
        assert!(edges.contains(&(0, 1)));
        assert!(edges.contains(&(0, 2)));
        assert!(edges.contains(&(1, 3)));
        assert!(edges.contains(&(2, 3)));
    }
}
