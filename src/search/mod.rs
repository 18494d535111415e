//! Shared search-state and result types used by every algorithm in this
//! module. Each query allocates its own [`SearchState`] and [`IndexedHeap`]
//! and releases them at query end; nothing here is shared across queries
//! except the graph itself (spec.md §5).

pub mod astar;
pub mod bidirectional;
pub mod bidirectional_astar;
pub mod arcflag;
pub mod dijkstra;

use crate::graph::{NodeId, Weight, NONE};

/// One slot of dense, per-node search state. `predecessor == NONE` means
/// "not yet reached". `heap_index` doubles up as the node's slot in the
/// caller's [`crate::queue::IndexedHeap`] via that structure's own internal
/// `position` table — kept here anyway as authoritative per-node cost so
/// the heap and the settled-set stay in sync without a second lookup.
#[derive(Debug, Copy)]
pub struct SearchItem<W: Weight> {
    pub g: W,
    pub predecessor: NodeId,
    pub settled: bool,
}

impl<W: Weight> SearchItem<W> {
    fn unreached() -> Self {
        Self {
            g: W::MAX,
            predecessor: NONE,
            settled: false,
        }
    }
}

/// Dense `Vec<SearchItem<W>>` indexed by [`NodeId`], one per query.
pub struct SearchState<W: Weight> {
    items: Vec<SearchItem<W>>,
}

impl<W: Weight> SearchState<W> {
    pub fn new(node_count: usize) -> Self {
        Self {
            items: vec![SearchItem::unreached(); node_count],
        }
    }

    pub fn get(&self, node: NodeId) -> &SearchItem<W> {
        &self.items[node as usize]
    }

    pub fn dist(&self, node: NodeId) -> W {
        self.items[node as usize].g
    }

    pub fn is_settled(&self, node: NodeId) -> bool {
        self.items[node as usize].settled
    }

    pub fn relax(&mut self, node: NodeId, g: W, predecessor: NodeId) {
        let item = &mut self.items[node as usize];
        item.g = g;
        item.predecessor = predecessor;
    }

    pub fn settle(&mut self, node: NodeId) {
        self.items[node as usize].settled = true;
    }

    /// Walks `predecessor` pointers from `target` back to `source`,
    /// returning the path in source-to-target order. Panics if `target`
    /// was never reached; callers must check reachability first.
    pub fn reconstruct_path(&self, source: NodeId, target: NodeId) -> Vec<NodeId> {
        let mut path = vec![target];
        let mut current = target;
        while current != source {
            current = self.items[current as usize].predecessor;
            debug_assert_ne!(current, NONE, "broken predecessor chain");
            path.push(current);
        }
        path.reverse();
        path
    }
}

impl<W: Weight> Clone for SearchItem<W> {
    fn clone(&self) -> Self {
        *self
    }
}

/// Result of a point-to-point query. `length` is `None` iff `target` is
/// unreachable from `source` (spec.md's `-1` sentinel, made explicit).
#[derive(Debug, Clone)]
pub struct ShortestPathResult<W> {
    pub length: Option<W>,
    pub path: Vec<NodeId>,
    pub pq_pops: u64,
    /// Present only when the caller asked to `record_trace`: every node
    /// popped from the priority queue, in pop order. Useful for debugging
    /// and for the "arc-flag prunes more than plain Dijkstra" property
    /// test, not populated on the hot path otherwise.
    pub trace: Option<Vec<NodeId>>,
}

impl<W: Weight> ShortestPathResult<W> {
    pub fn unreachable(pq_pops: u64, trace: Option<Vec<NodeId>>) -> Self {
        Self {
            length: None,
            path: Vec::new(),
            pq_pops,
            trace,
        }
    }
}

/// Result of a one-to-all search: per-node distance and predecessor,
/// `NONE`/unreached where the node wasn't visited.
#[derive(Debug, Clone)]
pub struct OneToAllResult<W> {
    pub lengths: Vec<Option<W>>,
    pub predecessors: Vec<NodeId>,
}

/// A trace recorder, threaded through the search loops so the hot path
/// only pays for a `Vec::push` when a caller actually asked for it.
pub(crate) struct Tracer {
    trace: Option<Vec<NodeId>>,
}

impl Tracer {
    pub(crate) fn new(record: bool) -> Self {
        Self {
            trace: record.then(Vec::new),
        }
    }

    pub(crate) fn record(&mut self, node: NodeId) {
        if let Some(trace) = &mut self.trace {
            trace.push(node);
        }
    }

    pub(crate) fn into_inner(self) -> Option<Vec<NodeId>> {
        self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstruct_path_reverses_predecessor_chain() {
        let mut state: SearchState<u32> = SearchState::new(4);
        state.relax(0, 0, NONE);
        state.relax(1, 1, 0);
        state.relax(2, 2, 1);
        assert_eq!(state.reconstruct_path(0, 2), vec![0, 1, 2]);
    }

    #[test]
    fn unreached_item_has_sentinel_predecessor() {
        let state: SearchState<u32> = SearchState::new(3);
        assert_eq!(state.get(1).predecessor, NONE);
        assert!(!state.is_settled(1));
    }
}
