//! Flat compressed-sparse-row (CSR) graph: the query-time layout.
//!
//! Grounded on `original_source/graph/adjacency_array.go`: one flat `Vec<E>`
//! of edges segmented by an `offsets` array, `offsets[i]..offsets[i+1]`
//! giving node `i`'s leaving edges. Frozen once built — there is no insert
//! path here, only [`AdjacencyList::freeze`](super::list::AdjacencyList::freeze).

use super::list::AdjacencyList;
use super::edge::WeightedEdge;
use super::{HalfEdge, NodeId, Weight};
use crate::error::GraphError;

/// A frozen, query-ready graph.
#[derive(Debug, Clone)]
pub struct Csr<N, E> {
    nodes: Vec<N>,
    edges: Vec<E>,
    offsets: Vec<u32>,
}

impl<N, E: Copy> Csr<N, E> {
    /// Builds a CSR graph directly from parallel node/edge/offset arrays,
    /// as produced by the `.fmi` loader or the binary snapshot decoder.
    /// `offsets` must have `nodes.len() + 1` entries and be non-decreasing.
    pub fn from_parts(nodes: Vec<N>, edges: Vec<E>, offsets: Vec<u32>) -> Self {
        debug_assert_eq!(offsets.len(), nodes.len() + 1);
        debug_assert_eq!(*offsets.last().unwrap_or(&0), edges.len() as u32);
        Self {
            nodes,
            edges,
            offsets,
        }
    }

    pub(super) fn from_adjacency_list(list: AdjacencyList<N, E>) -> Self {
        let (nodes, bucketed) = list.into_parts();
        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut edges = Vec::with_capacity(bucketed.iter().map(|b| b.len()).sum());
        offsets.push(0u32);
        for bucket in bucketed {
            edges.extend(bucket);
            offsets.push(edges.len() as u32);
        }
        Self {
            nodes,
            edges,
            offsets,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn all_edges(&self) -> &[E] {
        &self.edges
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Bounds-checked node lookup. Use at system boundaries (file loaders,
    /// CLI argument validation); internal search code uses [`Csr::node`]
    /// directly since those ids are always produced in range.
    pub fn try_node(&self, id: NodeId) -> Result<&N, GraphError> {
        self.nodes.get(id as usize).ok_or(GraphError::NodeOutOfRange {
            id,
            node_count: self.nodes.len() as u32,
        })
    }

    /// Bounds-checked edge-segment lookup, see [`Csr::try_node`].
    pub fn try_edges_from(&self, id: NodeId) -> Result<&[E], GraphError> {
        let start = *self
            .offsets
            .get(id as usize)
            .ok_or(GraphError::NodeOutOfRange {
                id,
                node_count: self.nodes.len() as u32,
            })? as usize;
        let end = self.offsets[id as usize + 1] as usize;
        Ok(&self.edges[start..end])
    }

    /// Direct node lookup, panics on an out-of-range id. Internal search
    /// loops only ever see ids produced by this same graph, so the bound is
    /// an invariant rather than a condition to propagate.
    pub fn node(&self, id: NodeId) -> &N {
        &self.nodes[id as usize]
    }

    /// Direct edge-segment lookup, see [`Csr::node`].
    pub fn edges_from(&self, id: NodeId) -> &[E] {
        let start = self.offsets[id as usize] as usize;
        let end = self.offsets[id as usize + 1] as usize;
        &self.edges[start..end]
    }

    fn edge_buckets(&self) -> impl Iterator<Item = (NodeId, &[E])> {
        (0..self.node_count() as NodeId).map(move |id| (id, self.edges_from(id)))
    }
}

impl<N, E> Csr<N, E>
where
    N: Clone,
{
    /// Builds the transpose graph: every edge `u -> v` in `self` becomes
    /// `v -> u` in the result, weight preserved, any arc-flag payload
    /// dropped. Used for backward Dijkstra searches (bidirectional
    /// Dijkstra/A*, reverse landmark searches, reverse shortest-path trees
    /// during arc-flag preprocessing) where only reachability and weight
    /// matter, not flags.
    pub fn transpose<W>(&self) -> Csr<N, WeightedEdge<W>>
    where
        E: HalfEdge<W>,
        W: Weight,
    {
        let n = self.node_count();
        let mut degree = vec![0u32; n];
        for e in &self.edges {
            degree[e.to() as usize] += 1;
        }
        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0u32);
        for d in &degree {
            offsets.push(offsets.last().unwrap() + d);
        }
        let mut cursor = offsets.clone();
        let mut edges = vec![WeightedEdge::new(0, W::ZERO); self.edges.len()];
        for (tail, bucket) in self.edge_buckets() {
            for e in bucket {
                let head = e.to();
                let slot = cursor[head as usize] as usize;
                edges[slot] = WeightedEdge::new(tail, e.weight());
                cursor[head as usize] += 1;
            }
        }
        Csr {
            nodes: self.nodes.clone(),
            edges,
            offsets,
        }
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
        g.insert_edge(0, WeightedEdge::new(1, 1));
        g.insert_edge(0, WeightedEdge::new(2, 4));
        g.insert_edge(1, WeightedEdge::new(3, 2));
        g.insert_edge(2, WeightedEdge::new(3, 1));
        g.freeze()
    }

    #[test]
    fn freeze_preserves_edges() {
        let g = diamond();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.edges_from(0).len(), 2);
        assert_eq!(g.edges_from(3).len(), 0);
    }

    #[test]
    fn try_node_reports_out_of_range() {
        let g = diamond();
        assert!(g.try_node(10).is_err());
        assert!(g.try_node(0).is_ok());
    }

    #[test]
    fn transpose_reverses_every_edge() {
        let g = diamond();
        let t = g.transpose();
        assert_eq!(t.edges_from(3).len(), 2);
        assert_eq!(t.edges_from(0).len(), 0);
        let into_three: Vec<_> = t.edges_from(3).iter().map(|e| (e.to, e.weight)).collect();
        assert!(into_three.contains(&(1, 2)));
        assert!(into_three.contains(&(2, 1)));
    }

}
