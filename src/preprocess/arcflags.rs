//! Arc-flag preprocessing: single-level and two-level variants.
//!
//! Grounded on `original_source/algorithms/shortest_path/arc_flag_preprocessing.go`
//! and `two_level_arc_flag_preprocessing.go`. Both run a backward search
//! from every boundary node on the *transpose* graph and flag the forward
//! edge matching each discovered tree edge. The Go source uses a bounded
//! pool of producer goroutines feeding flag jobs through a buffered channel
//! to a single consumer that owns the mutable edge array; that shape is
//! kept here with `std::thread` + `std::sync::mpsc`, the channel-of-permits
//! standing in for the `guard := make(chan struct{}, MAX_GOROUTINES)`
//! semaphore. ALT's landmark searches ([`super::alt`]) have no shared
//! mutable target and use `rayon` instead, following `step7.rs`'s
//! parallel-independent-work style.

use std::sync::mpsc;
use std::thread;

use rustc_hash::FxHashSet;

use crate::graph::csr::Csr;
use crate::graph::list::AdjacencyList;
use crate::graph::{
    Flagged, HalfEdge, NodeId, PartitionId, Partitioned, TwoLevelFlagged, TwoLevelPartitioned,
    Weight,
};
use crate::search::dijkstra;

/// Builds a same-typed, zero-flagged transpose of `forward`: every edge
/// `u -> v` becomes `v -> u`, flags cleared. [`Csr::transpose`] can't be
/// reused here because it drops arc-flag payloads down to `WeightedEdge`,
/// but [`compute_arc_flags`] needs a transpose carrying the *same* edge
/// type so it can be independently preprocessed (search/arcflag.rs's
/// directed-graph fix relies on forward and backward each having their own
/// flags rather than sharing one edge's).
pub fn flagged_transpose<N, E, W>(forward: &Csr<N, E>) -> Csr<N, E>
where
    N: Clone,
    E: Flagged<W> + Clone,
    W: Weight,
{
    let mut list: AdjacencyList<N, E> = AdjacencyList::with_capacity(forward.node_count());
    for node in forward.nodes() {
        list.append_node(node.clone());
    }
    for tail in 0..forward.node_count() as NodeId {
        for edge in forward.edges_from(tail) {
            let mut reversed = edge.clone();
            reversed.reset_flags();
            list.insert_edge(edge.to(), reversed.with_to(tail));
        }
    }
    list.freeze()
}

/// Two-level counterpart of [`flagged_transpose`].
pub fn two_level_flagged_transpose<N, E, W>(forward: &Csr<N, E>) -> Csr<N, E>
where
    N: Clone,
    E: TwoLevelFlagged<W> + Clone,
    W: Weight,
{
    let mut list: AdjacencyList<N, E> = AdjacencyList::with_capacity(forward.node_count());
    for node in forward.nodes() {
        list.append_node(node.clone());
    }
    for tail in 0..forward.node_count() as NodeId {
        for edge in forward.edges_from(tail) {
            let mut reversed = edge.clone();
            reversed.reset_flags();
            list.insert_edge(edge.to(), reversed.with_to(tail));
        }
    }
    list.freeze()
}

/// Caps the number of concurrent backward-search producer threads, mirroring
/// `MAX_GOROUTINES` in `arc_flag_preprocessing.go`.
const MAX_WORKERS: usize = 8;

struct FlagJob {
    from: NodeId,
    to: NodeId,
    partition: PartitionId,
}

fn find_edge_mut<'a, E: HalfEdge<W>, W: Weight>(
    edges: &'a mut [E],
    offsets: &[u32],
    from: NodeId,
    to: NodeId,
) -> Option<&'a mut E> {
    let start = offsets[from as usize] as usize;
    let end = offsets[from as usize + 1] as usize;
    edges[start..end].iter_mut().find(|e| e.to() == to)
}

/// Computes single-level arc flags for `forward`, given its transpose.
/// `partition_count` must not exceed the edge type's flag width.
pub fn compute_arc_flags<N, E, W>(
    forward: &Csr<N, E>,
    transpose: &Csr<N, E>,
    partition_count: PartitionId,
) -> Csr<N, E>
where
    N: Partitioned + Clone + Sync,
    E: Flagged<W> + Clone + 'static,
    W: Weight,
{
    assert!(
        forward.edge_count() > 0,
        "cannot compute arc flags on an empty graph"
    );
    let flag_width = forward.all_edges()[0].flag_width();
    assert!(
        (partition_count as u32) <= flag_width,
        "partition count {partition_count} exceeds flag width {flag_width}"
    );

    let offsets = forward.offsets().to_vec();
    let nodes = forward.nodes().to_vec();
    let mut edges: Vec<E> = forward.all_edges().to_vec();
    for e in &mut edges {
        e.reset_flags();
    }

    let mut boundary_node_sets: Vec<FxHashSet<NodeId>> =
        (0..partition_count).map(|_| FxHashSet::default()).collect();
    for tail in 0..forward.node_count() as NodeId {
        let tail_partition = forward.node(tail).partition();
        for edge in forward.edges_from(tail) {
            let head_partition = forward.node(edge.to()).partition();
            if tail_partition != head_partition {
                boundary_node_sets[head_partition as usize].insert(edge.to());
            }
        }
    }
    for (partition, set) in boundary_node_sets.iter().enumerate() {
        tracing::info!(partition, size = set.len(), "arc-flag boundary nodes");
    }

    let (job_tx, job_rx) = mpsc::channel::<FlagJob>();
    let (permit_tx, permit_rx) = mpsc::sync_channel::<()>(MAX_WORKERS);
    for _ in 0..MAX_WORKERS {
        permit_tx.send(()).expect("permit channel just created");
    }

    let consumer = thread::spawn(move || {
        for job in job_rx {
            if let Some(edge) = find_edge_mut(&mut edges, &offsets, job.from, job.to) {
                edge.add_flag(job.partition);
            }
        }
        edges
    });

    thread::scope(|scope| {
        for (partition, set) in boundary_node_sets.into_iter().enumerate() {
            let partition = partition as PartitionId;
            for boundary_node in set {
                permit_rx.recv().expect("consumer outlives producers");
                let job_tx = job_tx.clone();
                let permit_tx = permit_tx.clone();
                scope.spawn(move || {
                    backward_search(transpose, forward, partition, boundary_node, &job_tx);
                    let _ = permit_tx.send(());
                });
            }
        }

        for tail in 0..forward.node_count() as NodeId {
            let tail_partition = forward.node(tail).partition();
            for edge in forward.edges_from(tail) {
                if forward.node(edge.to()).partition() == tail_partition {
                    let _ = job_tx.send(FlagJob {
                        from: tail,
                        to: edge.to(),
                        partition: tail_partition,
                    });
                }
            }
        }
    });
    drop(job_tx);

    let edges = consumer.join().expect("arc-flag consumer thread panicked");
    Csr::from_parts(nodes, edges, forward.offsets().to_vec())
}

fn backward_search<N, E, W>(
    transpose: &Csr<N, E>,
    forward: &Csr<N, E>,
    partition: PartitionId,
    boundary_node: NodeId,
    job_tx: &mpsc::Sender<FlagJob>,
) where
    N: Partitioned,
    E: Flagged<W>,
    W: Weight,
{
    let mut tree = dijkstra::shortest_path_tree(transpose, boundary_node);
    tree.walk_until(
        |child_id| forward.node(child_id).partition() == partition,
        |parent_id, child_id| {
            // A tree edge `parent -> child` in the transpose is the forward
            // edge `child -> parent`; that is the edge we flag.
            let _ = job_tx.send(FlagJob {
                from: child_id,
                to: parent_id,
                partition,
            });
        },
    );
}

struct TwoLevelFlagJob {
    from: NodeId,
    to: NodeId,
    partition: PartitionId,
    level: Level,
}

enum Level {
    L1,
    L2,
}

fn find_two_level_edge_mut<'a, E: HalfEdge<W>, W: Weight>(
    edges: &'a mut [E],
    offsets: &[u32],
    from: NodeId,
    to: NodeId,
) -> Option<&'a mut E> {
    find_edge_mut(edges, offsets, from, to)
}

/// Computes two-level arc flags: an L1 pass identical in shape to
/// [`compute_arc_flags`], followed by an L2 pass restricted to edges whose
/// endpoints share an L1 partition, whose backward searches are bounded by
/// [`dijkstra::shortest_path_tree_pruned`] once they have settled as many
/// nodes as the L1 partition contains.
pub fn compute_two_level_arc_flags<N, E, W>(
    forward: &Csr<N, E>,
    transpose: &Csr<N, E>,
    l1_partition_count: PartitionId,
) -> Csr<N, E>
where
    N: TwoLevelPartitioned + Clone + Sync,
    E: TwoLevelFlagged<W> + Clone + 'static,
    W: Weight,
{
    assert!(
        forward.edge_count() > 0,
        "cannot compute arc flags on an empty graph"
    );

    let offsets = forward.offsets().to_vec();
    let nodes = forward.nodes().to_vec();
    let mut edges: Vec<E> = forward.all_edges().to_vec();
    for e in &mut edges {
        e.reset_flags();
    }

    let mut l1_boundary: Vec<FxHashSet<NodeId>> =
        (0..l1_partition_count).map(|_| FxHashSet::default()).collect();
    let mut l2_boundary: Vec<FxHashSet<NodeId>> =
        (0..l1_partition_count).map(|_| FxHashSet::default()).collect();
    let mut l1_partition_size: Vec<usize> = vec![0; l1_partition_count as usize];
    for node in forward.nodes() {
        l1_partition_size[node.l1() as usize] += 1;
    }

    for tail in 0..forward.node_count() as NodeId {
        let tail_node = forward.node(tail);
        for edge in forward.edges_from(tail) {
            let head_node = forward.node(edge.to());
            if tail_node.l1() != head_node.l1() {
                l1_boundary[head_node.l1() as usize].insert(edge.to());
                l2_boundary[head_node.l1() as usize].insert(edge.to());
            } else if tail_node.l2() != head_node.l2() {
                l2_boundary[head_node.l1() as usize].insert(edge.to());
            }
        }
    }

    let (job_tx, job_rx) = mpsc::channel::<TwoLevelFlagJob>();
    let (permit_tx, permit_rx) = mpsc::sync_channel::<()>(MAX_WORKERS);
    for _ in 0..MAX_WORKERS {
        permit_tx.send(()).expect("permit channel just created");
    }

    let consumer = thread::spawn(move || {
        for job in job_rx {
            if let Some(edge) = find_two_level_edge_mut(&mut edges, &offsets, job.from, job.to) {
                match job.level {
                    Level::L1 => edge.add_l1_flag(job.partition),
                    Level::L2 => edge.add_l2_flag(job.partition),
                }
            }
        }
        edges
    });

    thread::scope(|scope| {
        for (l1_partition, set) in l1_boundary.iter().enumerate() {
            let l1_partition = l1_partition as PartitionId;
            for &boundary_node in set {
                permit_rx.recv().expect("consumer outlives producers");
                let job_tx = job_tx.clone();
                let permit_tx = permit_tx.clone();
                scope.spawn(move || {
                    l1_backward_search(transpose, forward, l1_partition, boundary_node, &job_tx);
                    let _ = permit_tx.send(());
                });
            }
        }

        for tail in 0..forward.node_count() as NodeId {
            let tail_l1 = forward.node(tail).l1();
            for edge in forward.edges_from(tail) {
                if forward.node(edge.to()).l1() == tail_l1 {
                    let _ = job_tx.send(TwoLevelFlagJob {
                        from: tail,
                        to: edge.to(),
                        partition: tail_l1,
                        level: Level::L1,
                    });
                }
            }
        }
    });
    drop(job_tx);
    let edges = consumer.join().expect("L1 consumer thread panicked");

    let l1_result = Csr::from_parts(nodes, edges, forward.offsets().to_vec());

    let (job_tx, job_rx) = mpsc::channel::<TwoLevelFlagJob>();
    let (permit_tx, permit_rx) = mpsc::sync_channel::<()>(MAX_WORKERS);
    for _ in 0..MAX_WORKERS {
        permit_tx.send(()).expect("permit channel just created");
    }

    let offsets = l1_result.offsets().to_vec();
    let mut edges: Vec<E> = l1_result.all_edges().to_vec();
    let consumer = thread::spawn(move || {
        for job in job_rx {
            if let Some(edge) = find_two_level_edge_mut(&mut edges, &offsets, job.from, job.to) {
                edge.add_l2_flag(job.partition);
            }
        }
        edges
    });

    thread::scope(|scope| {
        for (l1_partition, by_l1) in l2_boundary.iter().enumerate() {
            let l1_partition = l1_partition as PartitionId;
            let l1_size = l1_partition_size[l1_partition as usize];
            for &boundary_node in by_l1 {
                permit_rx.recv().expect("consumer outlives producers");
                let job_tx = job_tx.clone();
                let permit_tx = permit_tx.clone();
                scope.spawn(move || {
                    l2_backward_search(
                        transpose,
                        forward,
                        l1_partition,
                        l1_size,
                        boundary_node,
                        &job_tx,
                    );
                    let _ = permit_tx.send(());
                });
            }
        }

        for tail in 0..forward.node_count() as NodeId {
            let tail_node = forward.node(tail);
            for edge in forward.edges_from(tail) {
                let head_node = forward.node(edge.to());
                if tail_node.l1() == head_node.l1() && tail_node.l2() == head_node.l2() {
                    let _ = job_tx.send(TwoLevelFlagJob {
                        from: tail,
                        to: edge.to(),
                        partition: tail_node.l2(),
                        level: Level::L2,
                    });
                }
            }
        }
    });
    drop(job_tx);
    let edges = consumer.join().expect("L2 consumer thread panicked");

    Csr::from_parts(l1_result.nodes().to_vec(), edges, l1_result.offsets().to_vec())
}

fn l1_backward_search<N, E, W>(
    transpose: &Csr<N, E>,
    forward: &Csr<N, E>,
    l1_partition: PartitionId,
    boundary_node: NodeId,
    job_tx: &mpsc::Sender<TwoLevelFlagJob>,
) where
    N: TwoLevelPartitioned,
    E: TwoLevelFlagged<W>,
    W: Weight,
{
    let mut tree = dijkstra::shortest_path_tree(transpose, boundary_node);
    tree.walk_until(
        |child_id| forward.node(child_id).l1() == l1_partition,
        |parent_id, child_id| {
            let _ = job_tx.send(TwoLevelFlagJob {
                from: child_id,
                to: parent_id,
                partition: l1_partition,
                level: Level::L1,
            });
        },
    );
}

fn l2_backward_search<N, E, W>(
    transpose: &Csr<N, E>,
    forward: &Csr<N, E>,
    l1_partition: PartitionId,
    l1_partition_size: usize,
    boundary_node: NodeId,
    job_tx: &mpsc::Sender<TwoLevelFlagJob>,
) where
    N: TwoLevelPartitioned,
    E: TwoLevelFlagged<W>,
    W: Weight,
{
    let l2_partition = forward.node(boundary_node).l2();
    let mut l1_settled = 0usize;
    let mut tree = dijkstra::shortest_path_tree_pruned(transpose, boundary_node, |settled| {
        if forward.node(settled).l1() == l1_partition {
            l1_settled += 1;
        }
        l1_settled >= l1_partition_size
    });
    tree.walk_until(
        |_| false,
        |parent_id, child_id| {
            if forward.node(parent_id).l1() == l1_partition
                && forward.node(child_id).l1() == l1_partition
            {
                let _ = job_tx.send(TwoLevelFlagJob {
                    from: child_id,
                    to: parent_id,
                    partition: l2_partition,
                    level: Level::L2,
                });
            }
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edge::FlaggedEdge64;
    use crate::graph::list::AdjacencyList;
    use crate::graph::node::PartitionedGeoPoint;
    use crate::search::arcflag;
    use crate::search::{dijkstra, ShortestPathResult};

    fn partitioned_diamond() -> Csr<PartitionedGeoPoint, FlaggedEdge64<u32>> {
        let mut g: AdjacencyList<PartitionedGeoPoint, FlaggedEdge64<u32>> = AdjacencyList::new();
        g.append_node(PartitionedGeoPoint::new(0.0, 0.0, 0));
        g.append_node(PartitionedGeoPoint::new(0.0, 1.0, 0));
        g.append_node(PartitionedGeoPoint::new(1.0, 0.0, 0));
        g.append_node(PartitionedGeoPoint::new(1.0, 1.0, 1));
        g.insert_edge(0, FlaggedEdge64::new(1, 7));
        g.insert_edge(0, FlaggedEdge64::new(2, 8));
        g.insert_edge(1, FlaggedEdge64::new(3, 8));
        g.insert_edge(2, FlaggedEdge64::new(3, 7));
        g.freeze()
    }

    #[test]
    fn arc_flags_preserve_shortest_path() {
        let forward = partitioned_diamond();
        let transpose = flagged_transpose(&forward);

        let flagged = compute_arc_flags(&forward, &transpose, 2);
        let result: ShortestPathResult<u32> = arcflag::one_to_one(&flagged, 0, 3, 1, false);
        let plain: ShortestPathResult<u32> = dijkstra::one_to_one(&forward, 0, 3, false);
        assert_eq!(result.length, plain.length);
    }
}
