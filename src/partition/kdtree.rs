//! kD-tree partitioning: recursively bisects the node set by alternating
//! longitude/latitude splits, encoding the path taken as the partition id's
//! bits.
//!
//! Grounded on `original_source/examples/partitioning/kd_partitioning.go`.
//! That file mutates node payloads through a level-by-level work queue;
//! this keeps the same level-by-level bisection but returns a plain
//! `Vec<PartitionId>` indexed by node id, since this crate's node types are
//! immutable.

use crate::graph::{Geo, PartitionId};

/// Bisects `nodes` `depth` times (alternating longitude, then latitude
/// splits), assigning each the binary path of its cuts as a `PartitionId`.
/// `depth` must be at most 8 (partitions are 8-bit wide by convention here,
/// matching the arc-flag vector's smallest practical width).
pub fn kd_partition<N: Geo>(nodes: &[N], depth: u32) -> Vec<PartitionId> {
    assert!(
        depth <= 8,
        "256 bits are reserved for partitions: depth {depth} exceeds 8"
    );

    let mut partitions = vec![0u16; nodes.len()];
    let mut groups: Vec<Vec<usize>> = vec![(0..nodes.len()).collect()];

    for d in 0..depth {
        let mut next_groups = Vec::with_capacity(groups.len() * 2);
        for mut group in groups {
            if d % 2 != 0 {
                group.sort_by(|&a, &b| nodes[a].lat().total_cmp(&nodes[b].lat()));
            } else {
                group.sort_by(|&a, &b| nodes[a].lon().total_cmp(&nodes[b].lon()));
            }
            let mid = group.len() / 2;
            let (first, second) = group.split_at(mid);
            for &idx in first {
                partitions[idx] <<= 1;
            }
            for &idx in second {
                partitions[idx] = (partitions[idx] << 1) | 1;
            }
            next_groups.push(first.to_vec());
            next_groups.push(second.to_vec());
        }
        groups = next_groups;
    }

    partitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::GeoPoint;

    #[test]
    fn kd_partition_splits_into_four_quadrant_like_groups() {
        let nodes = vec![
            GeoPoint::new(0.0, -10.0),
            GeoPoint::new(0.0, -9.0),
            GeoPoint::new(0.0, 9.0),
            GeoPoint::new(0.0, 10.0),
        ];
        let partitions = kd_partition(&nodes, 2);
        let distinct: std::collections::HashSet<_> = partitions.iter().collect();
        assert!(distinct.len() >= 2);
    }

    #[test]
    #[should_panic]
    fn kd_partition_rejects_excessive_depth() {
        let nodes = vec![GeoPoint::new(0.0, 0.0)];
        kd_partition(&nodes, 9);
    }
}
