//! Regular lat/lon grid partitioning.
//!
//! Grounded on `original_source/examples/partitioning/grid.go` and
//! `two_level_grid.go`.

use crate::graph::{Geo, PartitionId};

/// Assigns every node the id of the `lat_cells x lon_cells` grid cell its
/// coordinate falls in, row-major (`row * lon_cells + col`).
pub fn grid_partition<N: Geo>(nodes: &[N], lat_cells: u16, lon_cells: u16) -> Vec<PartitionId> {
    nodes
        .iter()
        .map(|n| {
            let col = (((n.lon() + 180.0) / 360.0 * lon_cells as f64) as u16).min(lon_cells - 1);
            let row = (((n.lat() + 90.0) / 180.0 * lat_cells as f64) as u16).min(lat_cells - 1);
            row * lon_cells + col
        })
        .collect()
}

/// Two-level variant: an `l1_lat x l1_lon` coarse grid, each cell further
/// divided into an `l2_lat x l2_lon` fine grid. `l1_lat * l1_lon` and
/// `l2_lat * l2_lon` must each fit in 32 partitions (the L1/L2 flag width).
pub fn two_level_grid_partition<N: Geo>(
    nodes: &[N],
    l1_lat: u16,
    l1_lon: u16,
    l2_lat: u16,
    l2_lon: u16,
) -> (Vec<PartitionId>, Vec<PartitionId>) {
    assert!(
        (l1_lat as u32) * (l1_lon as u32) <= 32,
        "32 bits are reserved for level 1 partitions"
    );
    assert!(
        (l2_lat as u32) * (l2_lon as u32) <= 32,
        "32 bits are reserved for level 2 partitions"
    );

    let l_lat = l1_lat * l2_lat;
    let l_lon = l1_lon * l2_lon;

    let mut l1 = Vec::with_capacity(nodes.len());
    let mut l2 = Vec::with_capacity(nodes.len());
    for n in nodes {
        let col = (((n.lon() + 180.0) / 360.0 * l_lon as f64) as u16).min(l_lon - 1);
        let row = (((n.lat() + 90.0) / 180.0 * l_lat as f64) as u16).min(l_lat - 1);
        l1.push((row / l1_lat) * l1_lon + (col / l1_lon));
        l2.push((row % l1_lat) * l2_lon + (col % l1_lon));
    }
    (l1, l2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::GeoPoint;

    #[test]
    fn grid_partition_buckets_opposite_corners_apart() {
        let nodes = vec![GeoPoint::new(-89.0, -179.0), GeoPoint::new(89.0, 179.0)];
        let partitions = grid_partition(&nodes, 4, 4);
        assert_ne!(partitions[0], partitions[1]);
        assert_eq!(partitions[0], 0);
        assert_eq!(partitions[1], 15);
    }

    #[test]
    fn two_level_grid_partition_is_deterministic() {
        let nodes = vec![GeoPoint::new(10.0, 10.0), GeoPoint::new(10.0, 10.0)];
        let (l1, l2) = two_level_grid_partition(&nodes, 2, 2, 2, 2);
        assert_eq!(l1[0], l1[1]);
        assert_eq!(l2[0], l2[1]);
    }
}
