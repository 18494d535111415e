//! Concrete node payload types.
//!
//! Grounded on `original_source/graph/default_types.go`: a blank node for
//! graphs that need neither coordinates nor partitions, a `GeoPoint` for
//! heuristic-driven searches, and partitioned/two-level-partitioned variants
//! layered on top of it.

use serde::{Deserialize, Serialize};

use super::{Geo, PartitionId, Partitioned, TwoLevelPartitioned};

/// A node with no payload at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plain;

/// A node carrying a WGS84 lat/lon pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl Geo for GeoPoint {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

/// A `GeoPoint` bound to a single-level partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionedGeoPoint {
    pub point: GeoPoint,
    pub partition: PartitionId,
}

impl PartitionedGeoPoint {
    pub fn new(lat: f64, lon: f64, partition: PartitionId) -> Self {
        Self {
            point: GeoPoint::new(lat, lon),
            partition,
        }
    }
}

impl Geo for PartitionedGeoPoint {
    fn lat(&self) -> f64 {
        self.point.lat
    }

    fn lon(&self) -> f64 {
        self.point.lon
    }
}

impl Partitioned for PartitionedGeoPoint {
    fn partition(&self) -> PartitionId {
        self.partition
    }
}

/// A `GeoPoint` bound to two independent partition levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwoLevelPartitionedGeoPoint {
    pub point: GeoPoint,
    pub l1: PartitionId,
    pub l2: PartitionId,
}

impl TwoLevelPartitionedGeoPoint {
    pub fn new(lat: f64, lon: f64, l1: PartitionId, l2: PartitionId) -> Self {
        Self {
            point: GeoPoint::new(lat, lon),
            l1,
            l2,
        }
    }
}

impl Geo for TwoLevelPartitionedGeoPoint {
    fn lat(&self) -> f64 {
        self.point.lat
    }

    fn lon(&self) -> f64 {
        self.point.lon
    }
}

impl TwoLevelPartitioned for TwoLevelPartitionedGeoPoint {
    fn l1(&self) -> PartitionId {
        self.l1
    }

    fn l2(&self) -> PartitionId {
        self.l2
    }
}
