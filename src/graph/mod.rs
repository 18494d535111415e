//! Read-only graph model: typed nodes, typed half-edges, and two concrete
//! layouts (expandable list for construction, flat CSR for query).
//!
//! Node identifiers are a dense `u32` range `[0, N)`. `NONE` is the sentinel
//! used for "no predecessor / unreachable" throughout the search code —
//! chosen over `Option<NodeId>` so that a `SearchItem`'s predecessor field
//! costs no more than the id itself on multi-million-node graphs (see
//! DESIGN.md, "predecessor sentinels").

pub mod csr;
pub mod edge;
pub mod list;
pub mod node;

use std::fmt::Debug;
use std::ops::Add;

/// Dense node identifier in `[0, N)`.
pub type NodeId = u32;

/// Sentinel meaning "no predecessor" / "unreachable".
pub const NONE: NodeId = u32::MAX;

/// Partition identifier (16-bit per spec.md §3).
pub type PartitionId = u16;

/// A totally ordered, non-negative, additive edge-weight type.
///
/// Implemented for the unsigned integer types; floating point weights are
/// intentionally not supported by this trait without an explicit
/// total-order wrapper, since `f64: Ord` would silently misbehave on NaN in
/// a priority-queue comparator.
pub trait Weight: Copy + Ord + Add<Output = Self> + Debug + Send + Sync + 'static {
    const ZERO: Self;
    /// Saturation value used to initialise "best known meeting distance" in
    /// bidirectional searches (`MAX_W` in spec.md §3).
    const MAX: Self;

    fn saturating_add(self, rhs: Self) -> Self;
    /// `max(self - rhs, 0)`. Used by the ALT heuristic's triangle-inequality
    /// bound, which must never go negative on unsigned weight types.
    fn saturating_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_weight {
    ($t:ty) => {
        impl Weight for $t {
            const ZERO: Self = 0;
            const MAX: Self = <$t>::MAX;

            fn saturating_add(self, rhs: Self) -> Self {
                <$t>::saturating_add(self, rhs)
            }

            fn saturating_sub(self, rhs: Self) -> Self {
                <$t>::saturating_sub(self, rhs)
            }
        }
    };
}

impl_weight!(u32);
impl_weight!(u64);

/// Capability trait for any half-edge: every edge type exposes its head and
/// its weight.
pub trait HalfEdge<W: Weight>: Copy + Send + Sync {
    fn to(&self) -> NodeId;
    fn weight(&self) -> W;

    /// Returns a copy of this edge retargeted at `to`. Used by the `.fmi`
    /// loader, which parses edge lines before it knows the dense index of
    /// the head node (file ids need not be dense).
    fn with_to(self, to: NodeId) -> Self;
}

/// Capability trait for node payloads that carry geographic coordinates,
/// required by the Haversine heuristic.
pub trait Geo {
    /// Latitude in degrees (WGS84).
    fn lat(&self) -> f64;
    /// Longitude in degrees (WGS84).
    fn lon(&self) -> f64;
}

/// Capability trait for node payloads bound to a single-level partition.
pub trait Partitioned {
    fn partition(&self) -> PartitionId;
}

/// Capability trait for node payloads bound to a two-level partition.
pub trait TwoLevelPartitioned {
    fn l1(&self) -> PartitionId;
    fn l2(&self) -> PartitionId;
}

/// Capability trait for half-edges carrying a fixed-width arc-flag vector.
pub trait Flagged<W: Weight>: HalfEdge<W> {
    fn is_flagged(&self, p: PartitionId) -> bool;
    fn add_flag(&mut self, p: PartitionId);
    fn reset_flags(&mut self);
    fn flag_width(&self) -> u32;
}

/// Capability trait for half-edges carrying two independent arc-flag
/// vectors (L1/L2).
pub trait TwoLevelFlagged<W: Weight>: HalfEdge<W> {
    fn is_l1_flagged(&self, p: PartitionId) -> bool;
    fn is_l2_flagged(&self, p: PartitionId) -> bool;
    fn add_l1_flag(&mut self, p: PartitionId);
    fn add_l2_flag(&mut self, p: PartitionId);
    fn reset_flags(&mut self);
}
