//! Concrete half-edge payload types.
//!
//! DESIGN NOTES (spec.md §9) suggest a tagged edge variant behind a small
//! capability trait, noting that "static dispatch is preferable" since the
//! edge shape is fixed at graph-load time. We take that literally: each
//! variant is its own concrete type implementing [`super::HalfEdge`] and,
//! where applicable, [`super::Flagged`] / [`super::TwoLevelFlagged`]; a
//! `Graph<N, E>` is monomorphised over one edge type for its whole
//! lifetime rather than paying an enum discriminant and match on every
//! relaxation.

use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

use super::{Flagged, HalfEdge, PartitionId, TwoLevelFlagged, Weight};

/// A plain weighted half-edge: target node + weight. No arc flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedEdge<W: Weight> {
    pub to: u32,
    pub weight: W,
}

impl<W: Weight> WeightedEdge<W> {
    pub fn new(to: u32, weight: W) -> Self {
        Self { to, weight }
    }
}

impl<W: Weight> HalfEdge<W> for WeightedEdge<W> {
    fn to(&self) -> u32 {
        self.to
    }

    fn weight(&self) -> W {
        self.weight
    }

    fn with_to(self, to: u32) -> Self {
        Self { to, ..self }
    }
}

/// A weighted half-edge carrying a 64-bit arc-flag vector (up to 64
/// partitions). Bit `p` set iff the edge lies on some shortest path leading
/// into partition `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedEdge64<W: Weight> {
    pub to: u32,
    pub weight: W,
    pub flags: u64,
}

impl<W: Weight> FlaggedEdge64<W> {
    pub fn new(to: u32, weight: W) -> Self {
        Self {
            to,
            weight,
            flags: 0,
        }
    }
}

impl<W: Weight> HalfEdge<W> for FlaggedEdge64<W> {
    fn to(&self) -> u32 {
        self.to
    }

    fn weight(&self) -> W {
        self.weight
    }

    fn with_to(self, to: u32) -> Self {
        Self { to, ..self }
    }
}

impl<W: Weight> Flagged<W> for FlaggedEdge64<W> {
    fn is_flagged(&self, p: PartitionId) -> bool {
        (self.flags & (1u64 << p)) != 0
    }

    fn add_flag(&mut self, p: PartitionId) {
        self.flags |= 1u64 << p;
    }

    fn reset_flags(&mut self) {
        self.flags = 0;
    }

    fn flag_width(&self) -> u32 {
        64
    }
}

/// A large flagged edge backed by `N` machine words, used for 128- or
/// 256-bit flag vectors (spec.md §3 `LargeFlagged`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeFlaggedEdge<W: Weight, const WORDS: usize> {
    pub to: u32,
    pub weight: W,
    #[serde(with = "BigArray")]
    pub flags: [u64; WORDS],
}

impl<W: Weight, const WORDS: usize> LargeFlaggedEdge<W, WORDS> {
    pub fn new(to: u32, weight: W) -> Self {
        Self {
            to,
            weight,
            flags: [0u64; WORDS],
        }
    }
}

impl<W: Weight, const WORDS: usize> HalfEdge<W> for LargeFlaggedEdge<W, WORDS> {
    fn to(&self) -> u32 {
        self.to
    }

    fn weight(&self) -> W {
        self.weight
    }

    fn with_to(self, to: u32) -> Self {
        Self { to, ..self }
    }
}

impl<W: Weight, const WORDS: usize> Flagged<W> for LargeFlaggedEdge<W, WORDS> {
    fn is_flagged(&self, p: PartitionId) -> bool {
        let word = p as usize / 64;
        let bit = p as usize % 64;
        word < WORDS && (self.flags[word] & (1u64 << bit)) != 0
    }

    fn add_flag(&mut self, p: PartitionId) {
        let word = p as usize / 64;
        let bit = p as usize % 64;
        self.flags[word] |= 1u64 << bit;
    }

    fn reset_flags(&mut self) {
        self.flags = [0u64; WORDS];
    }

    fn flag_width(&self) -> u32 {
        (WORDS * 64) as u32
    }
}

/// 128-bit flagged edge, stored as two machine words.
pub type FlaggedEdge128<W> = LargeFlaggedEdge<W, 2>;
/// 256-bit flagged edge, stored as four machine words.
pub type FlaggedEdge256<W> = LargeFlaggedEdge<W, 4>;

/// A weighted half-edge carrying two independent 64-bit flag vectors (L1 and
/// L2). L2 flags are only consulted while both endpoints lie in the target
/// L1 partition (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoLevelFlaggedEdge<W: Weight> {
    pub to: u32,
    pub weight: W,
    pub l1_flags: u64,
    pub l2_flags: u64,
}

impl<W: Weight> TwoLevelFlaggedEdge<W> {
    pub fn new(to: u32, weight: W) -> Self {
        Self {
            to,
            weight,
            l1_flags: 0,
            l2_flags: 0,
        }
    }
}

impl<W: Weight> HalfEdge<W> for TwoLevelFlaggedEdge<W> {
    fn to(&self) -> u32 {
        self.to
    }

    fn weight(&self) -> W {
        self.weight
    }

    fn with_to(self, to: u32) -> Self {
        Self { to, ..self }
    }
}

impl<W: Weight> TwoLevelFlagged<W> for TwoLevelFlaggedEdge<W> {
    fn is_l1_flagged(&self, p: PartitionId) -> bool {
        (self.l1_flags & (1u64 << p)) != 0
    }

    fn is_l2_flagged(&self, p: PartitionId) -> bool {
        (self.l2_flags & (1u64 << p)) != 0
    }

    fn add_l1_flag(&mut self, p: PartitionId) {
        self.l1_flags |= 1u64 << p;
    }

    fn add_l2_flag(&mut self, p: PartitionId) {
        self.l2_flags |= 1u64 << p;
    }

    fn reset_flags(&mut self) {
        self.l1_flags = 0;
        self.l2_flags = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flagged_edge_64_round_trips_bits() {
        let mut e: FlaggedEdge64<u32> = FlaggedEdge64::new(3, 7);
        assert!(!e.is_flagged(5));
        e.add_flag(5);
        assert!(e.is_flagged(5));
        assert!(!e.is_flagged(6));
        e.reset_flags();
        assert!(!e.is_flagged(5));
    }

    #[test]
    fn large_flagged_edge_spans_words() {
        let mut e: FlaggedEdge128<u32> = FlaggedEdge128::new(0, 1);
        e.add_flag(0);
        e.add_flag(127);
        assert!(e.is_flagged(0));
        assert!(e.is_flagged(127));
        assert!(!e.is_flagged(64));
        assert_eq!(e.flag_width(), 128);
    }

    #[test]
    fn two_level_flagged_edge_is_independent_per_level() {
        let mut e: TwoLevelFlaggedEdge<u32> = TwoLevelFlaggedEdge::new(1, 1);
        e.add_l1_flag(2);
        assert!(e.is_l1_flagged(2));
        assert!(!e.is_l2_flagged(2));
    }
}
