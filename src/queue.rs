//! Indexed binary min-heap keyed by [`NodeId`], used by every search
//! algorithm in `search/`.
//!
//! `original_source/algorithms/shortest_path/priority_queue.go` wraps Go's
//! `container/heap` and gives each item an `index` field so the caller can
//! mutate an item's priority in place and then call `heap.Fix`. Rust's
//! `std::collections::BinaryHeap` has no such hook — decrease-key would mean
//! pushing a stale duplicate and lazily skipping it on pop, which doubles
//! memory traffic on the million-relaxation searches this crate targets.
//! Instead we track, for every node, the slot it currently occupies in the
//! heap array (`NONE` if absent) and sift directly from that slot.

use crate::graph::{NodeId, Weight, NONE};

/// A node/priority pair as stored in the heap array.
#[derive(Debug, Clone, Copy)]
struct Entry<W> {
    node: NodeId,
    priority: W,
}

/// Indexed binary min-heap over `(NodeId, W)` pairs, one entry per node at
/// most. `position[node]` gives the node's current slot in `heap`, or
/// `NONE` if the node has never been pushed or has since been popped.
pub struct IndexedHeap<W: Weight> {
    heap: Vec<Entry<W>>,
    position: Vec<u32>,
}

impl<W: Weight> IndexedHeap<W> {
    /// Creates an empty heap sized for a graph with `node_count` nodes.
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            heap: Vec::with_capacity(node_count.min(1024)),
            position: vec![NONE; node_count],
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.position[node as usize] != NONE
    }

    /// Pushes `node` with `priority`. Panics if `node` is already present —
    /// callers must go through [`IndexedHeap::decrease_key`] instead.
    pub fn push(&mut self, node: NodeId, priority: W) {
        debug_assert!(!self.contains(node), "node {node} already in heap");
        let slot = self.heap.len();
        self.heap.push(Entry { node, priority });
        self.position[node as usize] = slot as u32;
        self.sift_up(slot);
    }

    /// Lowers `node`'s priority to `priority` if `node` is present and
    /// `priority` is strictly smaller than its current one; otherwise
    /// inserts it. This is the single entry point search loops use when
    /// relaxing an edge.
    pub fn push_or_decrease(&mut self, node: NodeId, priority: W) {
        match self.position[node as usize] {
            NONE => self.push(node, priority),
            slot => {
                let slot = slot as usize;
                if priority < self.heap[slot].priority {
                    self.heap[slot].priority = priority;
                    self.sift_up(slot);
                }
            }
        }
    }

    /// Removes and returns the `(node, priority)` pair with smallest
    /// priority, or `None` if the heap is empty.
    pub fn pop_min(&mut self) -> Option<(NodeId, W)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap_slots(0, last);
        let popped = self.heap.pop().unwrap();
        self.position[popped.node as usize] = NONE;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((popped.node, popped.priority))
    }

    pub fn clear(&mut self) {
        for entry in &self.heap {
            self.position[entry.node as usize] = NONE;
        }
        self.heap.clear();
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position[self.heap[a].node as usize] = a as u32;
        self.position[self.heap[b].node as usize] = b as u32;
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].priority < self.heap[parent].priority {
                self.swap_slots(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = 2 * slot + 2;
            let mut smallest = slot;
            if left < n && self.heap[left].priority < self.heap[smallest].priority {
                smallest = left;
            }
            if right < n && self.heap[right].priority < self.heap[smallest].priority {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap_slots(slot, smallest);
            slot = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_ascending_priority_order() {
        let mut pq: IndexedHeap<u32> = IndexedHeap::with_capacity(5);
        pq.push(0, 50);
        pq.push(1, 10);
        pq.push(2, 30);
        pq.push(3, 20);
        let mut out = Vec::new();
        while let Some((node, _)) = pq.pop_min() {
            out.push(node);
        }
        assert_eq!(out, vec![1, 3, 2, 0]);
    }

    #[test]
    fn decrease_key_reorders_heap() {
        let mut pq: IndexedHeap<u32> = IndexedHeap::with_capacity(3);
        pq.push(0, 100);
        pq.push(1, 50);
        pq.push_or_decrease(0, 10);
        assert_eq!(pq.pop_min(), Some((0, 10)));
        assert_eq!(pq.pop_min(), Some((1, 50)));
    }

    #[test]
    fn push_or_decrease_ignores_worse_priority() {
        let mut pq: IndexedHeap<u32> = IndexedHeap::with_capacity(2);
        pq.push(0, 10);
        pq.push_or_decrease(0, 20);
        assert_eq!(pq.pop_min(), Some((0, 10)));
    }

    #[test]
    fn empty_heap_pops_none() {
        let mut pq: IndexedHeap<u32> = IndexedHeap::with_capacity(0);
        assert_eq!(pq.pop_min(), None);
    }
}
