//! Merge candidates for the clustering priority queue

use std::cmp::Ordering;

/// Two clusters that could be merged, with their distance
///
/// `left` and `right` are slot indices in the engine's cluster table, with
/// `left < right`. The ordering is reversed so that `BinaryHeap` pops the
/// closest pair first; equal distances fall back to the smaller slot indices,
/// which keeps runs on the same graph reproducible.
#[derive(Debug, Clone, Copy)]
pub struct ClusterPair {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
}

impl ClusterPair {
    pub fn new(a: usize, b: usize, distance: f64) -> Self {
        Self {
            left: a.min(b),
            right: a.max(b),
            distance,
        }
    }

    /// Whether the pair references the given slot
    pub fn involves(&self, slot: usize) -> bool {
        self.left == slot || self.right == slot
    }
}

impl Ord for ClusterPair {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.left.cmp(&self.left))
            .then_with(|| other.right.cmp(&self.right))
    }
}

impl PartialOrd for ClusterPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ClusterPair {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ClusterPair {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn test_slots_are_ordered() {
        let pair = ClusterPair::new(5, 2, 1.0);
        assert_eq!(pair.left, 2);
        assert_eq!(pair.right, 5);
        assert!(pair.involves(5));
        assert!(!pair.involves(3));
    }

    #[test]
    fn test_heap_pops_closest_first() {
        let mut heap = BinaryHeap::new();
        heap.push(ClusterPair::new(0, 1, 1.25));
        heap.push(ClusterPair::new(0, 2, 0.75));
        heap.push(ClusterPair::new(1, 2, 1.75));

        assert_eq!(heap.pop().unwrap().distance, 0.75);
        assert_eq!(heap.pop().unwrap().distance, 1.25);
        assert_eq!(heap.pop().unwrap().distance, 1.75);
    }

    #[test]
    fn test_ties_break_on_slot_order() {
        let mut heap = BinaryHeap::new();
        heap.push(ClusterPair::new(2, 3, 0.75));
        heap.push(ClusterPair::new(0, 4, 0.75));
        heap.push(ClusterPair::new(0, 1, 0.75));

        let first = heap.pop().unwrap();
        assert_eq!((first.left, first.right), (0, 1));
        let second = heap.pop().unwrap();
        assert_eq!((second.left, second.right), (0, 4));
        let third = heap.pop().unwrap();
        assert_eq!((third.left, third.right), (2, 3));
    }
}
