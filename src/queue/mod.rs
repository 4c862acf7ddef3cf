use std::cmp::Ordering;

use crate::graphs::{VertexId, Weight};

pub mod radix_queue;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DijkstraQueueElement {
    pub weight: Weight,
    pub vertex: VertexId,
}

impl DijkstraQueueElement {
    pub fn new(weight: Weight, vertex: VertexId) -> DijkstraQueueElement {
        DijkstraQueueElement { weight, vertex }
    }
}

/// A vertex waiting in the contraction queue. Ordered so that a
/// `BinaryHeap` pops the smallest priority first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChPriorityElement {
    pub vertex: VertexId,
    pub priority: f32,
}

impl ChPriorityElement {
    pub fn new(priority: f32, vertex: VertexId) -> Self {
        Self { vertex, priority }
    }
}

impl Eq for ChPriorityElement {}

// Flip the ordering on priorities to turn the max-heap into a min-heap. Ties
// are broken by vertex id to keep `Ord` consistent with `PartialEq`.
impl Ord for ChPriorityElement {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for ChPriorityElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BinaryHeap;

    use super::ChPriorityElement;

    #[test]
    fn contraction_queue_pops_minimum() {
        let mut queue = BinaryHeap::new();
        queue.push(ChPriorityElement::new(3.0, 0));
        queue.push(ChPriorityElement::new(-2.0, 1));
        queue.push(ChPriorityElement::new(-2.0, 4));
        queue.push(ChPriorityElement::new(0.5, 2));

        let order: Vec<_> = std::iter::from_fn(|| queue.pop())
            .map(|element| element.vertex)
            .collect();
        assert_eq!(order, vec![1, 4, 2, 0]);
    }
}
