use radix_heap::RadixHeapMap;

use super::DijkstraQueueElement;
use crate::graphs::Weight;

/// Monotone min-queue for Dijkstra searches over non-negative weights.
///
/// The bit pattern of a non-negative `f32` grows with its value, so the
/// negated bit pattern turns the max radix heap into a min queue.
#[derive(Clone)]
pub struct RadixQueue {
    heap: RadixHeapMap<i64, u32>,
}

impl Default for RadixQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RadixQueue {
    pub fn new() -> RadixQueue {
        RadixQueue {
            heap: RadixHeapMap::new(),
        }
    }

    /// Weights pushed must not be smaller than the last popped weight.
    pub fn push(&mut self, state: DijkstraQueueElement) {
        debug_assert!(state.weight >= 0.0);
        self.heap.push(key(state.weight), state.vertex);
    }

    pub fn pop(&mut self) -> Option<DijkstraQueueElement> {
        let (negative_bits, vertex) = self.heap.pop()?;
        Some(DijkstraQueueElement {
            weight: Weight::from_bits((-negative_bits) as u32),
            vertex,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

fn key(weight: Weight) -> i64 {
    -(weight.to_bits() as i64)
}

#[cfg(test)]
mod tests {
    use super::RadixQueue;
    use crate::queue::DijkstraQueueElement;

    #[test]
    fn pops_in_increasing_weight() {
        let mut queue = RadixQueue::new();
        queue.push(DijkstraQueueElement::new(2.5, 1));
        queue.push(DijkstraQueueElement::new(0.0, 2));
        queue.push(DijkstraQueueElement::new(10.0, 3));

        assert_eq!(queue.pop(), Some(DijkstraQueueElement::new(0.0, 2)));
        queue.push(DijkstraQueueElement::new(1.0, 4));
        assert_eq!(queue.pop(), Some(DijkstraQueueElement::new(1.0, 4)));
        assert_eq!(queue.pop(), Some(DijkstraQueueElement::new(2.5, 1)));
        assert_eq!(queue.pop(), Some(DijkstraQueueElement::new(10.0, 3)));
        assert!(queue.is_empty());
    }
}
