use ahash::HashMap;

use super::PriorityCalculator;
use crate::{
    ch::{contracted_flags::ContractedFlags, ContractionError},
    graphs::{dynamic_graph::DirectedDynamicGraph, VertexId},
    restrictions::RestrictionProvider,
};

/// Returns preassigned priorities and never touches the graph. Vertices
/// without a priority are contracted last.
///
/// Useful to drive a contraction in a known order; no shortcuts are added.
#[derive(Clone, Debug, Default)]
pub struct FixedPriorityCalculator {
    priorities: HashMap<VertexId, f32>,
}

impl FixedPriorityCalculator {
    pub fn new(priorities: HashMap<VertexId, f32>) -> Self {
        Self { priorities }
    }

    /// Contracts the vertices in the given order.
    pub fn from_order(order: &[VertexId]) -> Self {
        Self {
            priorities: order
                .iter()
                .enumerate()
                .map(|(level, &vertex)| (vertex, level as f32))
                .collect(),
        }
    }
}

impl PriorityCalculator for FixedPriorityCalculator {
    fn calculate(
        &mut self,
        _graph: &mut DirectedDynamicGraph,
        contracted: &ContractedFlags,
        _restrictions: &dyn RestrictionProvider,
        vertex: VertexId,
    ) -> Result<f32, ContractionError> {
        assert!(
            !contracted.is_contracted(vertex),
            "vertex {} is already contracted",
            vertex
        );
        Ok(self.priorities.get(&vertex).copied().unwrap_or(f32::MAX))
    }

    fn notify_contracted(&mut self, _graph: &DirectedDynamicGraph, _vertex: VertexId) {}
}
