use super::{contracted_flags::ContractedFlags, ContractionError};
use crate::{
    graphs::{dynamic_graph::DirectedDynamicGraph, VertexId},
    restrictions::RestrictionProvider,
};

pub mod edge_difference;
pub mod fixed;

pub trait PriorityCalculator {
    /// Gets the priority of `vertex`; vertices with a lower priority are
    /// contracted first. May add the shortcuts contracting `vertex` needs to
    /// the graph.
    ///
    /// Panics if `vertex` is already contracted.
    fn calculate(
        &mut self,
        graph: &mut DirectedDynamicGraph,
        contracted: &ContractedFlags,
        restrictions: &dyn RestrictionProvider,
        vertex: VertexId,
    ) -> Result<f32, ContractionError>;

    /// Gets called right after `vertex` is contracted, while its adjacency
    /// still lists its uncontracted neighbors. Gives the calculator the
    /// opportunity to update the statistics of the neighbors.
    fn notify_contracted(&mut self, graph: &DirectedDynamicGraph, vertex: VertexId);
}
