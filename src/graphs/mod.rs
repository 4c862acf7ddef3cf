pub mod dynamic_graph;
pub mod edge;
pub mod graph_factory;
pub mod graph_functions;

pub type VertexId = u32;
pub type Weight = f32;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("vertex {vertex} is out of bounds for a graph with {number_of_vertices} vertices")]
    VertexOutOfBounds {
        vertex: VertexId,
        number_of_vertices: u32,
    },
    #[error("self loop at vertex {0} is not allowed")]
    SelfLoop(VertexId),
    #[error("edge {tail} -> {head} has invalid weight {weight}")]
    InvalidWeight {
        tail: VertexId,
        head: VertexId,
        weight: Weight,
    },
}
