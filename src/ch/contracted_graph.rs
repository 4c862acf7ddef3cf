use serde::{Deserialize, Serialize};

use crate::graphs::{dynamic_graph::DirectedDynamicGraph, edge::DynamicEdge, VertexId};

/// Result of a contraction run. Every vertex keeps the half-edges to the
/// vertices contracted after it, shortcuts included.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractedGraph {
    pub graph: DirectedDynamicGraph,
    pub level_to_vertex: Vec<VertexId>,
    pub vertex_to_level: Vec<u32>,
}

impl ContractedGraph {
    pub fn new(graph: DirectedDynamicGraph, level_to_vertex: Vec<VertexId>) -> Self {
        let mut vertex_to_level = vec![u32::MAX; graph.number_of_vertices() as usize];
        for (level, &vertex) in level_to_vertex.iter().enumerate() {
            vertex_to_level[vertex as usize] = level as u32;
        }

        ContractedGraph {
            graph,
            level_to_vertex,
            vertex_to_level,
        }
    }

    pub fn number_of_vertices(&self) -> u32 {
        self.graph.number_of_vertices()
    }

    pub fn level(&self, vertex: VertexId) -> Option<u32> {
        self.vertex_to_level
            .get(vertex as usize)
            .copied()
            .filter(|&level| level != u32::MAX)
    }

    /// Half-edges of `vertex` leading to higher levels.
    pub fn upward_edges(&self, vertex: VertexId) -> impl Iterator<Item = &DynamicEdge> + '_ {
        let level = self.level(vertex);
        self.graph
            .edges(vertex)
            .iter()
            .filter(move |edge| self.level(edge.neighbor()) > level)
    }

    pub fn number_of_shortcuts(&self) -> usize {
        self.graph
            .vertices()
            .map(|vertex| {
                self.graph
                    .edges(vertex)
                    .iter()
                    .filter(|edge| edge.is_shortcut())
                    .count()
            })
            .sum()
    }
}
