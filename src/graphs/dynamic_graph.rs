use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::{
    edge::{Direction, DynamicEdge, EdgeUpdate, WeightedEdge},
    GraphError, VertexId, Weight,
};

/// Mutable directed graph storing every edge as half-edges in the adjacency
/// list of its source. Adjacency lists are kept sorted by neighbor, so all
/// half-edges of a `(source, target)` pair are contiguous.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DirectedDynamicGraph {
    edges: Vec<Vec<DynamicEdge>>,
}

impl DirectedDynamicGraph {
    pub fn new(number_of_vertices: u32) -> DirectedDynamicGraph {
        DirectedDynamicGraph {
            edges: vec![Vec::new(); number_of_vertices as usize],
        }
    }

    /// Builds a graph from one-way edges. Every edge `u -> v` becomes a
    /// forward half-edge at `u` and a backward half-edge at `v`; opposite
    /// edges of equal weight collapse into bidirectional half-edges.
    pub fn from_edges(edges: &[WeightedEdge]) -> Result<DirectedDynamicGraph, GraphError> {
        let number_of_vertices = edges
            .iter()
            .map(|edge| std::cmp::max(edge.tail(), edge.head()) + 1)
            .max()
            .unwrap_or(0);

        let mut graph = DirectedDynamicGraph::new(number_of_vertices);
        for edge in edges {
            graph.try_add_or_update_edge(
                edge.tail(),
                edge.head(),
                edge.weight(),
                Direction::Forward,
                None,
            )?;
            let reversed = edge.reversed();
            graph.try_add_or_update_edge(
                reversed.tail(),
                reversed.head(),
                reversed.weight(),
                Direction::Backward,
                None,
            )?;
        }

        Ok(graph)
    }

    pub fn number_of_vertices(&self) -> u32 {
        self.edges.len() as u32
    }

    pub fn number_of_edges(&self) -> u32 {
        self.edges.iter().map(Vec::len).sum::<usize>() as u32
    }

    pub fn vertices(&self) -> Range<VertexId> {
        0..self.number_of_vertices()
    }

    pub fn add_vertex(&mut self) -> VertexId {
        self.edges.push(Vec::new());
        self.number_of_vertices() - 1
    }

    /// Half-edges stored at `vertex`. Unknown vertices have no edges.
    pub fn edges(&self, vertex: VertexId) -> &[DynamicEdge] {
        self.edges
            .get(vertex as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Half-edges stored at `source` that lead to `target`.
    pub fn edges_between(&self, source: VertexId, target: VertexId) -> &[DynamicEdge] {
        match self.edges.get(source as usize) {
            Some(edges) => &edges[neighbor_range(edges, target)],
            None => &[],
        }
    }

    /// Adds a half-edge or merges it into the half-edges already stored for
    /// `(source, target)`. Per travel direction only the cheapest entry
    /// survives; if both directions end up with the same weight and via they
    /// are stored as one bidirectional half-edge.
    ///
    /// Returns how many half-edges were added and removed. Re-adding an edge
    /// that changes nothing reports no churn.
    pub fn try_add_or_update_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        weight: Weight,
        direction: Direction,
        via: Option<VertexId>,
    ) -> Result<EdgeUpdate, GraphError> {
        self.validate(source, target, weight)?;

        let edges = &mut self.edges[source as usize];
        let range = neighbor_range(edges, target);
        let existing = &edges[range.clone()];

        let mut forward = None;
        let mut backward = None;
        for edge in existing {
            if edge.direction().can_move_forward() {
                keep_cheaper(&mut forward, edge.weight(), edge.via());
            }
            if edge.direction().can_move_backward() {
                keep_cheaper(&mut backward, edge.weight(), edge.via());
            }
        }
        if direction.can_move_forward() {
            keep_cheaper(&mut forward, weight, via);
        }
        if direction.can_move_backward() {
            keep_cheaper(&mut backward, weight, via);
        }

        let replacement = merged_edges(target, forward, backward);
        if replacement.as_slice() == existing {
            return Ok(EdgeUpdate::default());
        }

        let update = EdgeUpdate {
            added: replacement.len() as u32,
            removed: existing.len() as u32,
        };
        edges.splice(range, replacement);

        Ok(update)
    }

    /// Removes every half-edge `source -> target` and returns how many were
    /// removed.
    pub fn remove_edges(&mut self, source: VertexId, target: VertexId) -> usize {
        let Some(edges) = self.edges.get_mut(source as usize) else {
            return 0;
        };
        let range = neighbor_range(edges, target);
        let removed = range.len();
        edges.drain(range);
        removed
    }

    /// Keeps only the half-edges at `source` matching `keep` and returns how
    /// many were removed.
    pub fn retain_edges<F>(&mut self, source: VertexId, keep: F) -> usize
    where
        F: FnMut(&DynamicEdge) -> bool,
    {
        let Some(edges) = self.edges.get_mut(source as usize) else {
            return 0;
        };
        let before = edges.len();
        edges.retain(keep);
        before - edges.len()
    }

    fn validate(&self, source: VertexId, target: VertexId, weight: Weight) -> Result<(), GraphError> {
        let number_of_vertices = self.number_of_vertices();
        for vertex in [source, target] {
            if vertex >= number_of_vertices {
                return Err(GraphError::VertexOutOfBounds {
                    vertex,
                    number_of_vertices,
                });
            }
        }
        if source == target {
            return Err(GraphError::SelfLoop(source));
        }
        if weight.is_nan() || weight < 0.0 {
            return Err(GraphError::InvalidWeight {
                tail: source,
                head: target,
                weight,
            });
        }
        Ok(())
    }
}

fn neighbor_range(edges: &[DynamicEdge], target: VertexId) -> Range<usize> {
    let start = edges.partition_point(|edge| edge.neighbor() < target);
    let end = edges.partition_point(|edge| edge.neighbor() <= target);
    start..end
}

fn keep_cheaper(best: &mut Option<(Weight, Option<VertexId>)>, weight: Weight, via: Option<VertexId>) {
    if best.map_or(true, |(best_weight, _)| weight < best_weight) {
        *best = Some((weight, via));
    }
}

fn merged_edges(
    target: VertexId,
    forward: Option<(Weight, Option<VertexId>)>,
    backward: Option<(Weight, Option<VertexId>)>,
) -> Vec<DynamicEdge> {
    match (forward, backward) {
        (Some(forward), Some(backward)) if forward == backward => {
            vec![DynamicEdge::new(
                target,
                forward.0,
                Direction::Bidirectional,
                forward.1,
            )]
        }
        (forward, backward) => forward
            .map(|(weight, via)| DynamicEdge::new(target, weight, Direction::Forward, via))
            .into_iter()
            .chain(
                backward.map(|(weight, via)| {
                    DynamicEdge::new(target, weight, Direction::Backward, via)
                }),
            )
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::DirectedDynamicGraph;
    use crate::graphs::{
        edge::{Direction, EdgeUpdate, WeightedEdge},
        GraphError,
    };

    #[test]
    fn opposite_edges_collapse_to_bidirectional() {
        let edges = vec![
            WeightedEdge::new(0, 1, 4.0).unwrap(),
            WeightedEdge::new(1, 0, 4.0).unwrap(),
            WeightedEdge::new(1, 2, 3.0).unwrap(),
        ];
        let graph = DirectedDynamicGraph::from_edges(&edges).unwrap();

        assert_eq!(graph.number_of_vertices(), 3);
        assert_eq!(graph.edges(0).len(), 1);
        assert_eq!(graph.edges(0)[0].direction(), Direction::Bidirectional);

        let at_one = graph.edges_between(1, 2);
        assert_eq!(at_one.len(), 1);
        assert_eq!(at_one[0].direction(), Direction::Forward);
        assert_eq!(graph.edges_between(2, 1)[0].direction(), Direction::Backward);
    }

    #[test]
    fn add_or_update_reports_churn() {
        let mut graph = DirectedDynamicGraph::new(3);

        let update = graph
            .try_add_or_update_edge(0, 1, 10.0, Direction::Forward, Some(2))
            .unwrap();
        assert_eq!(update, EdgeUpdate { added: 1, removed: 0 });

        // same edge again changes nothing
        let update = graph
            .try_add_or_update_edge(0, 1, 10.0, Direction::Forward, Some(2))
            .unwrap();
        assert_eq!(update, EdgeUpdate::default());

        // the missing direction with equal weight merges both entries
        let update = graph
            .try_add_or_update_edge(0, 1, 10.0, Direction::Backward, Some(2))
            .unwrap();
        assert_eq!(update, EdgeUpdate { added: 1, removed: 1 });
        assert_eq!(graph.edges(0).len(), 1);
        assert_eq!(graph.edges(0)[0].direction(), Direction::Bidirectional);

        // a cheaper forward edge splits the pair again
        let update = graph
            .try_add_or_update_edge(0, 1, 7.0, Direction::Forward, None)
            .unwrap();
        assert_eq!(update, EdgeUpdate { added: 2, removed: 1 });
        let edges = graph.edges_between(0, 1);
        assert_eq!(edges[0].direction(), Direction::Forward);
        assert_eq!(edges[0].weight(), 7.0);
        assert_eq!(edges[1].direction(), Direction::Backward);
        assert_eq!(edges[1].via(), Some(2));

        // a more expensive edge is absorbed
        let update = graph
            .try_add_or_update_edge(0, 1, 20.0, Direction::Bidirectional, Some(2))
            .unwrap();
        assert_eq!(update, EdgeUpdate::default());
    }

    #[test]
    fn adjacency_stays_sorted() {
        let mut graph = DirectedDynamicGraph::new(5);
        for target in [4, 2, 3, 1] {
            graph
                .try_add_or_update_edge(0, target, 1.0, Direction::Bidirectional, None)
                .unwrap();
        }
        let neighbors: Vec<_> = graph.edges(0).iter().map(|edge| edge.neighbor()).collect();
        assert_eq!(neighbors, vec![1, 2, 3, 4]);

        assert_eq!(graph.remove_edges(0, 3), 1);
        assert_eq!(graph.retain_edges(0, |edge| edge.neighbor() != 4), 1);
        assert_eq!(graph.number_of_edges(), 2);
    }

    #[test]
    fn invalid_edges_are_rejected() {
        let mut graph = DirectedDynamicGraph::new(2);
        assert_eq!(
            graph.try_add_or_update_edge(0, 0, 1.0, Direction::Forward, None),
            Err(GraphError::SelfLoop(0))
        );
        assert!(matches!(
            graph.try_add_or_update_edge(0, 5, 1.0, Direction::Forward, None),
            Err(GraphError::VertexOutOfBounds { vertex: 5, .. })
        ));
        assert!(matches!(
            graph.try_add_or_update_edge(0, 1, -1.0, Direction::Forward, None),
            Err(GraphError::InvalidWeight { .. })
        ));
        assert!(graph.edges(7).is_empty());
    }
}
