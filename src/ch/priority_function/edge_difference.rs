use itertools::Itertools;
use log::trace;

use super::PriorityCalculator;
use crate::{
    ch::{
        contracted_flags::ContractedFlags,
        contraction_params::PriorityParams,
        witness::{WitnessCalculator, WitnessPath},
        ContractionError,
    },
    graphs::{
        dynamic_graph::DirectedDynamicGraph,
        edge::{Direction, DynamicEdge, EdgeUpdate},
        VertexId, Weight,
    },
    restrictions::RestrictionProvider,
};

/// Priority from the simulated edge difference of a contraction, the depth of
/// the hierarchy below a vertex and how many of its neighbors are already
/// contracted.
///
/// Calculating a priority commits the shortcuts the contraction needs, so
/// contracting the vertex afterwards only has to remove it.
pub struct EdgeDifferencePriorityCalculator<W: WitnessCalculator> {
    witness_calculator: W,
    params: PriorityParams,
    contraction_count: Vec<u32>,
    depth: Vec<u32>,
}

impl<W: WitnessCalculator> EdgeDifferencePriorityCalculator<W> {
    pub fn new(witness_calculator: W, params: PriorityParams) -> Self {
        Self {
            witness_calculator,
            params,
            contraction_count: Vec::new(),
            depth: Vec::new(),
        }
    }

    pub fn params(&self) -> &PriorityParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut PriorityParams {
        &mut self.params
    }

    pub fn witness_calculator(&self) -> &W {
        &self.witness_calculator
    }

    /// Number of contracted neighbors recorded for `vertex`.
    pub fn contraction_count(&self, vertex: VertexId) -> u32 {
        self.contraction_count
            .get(vertex as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Depth of the hierarchy below `vertex`.
    pub fn depth(&self, vertex: VertexId) -> u32 {
        self.depth.get(vertex as usize).copied().unwrap_or(0)
    }

    /// Simulates contracting `vertex`, adds every shortcut that has no witness
    /// and returns the half-edges added and removed by the contraction.
    pub fn edge_difference(
        &mut self,
        graph: &mut DirectedDynamicGraph,
        contracted: &ContractedFlags,
        restrictions: &dyn RestrictionProvider,
        vertex: VertexId,
    ) -> Result<EdgeUpdate, ContractionError> {
        assert!(
            !contracted.is_contracted(vertex),
            "vertex {} is already contracted",
            vertex
        );

        let mut update = EdgeUpdate::default();
        let mut edges: Vec<DynamicEdge> = Vec::with_capacity(graph.edges(vertex).len());
        for edge in graph.edges(vertex) {
            update.removed += graph.edges_between(edge.neighbor(), vertex).len() as u32;
            if contracted.is_contracted(edge.neighbor()) {
                update.removed += graph.edges_between(vertex, edge.neighbor()).len() as u32;
                continue;
            }
            edges.push(*edge);
        }

        // a restriction through the vertex can make any detour invalid
        let unbounded = restrictions.has_restrictions(vertex);

        let mut targets = Vec::with_capacity(edges.len());
        let mut max_weights = Vec::with_capacity(edges.len());
        let mut forward = Vec::with_capacity(edges.len());
        let mut backward = Vec::with_capacity(edges.len());

        for (j, edge_j) in edges.iter().enumerate().skip(1) {
            targets.clear();
            max_weights.clear();
            forward.clear();
            backward.clear();

            for edge_k in &edges[..j] {
                targets.push(edge_k.neighbor());
                max_weights.push(if unbounded {
                    Weight::MAX
                } else {
                    edge_j.weight() + edge_k.weight()
                });

                // forward: n_j -> vertex -> n_k, backward: n_k -> vertex -> n_j
                let same_neighbor = edge_j.neighbor() == edge_k.neighbor();
                forward.push(requested(
                    !same_neighbor
                        && edge_j.direction().can_move_backward()
                        && edge_k.direction().can_move_forward(),
                ));
                backward.push(requested(
                    !same_neighbor
                        && edge_j.direction().can_move_forward()
                        && edge_k.direction().can_move_backward(),
                ));
            }

            if !forward
                .iter()
                .chain(backward.iter())
                .any(WitnessPath::is_requested)
            {
                continue;
            }

            self.witness_calculator.calculate(
                graph,
                restrictions,
                edge_j.neighbor(),
                vertex,
                &targets,
                &max_weights,
                &mut forward,
                &mut backward,
            )?;

            for (k, edge_k) in edges[..j].iter().enumerate() {
                let forward_needed = forward[k].routes_through(vertex);
                let backward_needed = backward[k].routes_through(vertex);
                let directions = match (forward_needed, backward_needed) {
                    (true, true) => (Direction::Bidirectional, Direction::Bidirectional),
                    (true, false) => (Direction::Forward, Direction::Backward),
                    (false, true) => (Direction::Backward, Direction::Forward),
                    (false, false) => continue,
                };

                let weight = edge_j.weight() + edge_k.weight();
                update += graph.try_add_or_update_edge(
                    edge_j.neighbor(),
                    edge_k.neighbor(),
                    weight,
                    directions.0,
                    Some(vertex),
                )?;
                update += graph.try_add_or_update_edge(
                    edge_k.neighbor(),
                    edge_j.neighbor(),
                    weight,
                    directions.1,
                    Some(vertex),
                )?;
            }
        }

        Ok(update)
    }

    fn grow(&mut self, number_of_vertices: u32) {
        let number_of_vertices = number_of_vertices as usize;
        if self.depth.len() < number_of_vertices {
            self.depth.resize(number_of_vertices, 0);
            self.contraction_count.resize(number_of_vertices, 0);
        }
    }
}

fn requested(possible: bool) -> WitnessPath {
    if possible {
        WitnessPath::NotFound
    } else {
        WitnessPath::NotRequested
    }
}

impl<W: WitnessCalculator> PriorityCalculator for EdgeDifferencePriorityCalculator<W> {
    fn calculate(
        &mut self,
        graph: &mut DirectedDynamicGraph,
        contracted: &ContractedFlags,
        restrictions: &dyn RestrictionProvider,
        vertex: VertexId,
    ) -> Result<f32, ContractionError> {
        let update = self.edge_difference(graph, contracted, restrictions, vertex)?;

        let difference = update.added as i64 - update.removed as i64;
        let depth = self.depth(vertex);
        let contraction_count = self.contraction_count(vertex);
        let priority = self.params.difference_factor as i64 * difference
            + self.params.depth_factor as i64 * depth as i64
            + self.params.contracted_factor as i64 * contraction_count as i64;

        trace!(
            "vertex {}: added {} removed {} depth {} contracted neighbors {} -> {}",
            vertex,
            update.added,
            update.removed,
            depth,
            contraction_count,
            priority
        );

        Ok(priority as f32)
    }

    fn notify_contracted(&mut self, graph: &DirectedDynamicGraph, vertex: VertexId) {
        self.grow(graph.number_of_vertices().max(vertex + 1));

        self.contraction_count[vertex as usize] = 0;
        let vertex_depth = std::mem::take(&mut self.depth[vertex as usize]) + 1;

        for neighbor in graph.edges(vertex).iter().map(DynamicEdge::neighbor).dedup() {
            let neighbor = neighbor as usize;
            let count = &mut self.contraction_count[neighbor];
            if self.params.accumulate_contracted_neighbors {
                *count += 1;
            } else if *count == 0 {
                *count = 1;
            }

            self.depth[neighbor] = self.depth[neighbor].max(vertex_depth);
        }
    }
}
