use std::collections::BinaryHeap;

use itertools::Itertools;
use log::{debug, info};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use super::{
    contracted_flags::ContractedFlags,
    contracted_graph::ContractedGraph,
    contraction_params::ContractionParams,
    priority_function::{edge_difference::EdgeDifferencePriorityCalculator, PriorityCalculator},
    witness::dijkstra_witness::DijkstraWitnessCalculator,
    ContractionError,
};
use crate::{
    graphs::{dynamic_graph::DirectedDynamicGraph, VertexId},
    queue::ChPriorityElement,
    restrictions::{NoRestrictions, RestrictionProvider},
    utility::get_progressbar,
};

/// Contracts one vertex at a time, always the one with the lowest priority.
///
/// Priorities in the queue are updated lazily: the popped vertex is
/// recalculated and pushed back if its priority got worse.
pub struct Contractor<P: PriorityCalculator> {
    graph: DirectedDynamicGraph,
    contracted: ContractedFlags,
    restrictions: Box<dyn RestrictionProvider>,
    calculator: P,
    queue: BinaryHeap<ChPriorityElement>,
    level_to_vertex: Vec<VertexId>,
    seed: Option<u64>,
    initialized: bool,
}

impl<P: PriorityCalculator> Contractor<P> {
    pub fn new(graph: DirectedDynamicGraph, calculator: P) -> Self {
        let contracted = ContractedFlags::new(graph.number_of_vertices());
        Contractor {
            graph,
            contracted,
            restrictions: Box::new(NoRestrictions),
            calculator,
            queue: BinaryHeap::new(),
            level_to_vertex: Vec::new(),
            seed: None,
            initialized: false,
        }
    }

    pub fn with_restrictions(mut self, restrictions: impl RestrictionProvider + 'static) -> Self {
        self.restrictions = Box::new(restrictions);
        self
    }

    /// Makes the initial queue order, and with it the contraction order,
    /// reproducible.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn graph(&self) -> &DirectedDynamicGraph {
        &self.graph
    }

    pub fn contracted(&self) -> &ContractedFlags {
        &self.contracted
    }

    pub fn calculator(&self) -> &P {
        &self.calculator
    }

    pub fn level_to_vertex(&self) -> &[VertexId] {
        &self.level_to_vertex
    }

    /// Calculates the priority of every vertex once. Vertices are visited in
    /// random order, as every calculation may already add shortcuts.
    pub fn initialize(&mut self) -> Result<(), ContractionError> {
        let mut vertices: Vec<VertexId> = self.graph.vertices().collect();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        vertices.shuffle(&mut rng);

        info!("initializing queue of {} vertices", vertices.len());
        let bar = get_progressbar("Initializing queue", vertices.len() as u64);
        self.queue.clear();
        for vertex in vertices {
            let priority = self.calculator.calculate(
                &mut self.graph,
                &self.contracted,
                self.restrictions.as_ref(),
                vertex,
            )?;
            self.queue.push(ChPriorityElement::new(priority, vertex));
            bar.inc(1);
        }
        bar.finish_and_clear();

        self.initialized = true;
        Ok(())
    }

    /// Contracts the next vertex and returns it, `None` once every vertex is
    /// contracted.
    pub fn contract_next(&mut self) -> Result<Option<VertexId>, ContractionError> {
        if !self.initialized {
            self.initialize()?;
        }

        let Some(vertex) = self.pop()? else {
            return Ok(None);
        };
        self.contract_vertex(vertex);
        Ok(Some(vertex))
    }

    /// Contracts every vertex.
    pub fn contract(mut self) -> Result<ContractedGraph, ContractionError> {
        if !self.initialized {
            self.initialize()?;
        }

        info!("start contracting");
        let remaining = self.graph.number_of_vertices() - self.contracted.number_of_contracted();
        let bar = get_progressbar("Contracting", remaining as u64);
        while self.contract_next()?.is_some() {
            bar.inc(1);
        }
        bar.finish_and_clear();

        info!(
            "contracted {} vertices, {} half-edges remain",
            self.level_to_vertex.len(),
            self.graph.number_of_edges()
        );
        Ok(ContractedGraph::new(self.graph, self.level_to_vertex))
    }

    // Lazy popping of the vertex with minimum priority.
    fn pop(&mut self) -> Result<Option<VertexId>, ContractionError> {
        while let Some(mut element) = self.queue.pop() {
            if self.contracted.is_contracted(element.vertex) {
                continue;
            }

            // Also brings the shortcuts of the vertex up to date, so it can be
            // contracted right away.
            let priority = self.calculator.calculate(
                &mut self.graph,
                &self.contracted,
                self.restrictions.as_ref(),
                element.vertex,
            )?;
            if priority > element.priority {
                element.priority = priority;
                self.queue.push(element);
                continue;
            }

            return Ok(Some(element.vertex));
        }
        Ok(None)
    }

    fn contract_vertex(&mut self, vertex: VertexId) {
        let contracted = &self.contracted;
        self.graph
            .retain_edges(vertex, |edge| !contracted.is_contracted(edge.neighbor()));

        let neighbors = self
            .graph
            .edges(vertex)
            .iter()
            .map(|edge| edge.neighbor())
            .dedup()
            .collect_vec();
        for &neighbor in &neighbors {
            self.graph.remove_edges(neighbor, vertex);
        }

        self.contracted.set_contracted(vertex);
        self.calculator.notify_contracted(&self.graph, vertex);
        self.level_to_vertex.push(vertex);

        debug!(
            "contracted vertex {} at level {} with {} upward neighbors",
            vertex,
            self.level_to_vertex.len() - 1,
            neighbors.len()
        );
    }
}

/// Builds a contraction hierarchy ordered by edge difference, using a
/// Dijkstra witness search.
pub fn contract_with_edge_difference(
    graph: DirectedDynamicGraph,
    restrictions: impl RestrictionProvider + 'static,
    params: &ContractionParams,
) -> Result<ContractedGraph, ContractionError> {
    let calculator = EdgeDifferencePriorityCalculator::new(
        DijkstraWitnessCalculator::new(params.witness_params),
        params.priority_params,
    );
    Contractor::new(graph, calculator)
        .with_restrictions(restrictions)
        .with_seed(params.seed)
        .contract()
}

#[cfg(test)]
mod tests {
    use super::Contractor;
    use crate::{
        ch::{
            contraction_params::PriorityParams,
            priority_function::{
                edge_difference::EdgeDifferencePriorityCalculator, fixed::FixedPriorityCalculator,
            },
            witness::dijkstra_witness::DijkstraWitnessCalculator,
        },
        graphs::{
            dynamic_graph::DirectedDynamicGraph, edge::WeightedEdge,
            graph_functions::add_edge_bidirectional,
        },
    };

    fn chain(number_of_vertices: u32) -> DirectedDynamicGraph {
        let mut graph = DirectedDynamicGraph::new(number_of_vertices);
        for tail in 1..number_of_vertices {
            add_edge_bidirectional(&mut graph, &WeightedEdge::new(tail - 1, tail, 1.0).unwrap())
                .unwrap();
        }
        graph
    }

    #[test]
    fn fixed_priorities_give_fixed_order() {
        let calculator = FixedPriorityCalculator::from_order(&[3, 1, 0, 2]);
        let contracted_graph = Contractor::new(chain(4), calculator).contract().unwrap();

        assert_eq!(contracted_graph.level_to_vertex, vec![3, 1, 0, 2]);
        assert_eq!(contracted_graph.vertex_to_level, vec![2, 1, 3, 0]);
    }

    #[test]
    fn contracted_vertex_keeps_only_upward_edges() {
        let calculator = FixedPriorityCalculator::from_order(&[1, 0, 2]);
        let mut contractor = Contractor::new(chain(3), calculator);

        assert_eq!(contractor.contract_next().unwrap(), Some(1));
        assert!(contractor.contracted().is_contracted(1));
        assert!(contractor.graph().edges_between(0, 1).is_empty());
        assert!(contractor.graph().edges_between(2, 1).is_empty());
        assert_eq!(contractor.graph().edges(1).len(), 2);

        assert_eq!(contractor.contract_next().unwrap(), Some(0));
        assert_eq!(contractor.contract_next().unwrap(), Some(2));
        assert_eq!(contractor.contract_next().unwrap(), None);
    }

    #[test]
    fn every_vertex_gets_a_level() {
        let calculator = EdgeDifferencePriorityCalculator::new(
            DijkstraWitnessCalculator::default(),
            PriorityParams::default(),
        );
        let contracted_graph = Contractor::new(chain(5), calculator)
            .with_seed(Some(0))
            .contract()
            .unwrap();

        assert_eq!(contracted_graph.level_to_vertex.len(), 5);
        for vertex in 0..5 {
            let level = contracted_graph.level(vertex).unwrap();
            assert_eq!(contracted_graph.level_to_vertex[level as usize], vertex);
            for edge in contracted_graph.graph.edges(vertex) {
                assert!(contracted_graph.level(edge.neighbor()).unwrap() > level);
            }
        }
    }
}
