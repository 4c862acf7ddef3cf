use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};

use super::{
    dynamic_graph::DirectedDynamicGraph,
    edge::{Direction, EdgeUpdate, WeightedEdge},
    GraphError, VertexId, Weight,
};
use crate::queue::{radix_queue::RadixQueue, DijkstraQueueElement};

/// Adds a two-way road as two bidirectional half-edges.
pub fn add_edge_bidirectional(
    graph: &mut DirectedDynamicGraph,
    edge: &WeightedEdge,
) -> Result<EdgeUpdate, GraphError> {
    let mut update = graph.try_add_or_update_edge(
        edge.tail(),
        edge.head(),
        edge.weight(),
        Direction::Bidirectional,
        None,
    )?;
    update += graph.try_add_or_update_edge(
        edge.head(),
        edge.tail(),
        edge.weight(),
        Direction::Bidirectional,
        None,
    )?;
    Ok(update)
}

pub fn neighbors(vertex: VertexId, graph: &DirectedDynamicGraph) -> HashSet<VertexId> {
    let mut neighbors = HashSet::new();

    for edge in graph.edges(vertex) {
        neighbors.insert(edge.neighbor());
    }

    neighbors
}

/// Plain Dijkstra over forward-traversable half-edges, skipping every vertex
/// for which `skip` returns true.
pub fn shortest_distance(
    graph: &DirectedDynamicGraph,
    source: VertexId,
    target: VertexId,
    skip: impl Fn(VertexId) -> bool,
) -> Option<Weight> {
    let mut queue = RadixQueue::new();
    let mut weights: HashMap<VertexId, Weight> = HashMap::new();
    let mut settled = HashSet::new();

    queue.push(DijkstraQueueElement::new(0.0, source));
    weights.insert(source, 0.0);

    while let Some(DijkstraQueueElement { weight, vertex }) = queue.pop() {
        if !settled.insert(vertex) {
            continue;
        }
        if vertex == target {
            return Some(weight);
        }

        for edge in graph.edges(vertex) {
            if !edge.direction().can_move_forward() || skip(edge.neighbor()) {
                continue;
            }
            let alternative_weight = weight + edge.weight();
            let current_weight = *weights.get(&edge.neighbor()).unwrap_or(&Weight::MAX);
            if alternative_weight < current_weight {
                weights.insert(edge.neighbor(), alternative_weight);
                queue.push(DijkstraQueueElement::new(alternative_weight, edge.neighbor()));
            }
        }
    }

    None
}
