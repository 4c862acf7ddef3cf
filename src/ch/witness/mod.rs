use thiserror::Error;

use crate::{
    graphs::{dynamic_graph::DirectedDynamicGraph, GraphError, VertexId, Weight},
    restrictions::RestrictionProvider,
};

pub mod dijkstra_witness;

/// Outcome of a witness query for one candidate shortcut.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WitnessPath {
    /// The candidate is impossible by direction, no search was made.
    NotRequested,
    /// A shortest path between the endpoints within the bound, from the
    /// search source to the target.
    Found(Vec<VertexId>),
    /// No path within the bound was found.
    #[default]
    NotFound,
}

impl WitnessPath {
    /// Whether the route between the endpoints has to pass through `vertex`,
    /// that is whether a shortcut standing in for `vertex` is needed.
    pub fn routes_through(&self, vertex: VertexId) -> bool {
        match self {
            WitnessPath::NotRequested => false,
            WitnessPath::Found(path) => path.contains(&vertex),
            WitnessPath::NotFound => true,
        }
    }

    pub fn is_requested(&self) -> bool {
        !matches!(self, WitnessPath::NotRequested)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WitnessError {
    #[error(
        "witness batch has mismatched lengths: {targets} targets, {weights} weights, \
         {forward} forward and {backward} backward slots"
    )]
    MismatchedBatch {
        targets: usize,
        weights: usize,
        forward: usize,
        backward: usize,
    },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Batched witness search.
pub trait WitnessCalculator {
    /// Searches from `source` to every target for the shortest path, telling
    /// whether it has to pass through `pivot`.
    ///
    /// `targets`, `max_weights`, `forward` and `backward` are parallel. Slots
    /// marked [`WitnessPath::NotRequested`] must be left untouched. Every other
    /// slot is set to [`WitnessPath::Found`] with a shortest path of at most the
    /// target's bound (source -> target for `forward`, target -> source for
    /// `backward`) and to [`WitnessPath::NotFound`] if there is none. A found
    /// path contains `pivot` only if no path of equal weight avoids it.
    #[allow(clippy::too_many_arguments)]
    fn calculate(
        &mut self,
        graph: &DirectedDynamicGraph,
        restrictions: &dyn RestrictionProvider,
        source: VertexId,
        pivot: VertexId,
        targets: &[VertexId],
        max_weights: &[Weight],
        forward: &mut [WitnessPath],
        backward: &mut [WitnessPath],
    ) -> Result<(), WitnessError>;
}

pub fn check_batch(
    targets: &[VertexId],
    max_weights: &[Weight],
    forward: &[WitnessPath],
    backward: &[WitnessPath],
) -> Result<(), WitnessError> {
    let length = targets.len();
    if max_weights.len() != length || forward.len() != length || backward.len() != length {
        return Err(WitnessError::MismatchedBatch {
            targets: targets.len(),
            weights: max_weights.len(),
            forward: forward.len(),
            backward: backward.len(),
        });
    }
    Ok(())
}
