use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};

use super::{check_batch, WitnessCalculator, WitnessError, WitnessPath};
use crate::{
    ch::contraction_params::WitnessParams,
    graphs::{dynamic_graph::DirectedDynamicGraph, VertexId, Weight},
    queue::{radix_queue::RadixQueue, DijkstraQueueElement},
    restrictions::{completes_restriction, Restriction, RestrictionProvider},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SearchDirection {
    Forward,
    Backward,
}

/// Bounded Dijkstra witness search. Reports the shortest path to every target
/// within its bound; among paths of equal weight one avoiding the pivot is
/// preferred. The forward and the backward search of a batch run in parallel.
#[derive(Clone, Debug, Default)]
pub struct DijkstraWitnessCalculator {
    params: WitnessParams,
}

impl DijkstraWitnessCalculator {
    pub fn new(params: WitnessParams) -> Self {
        DijkstraWitnessCalculator { params }
    }

    pub fn params(&self) -> &WitnessParams {
        &self.params
    }
}

impl WitnessCalculator for DijkstraWitnessCalculator {
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
    ) -> Result<(), WitnessError> {
        check_batch(targets, max_weights, forward, backward)?;

        let search = WitnessSearch {
            graph,
            restrictions,
            params: &self.params,
            source,
            pivot,
            targets,
            max_weights,
        };
        let (forward_slots, backward_slots) = (&*forward, &*backward);
        let (forward_paths, backward_paths) = rayon::join(
            || search.search(SearchDirection::Forward, forward_slots),
            || search.search(SearchDirection::Backward, backward_slots),
        );

        write_results(forward, forward_paths);
        write_results(backward, backward_paths);
        Ok(())
    }
}

fn write_results(slots: &mut [WitnessPath], results: Vec<Option<WitnessPath>>) {
    for (slot, result) in slots.iter_mut().zip(results) {
        if let Some(result) = result {
            *slot = result;
        }
    }
}

struct WitnessSearch<'a> {
    graph: &'a DirectedDynamicGraph,
    restrictions: &'a dyn RestrictionProvider,
    params: &'a WitnessParams,
    source: VertexId,
    pivot: VertexId,
    targets: &'a [VertexId],
    max_weights: &'a [Weight],
}

impl<'a> WitnessSearch<'a> {
    /// Returns one entry per target, `None` for slots that were not requested.
    fn search(
        &self,
        direction: SearchDirection,
        slots: &[WitnessPath],
    ) -> Vec<Option<WitnessPath>> {
        let bounds: Vec<Option<Weight>> = slots
            .iter()
            .zip(self.max_weights)
            .map(|(slot, &max_weight)| slot.is_requested().then_some(max_weight))
            .collect();
        let mut found = self.run(direction, &bounds, false);

        // Zero weight edges can settle a target through the pivot before a
        // detour of the same weight is relaxed.
        let detour_bounds: Vec<Option<Weight>> = found
            .iter()
            .map(|entry| match entry {
                Some((weight, path)) if path.contains(&self.pivot) => Some(*weight),
                _ => None,
            })
            .collect();
        if detour_bounds.iter().any(Option::is_some) {
            let detours = self.run(direction, &detour_bounds, true);
            for (entry, detour) in found.iter_mut().zip(detours) {
                if detour.is_some() {
                    *entry = detour;
                }
            }
        }

        bounds
            .iter()
            .zip(found)
            .map(|(bound, entry)| {
                bound.map(|_| match entry {
                    Some((_, path)) => WitnessPath::Found(path),
                    None => WitnessPath::NotFound,
                })
            })
            .collect()
    }

    /// Shortest paths to the targets that have a bound, with their weight.
    /// With `avoid_pivot` the search never enters the pivot.
    fn run(
        &self,
        direction: SearchDirection,
        bounds: &[Option<Weight>],
        avoid_pivot: bool,
    ) -> Vec<Option<(Weight, Vec<VertexId>)>> {
        let mut results = vec![None; bounds.len()];

        // target -> indices of the batch waiting for it
        let mut pending: HashMap<VertexId, Vec<usize>> = HashMap::new();
        let mut max_weight: Weight = 0.0;
        for (index, bound) in bounds.iter().enumerate() {
            if let Some(bound) = *bound {
                pending.entry(self.targets[index]).or_default().push(index);
                max_weight = max_weight.max(bound);
            }
        }
        if pending.is_empty() {
            return results;
        }

        let mut queue = RadixQueue::new();
        let mut weights = HashMap::new();
        let mut hops = HashMap::new();
        let mut predecessors = HashMap::new();
        let mut through_pivot = HashMap::new();
        let mut settled = HashSet::new();

        queue.push(DijkstraQueueElement::new(0.0, self.source));
        weights.insert(self.source, 0.0);
        hops.insert(self.source, 0u32);
        through_pivot.insert(self.source, false);

        while let Some(DijkstraQueueElement { weight, vertex }) = queue.pop() {
            if weight > max_weight {
                break;
            }
            if !settled.insert(vertex) {
                continue;
            }

            if let Some(indices) = pending.remove(&vertex) {
                let path = path_to(vertex, &predecessors);
                for index in indices {
                    if bounds[index].is_some_and(|bound| weight <= bound) {
                        results[index] = Some((weight, path.clone()));
                    }
                }
                if pending.is_empty() {
                    break;
                }
            }
            if settled.len() >= self.params.max_settled {
                break;
            }

            let alternative_hops = hops[&vertex] + 1;
            if alternative_hops > self.params.max_hops {
                continue;
            }
            let vertex_through_pivot = through_pivot[&vertex];

            for edge in self.graph.edges(vertex) {
                let traversable = match direction {
                    SearchDirection::Forward => edge.direction().can_move_forward(),
                    SearchDirection::Backward => edge.direction().can_move_backward(),
                };
                let head = edge.neighbor();
                if !traversable || settled.contains(&head) {
                    continue;
                }
                if avoid_pivot && head == self.pivot {
                    continue;
                }

                let alternative_weight = weight + edge.weight();
                if alternative_weight > max_weight {
                    continue;
                }
                let alternative_through_pivot = vertex_through_pivot || head == self.pivot;
                let current_weight = *weights.get(&head).unwrap_or(&Weight::MAX);
                let improves = alternative_weight < current_weight
                    || (alternative_weight == current_weight
                        && through_pivot.get(&head) == Some(&true)
                        && !alternative_through_pivot);
                if !improves {
                    continue;
                }
                if self.is_restricted(direction, vertex, head, &predecessors) {
                    continue;
                }

                weights.insert(head, alternative_weight);
                hops.insert(head, alternative_hops);
                predecessors.insert(head, vertex);
                through_pivot.insert(head, alternative_through_pivot);
                queue.push(DijkstraQueueElement::new(alternative_weight, head));
            }
        }

        results
    }

    /// Whether extending the search path to `vertex` by `head` completes a
    /// restriction. Only the settled predecessor chain is checked, so this
    /// can reject a detour that would have been allowed, never the other
    /// way round.
    fn is_restricted(
        &self,
        direction: SearchDirection,
        vertex: VertexId,
        head: VertexId,
        predecessors: &HashMap<VertexId, VertexId>,
    ) -> bool {
        if !self.restrictions.has_restrictions(head) {
            return false;
        }

        let mut path = path_to(vertex, predecessors);
        path.push(head);
        let restrictions = self.restrictions.restrictions(head);
        match direction {
            SearchDirection::Forward => completes_restriction(&path, &restrictions),
            // the backward search walks against the travel direction
            SearchDirection::Backward => {
                let reversed: Vec<Restriction> = restrictions
                    .iter()
                    .map(|restriction| restriction.iter().rev().copied().collect())
                    .collect();
                completes_restriction(&path, &reversed)
            }
        }
    }
}

fn path_to(target: VertexId, predecessors: &HashMap<VertexId, VertexId>) -> Vec<VertexId> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(&predecessor) = predecessors.get(&current) {
        path.push(predecessor);
        current = predecessor;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::DijkstraWitnessCalculator;
    use crate::{
        ch::{
            contraction_params::WitnessParams,
            witness::{WitnessCalculator, WitnessPath},
        },
        graphs::{
            dynamic_graph::DirectedDynamicGraph,
            edge::{Direction, WeightedEdge},
            graph_functions::add_edge_bidirectional,
            Weight,
        },
        restrictions::{NoRestrictions, RestrictionMap, RestrictionProvider},
    };

    // 0 - 1 - 2 with a detour 0 - 3 - 2
    fn diamond(detour_weight: f32) -> DirectedDynamicGraph {
        let mut graph = DirectedDynamicGraph::new(4);
        for (tail, head, weight) in [
            (0, 1, 1.0),
            (1, 2, 1.0),
            (0, 3, detour_weight),
            (3, 2, detour_weight),
        ] {
            add_edge_bidirectional(&mut graph, &WeightedEdge::new(tail, head, weight).unwrap())
                .unwrap();
        }
        graph
    }

    // Searches from 0 to 2 with pivot 1.
    fn query(
        graph: &DirectedDynamicGraph,
        restrictions: &dyn RestrictionProvider,
        max_weight: Weight,
        forward_requested: bool,
    ) -> (WitnessPath, WitnessPath) {
        let mut calculator = DijkstraWitnessCalculator::default();
        let mut forward = vec![if forward_requested {
            WitnessPath::NotFound
        } else {
            WitnessPath::NotRequested
        }];
        let mut backward = vec![WitnessPath::NotFound];
        calculator
            .calculate(
                graph,
                restrictions,
                0,
                1,
                &[2],
                &[max_weight],
                &mut forward,
                &mut backward,
            )
            .unwrap();
        (forward.remove(0), backward.remove(0))
    }

    #[test]
    fn shorter_detour_is_a_witness() {
        let graph = diamond(0.5);
        let (forward, backward) = query(&graph, &NoRestrictions, 2.0, true);
        assert_eq!(forward, WitnessPath::Found(vec![0, 3, 2]));
        assert_eq!(backward, WitnessPath::Found(vec![0, 3, 2]));
        assert!(!forward.routes_through(1));
    }

    #[test]
    fn equal_detour_is_preferred() {
        let graph = diamond(1.0);
        let (forward, backward) = query(&graph, &NoRestrictions, 2.0, true);
        assert_eq!(forward, WitnessPath::Found(vec![0, 3, 2]));
        assert_eq!(backward, WitnessPath::Found(vec![0, 3, 2]));
    }

    #[test]
    fn zero_weight_detour_is_preferred() {
        let mut graph = DirectedDynamicGraph::new(4);
        for (tail, head, weight) in [(0, 1, 1.0), (1, 2, 1.0), (0, 3, 2.0), (3, 2, 0.0)] {
            add_edge_bidirectional(&mut graph, &WeightedEdge::new(tail, head, weight).unwrap())
                .unwrap();
        }

        let (forward, backward) = query(&graph, &NoRestrictions, 2.0, true);
        assert_eq!(forward, WitnessPath::Found(vec![0, 3, 2]));
        assert_eq!(backward, WitnessPath::Found(vec![0, 3, 2]));
    }

    #[test]
    fn longer_detour_routes_through_pivot() {
        let graph = diamond(1.5);
        let (forward, backward) = query(&graph, &NoRestrictions, 2.0, true);
        assert_eq!(forward, WitnessPath::Found(vec![0, 1, 2]));
        assert!(forward.routes_through(1));
        assert!(backward.routes_through(1));
    }

    #[test]
    fn nothing_within_bound_is_not_found() {
        let graph = diamond(1.5);
        let (forward, backward) = query(&graph, &NoRestrictions, 1.5, true);
        assert_eq!(forward, WitnessPath::NotFound);
        assert_eq!(backward, WitnessPath::NotFound);
    }

    #[test]
    fn not_requested_slots_are_untouched() {
        let graph = diamond(0.5);
        let (forward, backward) = query(&graph, &NoRestrictions, 2.0, false);
        assert_eq!(forward, WitnessPath::NotRequested);
        assert!(matches!(backward, WitnessPath::Found(_)));
    }

    #[test]
    fn one_way_detour_only_serves_one_direction() {
        let mut graph = DirectedDynamicGraph::new(4);
        add_edge_bidirectional(&mut graph, &WeightedEdge::new(0, 1, 1.0).unwrap()).unwrap();
        add_edge_bidirectional(&mut graph, &WeightedEdge::new(1, 2, 1.0).unwrap()).unwrap();
        for (tail, head) in [(0, 3), (3, 2)] {
            graph
                .try_add_or_update_edge(tail, head, 0.5, Direction::Forward, None)
                .unwrap();
            graph
                .try_add_or_update_edge(head, tail, 0.5, Direction::Backward, None)
                .unwrap();
        }

        let (forward, backward) = query(&graph, &NoRestrictions, 2.0, true);
        assert_eq!(forward, WitnessPath::Found(vec![0, 3, 2]));
        assert_eq!(backward, WitnessPath::Found(vec![0, 1, 2]));
    }

    #[test]
    fn restricted_detour_is_no_witness() {
        let graph = diamond(0.5);
        let restrictions = RestrictionMap::from_restrictions(vec![vec![0, 3, 2]]);
        let (forward, backward) = query(&graph, &restrictions, Weight::MAX, true);
        assert_eq!(forward, WitnessPath::Found(vec![0, 1, 2]));
        // 2 -> 3 -> 0 is allowed
        assert_eq!(backward, WitnessPath::Found(vec![0, 3, 2]));
    }

    #[test]
    fn hop_limit_stops_search() {
        let graph = diamond(0.5);
        let mut calculator = DijkstraWitnessCalculator::new(WitnessParams::new().max_hops(1));
        assert_eq!(calculator.params().max_hops, 1);
        let mut forward = vec![WitnessPath::NotFound];
        let mut backward = vec![WitnessPath::NotRequested];
        calculator
            .calculate(
                &graph,
                &NoRestrictions,
                0,
                1,
                &[2],
                &[2.0],
                &mut forward,
                &mut backward,
            )
            .unwrap();
        assert_eq!(forward, vec![WitnessPath::NotFound]);
        assert_eq!(backward, vec![WitnessPath::NotRequested]);
    }

    #[test]
    fn settled_limit_stops_search() {
        let graph = diamond(0.5);
        let mut calculator = DijkstraWitnessCalculator::new(WitnessParams::new().max_settled(1));
        let mut forward = vec![WitnessPath::NotFound];
        let mut backward = vec![WitnessPath::NotFound];
        calculator
            .calculate(
                &graph,
                &NoRestrictions,
                0,
                1,
                &[2],
                &[2.0],
                &mut forward,
                &mut backward,
            )
            .unwrap();
        assert_eq!(forward, vec![WitnessPath::NotFound]);
        assert_eq!(backward, vec![WitnessPath::NotFound]);
    }
}
