//! Parameters for the priority calculation and the contraction run.

use serde::{Deserialize, Serialize};

/// Coefficients of the priority function.
///
/// The priority of a vertex is
/// `difference_factor * (added - removed) + depth_factor * depth +
/// contracted_factor * contracted_neighbors`; vertices with a lower priority
/// are contracted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityParams {
    pub difference_factor: i32,
    pub depth_factor: i32,
    pub contracted_factor: i32,
    /// Count every neighbor contraction instead of only the first one. Off by
    /// default, which keeps the count of a vertex at most 1.
    pub accumulate_contracted_neighbors: bool,
}

impl PriorityParams {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn difference_factor(mut self, factor: i32) -> Self {
        self.difference_factor = factor;
        self
    }

    pub fn depth_factor(mut self, factor: i32) -> Self {
        self.depth_factor = factor;
        self
    }

    pub fn contracted_factor(mut self, factor: i32) -> Self {
        self.contracted_factor = factor;
        self
    }

    pub fn accumulate_contracted_neighbors(mut self, accumulate: bool) -> Self {
        self.accumulate_contracted_neighbors = accumulate;
        self
    }
}

impl Default for PriorityParams {
    fn default() -> Self {
        PriorityParams {
            difference_factor: 1,
            depth_factor: 2,
            contracted_factor: 1,
            accumulate_contracted_neighbors: false,
        }
    }
}

/// Limits of the Dijkstra witness search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WitnessParams {
    pub max_hops: u32,
    pub max_settled: usize,
}

impl WitnessParams {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn max_hops(mut self, max_hops: u32) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn max_settled(mut self, max_settled: usize) -> Self {
        self.max_settled = max_settled;
        self
    }
}

impl Default for WitnessParams {
    fn default() -> Self {
        WitnessParams {
            max_hops: 16,
            max_settled: usize::MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractionParams {
    pub priority_params: PriorityParams,
    pub witness_params: WitnessParams,
    /// Seed for the order in which the queue is initialised. Random if unset.
    pub seed: Option<u64>,
}

impl ContractionParams {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn priority_params(mut self, params: PriorityParams) -> Self {
        self.priority_params = params;
        self
    }

    pub fn witness_params(mut self, params: WitnessParams) -> Self {
        self.witness_params = params;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ContractionParams, PriorityParams};

    #[test]
    fn defaults() {
        let params = PriorityParams::default();
        assert_eq!(params.difference_factor, 1);
        assert_eq!(params.depth_factor, 2);
        assert_eq!(params.contracted_factor, 1);
        assert!(!params.accumulate_contracted_neighbors);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "priority_params": { "depth_factor": 5 }, "seed": 3 }"#;
        let params: ContractionParams = serde_json::from_str(json).unwrap();

        assert_eq!(params.priority_params.depth_factor, 5);
        assert_eq!(params.priority_params.difference_factor, 1);
        assert_eq!(params.witness_params.max_hops, 16);
        assert_eq!(params.seed, Some(3));
    }
}
