use thiserror::Error;

use self::witness::WitnessError;
use crate::graphs::GraphError;

pub mod contracted_flags;
pub mod contracted_graph;
pub mod contraction_params;
pub mod contractor;
pub mod priority_function;
pub mod witness;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContractionError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Witness(#[from] WitnessError),
}

#[cfg(test)]
mod tests {
    use super::ContractionError;
    use crate::{ch::witness::WitnessError, graphs::GraphError};

    #[test]
    fn errors_show_their_cause() {
        let error = ContractionError::from(GraphError::SelfLoop(3));
        assert_eq!(error.to_string(), GraphError::SelfLoop(3).to_string());

        let witness_error = WitnessError::MismatchedBatch {
            targets: 1,
            weights: 2,
            forward: 1,
            backward: 1,
        };
        let error = ContractionError::from(witness_error.clone());
        assert_eq!(error.to_string(), witness_error.to_string());
    }
}
