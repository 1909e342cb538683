//! Contraction path finders.

use std::collections::BTreeSet;

use crate::contractionpath::contraction_cost::Cost;
use crate::contractionpath::{SimplePath, SimplePathRef};
use crate::types::EdgeIndex;

use self::optimal_slicing::SearchError;

pub mod optimal_slicing;

/// An optimizer for finding a contraction path.
pub trait FindPath {
    /// Runs the search. Accessors below are meaningful only after this
    /// returned `Ok`.
    fn find_path(&mut self) -> Result<(), SearchError>;

    /// Returns the best found contraction path in SSA format.
    fn get_best_path(&self) -> SimplePathRef;

    /// Returns the best found contraction path in ReplaceLeft format.
    fn get_best_replace_path(&self) -> SimplePath;

    /// Returns the cost of the best path found.
    fn get_best_cost(&self) -> &Cost;

    /// Returns the indices chosen for slicing along the best path.
    fn get_best_slicing(&self) -> &BTreeSet<EdgeIndex>;
}

/// The cost metric to optimize for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CostType {
    /// Total number of operations, including the repetitions slicing causes.
    #[default]
    Flops,
    /// Peak memory footprint of a single contraction step per slice.
    Size,
}

pub(crate) fn validate_path(path: SimplePathRef, num_tensors: usize) {
    let mut consumed = vec![false; num_tensors + path.len()];
    for (step, &(t0, t1)) in path.iter().enumerate() {
        let known = num_tensors + step;
        for tensor in [t0, t1] {
            assert!(
                tensor < known,
                "contraction {step} references unknown tensor {tensor}, path: {path:?}"
            );
            assert!(
                !consumed[tensor],
                "Contracting already contracted tensors: {tensor:?}, path: {path:?}"
            );
            consumed[tensor] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::path;

    #[test]
    #[should_panic(expected = "Contracting already contracted tensors: 1")]
    fn test_validate_path_double_use() {
        let invalid_path = path![(0, 1), (1, 2)];
        validate_path(&invalid_path, 3);
    }

    #[test]
    #[should_panic(expected = "references unknown tensor 4")]
    fn test_validate_path_unknown_id() {
        let invalid_path = path![(0, 4)];
        validate_path(&invalid_path, 3);
    }

    #[test]
    fn test_validate_path_ok() {
        let path = path![(1, 2), (0, 3)];
        validate_path(&path, 3);
    }
}
