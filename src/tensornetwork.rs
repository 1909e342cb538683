//! The immutable tensor network description the search operates on.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contractionpath::contraction_cost::Cost;
use crate::types::{EdgeIndex, TensorSubset, MAX_TENSORS};

/// Structural problems that make a network unusable for the search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("index {0} has no entry in the size table")]
    MissingSize(EdgeIndex),
    #[error("output index {0} does not appear in any input tensor")]
    UnknownOutputIndex(EdgeIndex),
    #[error("parallel edge index {0} does not appear in any input tensor")]
    UnknownParallelIndex(EdgeIndex),
    #[error("index {0} appears in more than one parallel edge group")]
    OverlappingParallelGroups(EdgeIndex),
    #[error("network has {0} tensors, at most {MAX_TENSORS} are supported")]
    TooManyTensors(usize),
}

/// A tensor network: input tensors given as lists of edge ids, the edge ids
/// that must remain open in the result, a size table assigning each edge a
/// symbolic bond dimension, and optional parallel-edge groups constraining the
/// order in which symmetry-linked edges may be sliced.
///
/// Tensor identity is positional; the network is immutable for the duration
/// of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorNetwork {
    inputs: Vec<Vec<EdgeIndex>>,
    output: Vec<EdgeIndex>,
    size_dict: FxHashMap<EdgeIndex, Cost>,
    parallel_edges: Vec<Vec<EdgeIndex>>,
}

impl TensorNetwork {
    /// Creates a network from its parts. No validation happens here; the
    /// search validates before touching the table, see [`Self::validate`].
    pub fn new(
        inputs: Vec<Vec<EdgeIndex>>,
        output: Vec<EdgeIndex>,
        size_dict: impl IntoIterator<Item = (EdgeIndex, Cost)>,
        parallel_edges: Vec<Vec<EdgeIndex>>,
    ) -> Self {
        Self {
            inputs,
            output,
            size_dict: FxHashMap::from_iter(size_dict),
            parallel_edges,
        }
    }

    /// The input tensors, each a list of edge ids.
    #[inline]
    pub fn inputs(&self) -> &[Vec<EdgeIndex>] {
        &self.inputs
    }

    /// The edge ids of the final result.
    #[inline]
    pub fn output(&self) -> &[EdgeIndex] {
        &self.output
    }

    /// The bond dimension of every edge in the network.
    #[inline]
    pub fn size_dict(&self) -> &FxHashMap<EdgeIndex, Cost> {
        &self.size_dict
    }

    /// The parallel-edge groups, each in its canonical slicing order.
    #[inline]
    pub fn parallel_edges(&self) -> &[Vec<EdgeIndex>] {
        &self.parallel_edges
    }

    /// The number of input tensors.
    #[inline]
    pub fn num_tensors(&self) -> usize {
        self.inputs.len()
    }

    /// The subset containing every input tensor.
    #[inline]
    pub fn full_subset(&self) -> TensorSubset {
        TensorSubset::full(self.num_tensors())
    }

    /// Every edge id that appears in at least one tensor of `subset`.
    pub fn all_indices(&self, subset: TensorSubset) -> BTreeSet<EdgeIndex> {
        subset
            .iter()
            .flat_map(|tensor| self.inputs[tensor].iter().copied())
            .collect()
    }

    /// The edge ids of the intermediate tensor obtained by contracting
    /// `subset` as a standalone sub-network: an index survives if it appears
    /// in the declared output or in a tensor outside the subset; an index
    /// internal to the subset is summed away.
    ///
    /// # Examples
    /// ```
    /// # use tnslice::contractionpath::contraction_cost::Cost;
    /// # use tnslice::tensornetwork::TensorNetwork;
    /// # use tnslice::types::TensorSubset;
    /// let tn = TensorNetwork::new(
    ///     vec![vec![0, 1], vec![1, 2], vec![2, 3]],
    ///     vec![0, 3],
    ///     (0..4).map(|e| (e, Cost::constant(2))),
    ///     Vec::new(),
    /// );
    /// let open = tn.open_indices(TensorSubset::from_iter([0, 1]));
    /// assert_eq!(open.into_iter().collect::<Vec<_>>(), vec![0, 2]);
    /// ```
    pub fn open_indices(&self, subset: TensorSubset) -> BTreeSet<EdgeIndex> {
        self.all_indices(subset)
            .into_iter()
            .filter(|index| {
                self.output.contains(index)
                    || self
                        .inputs
                        .iter()
                        .enumerate()
                        .any(|(tensor, legs)| !subset.contains(tensor) && legs.contains(index))
            })
            .collect()
    }

    /// Checks the structural invariants the search relies on. Called by the
    /// table initialization, so a malformed network fails fast instead of
    /// producing a nonsensical path.
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.num_tensors() > MAX_TENSORS {
            return Err(NetworkError::TooManyTensors(self.num_tensors()));
        }

        let known: BTreeSet<EdgeIndex> = self.inputs.iter().flatten().copied().collect();
        for &index in self.inputs.iter().flatten().chain(&self.output) {
            if !self.size_dict.contains_key(&index) {
                return Err(NetworkError::MissingSize(index));
            }
        }
        for &index in &self.output {
            if !known.contains(&index) {
                return Err(NetworkError::UnknownOutputIndex(index));
            }
        }

        let mut grouped = BTreeSet::new();
        for &index in self.parallel_edges.iter().flatten() {
            if !known.contains(&index) {
                return Err(NetworkError::UnknownParallelIndex(index));
            }
            if !grouped.insert(index) {
                return Err(NetworkError::OverlappingParallelGroups(index));
            }
        }
        Ok(())
    }

    /// Whether `index` is kept open in the final result.
    #[inline]
    pub(crate) fn is_output(&self, index: EdgeIndex) -> bool {
        self.output.contains(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> TensorNetwork {
        TensorNetwork::new(
            vec![vec![0, 1], vec![1, 2], vec![2, 3]],
            vec![0, 3],
            (0..4).map(|e| (e, Cost::constant(2))),
            Vec::new(),
        )
    }

    #[test]
    fn test_all_indices() {
        let tn = chain();
        let all = tn.all_indices(TensorSubset::from_iter([0, 2]));
        assert_eq!(all.into_iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_open_indices_contracts_internal_edges() {
        let tn = chain();
        let open = tn.open_indices(TensorSubset::from_iter([0, 1]));
        // Edge 1 is internal to {0, 1}; edge 2 still connects to tensor 2.
        assert_eq!(open.into_iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_open_indices_of_full_network_is_output() {
        let tn = chain();
        let open = tn.open_indices(tn.full_subset());
        assert_eq!(open.into_iter().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn test_open_indices_hyperedge() {
        // Edge 0 appears in three tensors; contracting two of them keeps it open.
        let tn = TensorNetwork::new(
            vec![vec![0, 1], vec![0, 2], vec![0, 3]],
            vec![1, 2, 3],
            (0..4).map(|e| (e, Cost::constant(2))),
            Vec::new(),
        );
        let open = tn.open_indices(TensorSubset::from_iter([0, 1]));
        assert_eq!(open.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        let open = tn.open_indices(tn.full_subset());
        assert_eq!(open.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_validate_ok() {
        assert_eq!(chain().validate(), Ok(()));
    }

    #[test]
    fn test_validate_missing_size() {
        let tn = TensorNetwork::new(
            vec![vec![0, 1]],
            vec![0],
            [(0, Cost::constant(2))],
            Vec::new(),
        );
        assert_eq!(tn.validate(), Err(NetworkError::MissingSize(1)));
    }

    #[test]
    fn test_validate_unknown_output() {
        let tn = TensorNetwork::new(
            vec![vec![0]],
            vec![7],
            [(0, Cost::constant(2)), (7, Cost::constant(2))],
            Vec::new(),
        );
        assert_eq!(tn.validate(), Err(NetworkError::UnknownOutputIndex(7)));
    }

    #[test]
    fn test_validate_overlapping_groups() {
        let tn = TensorNetwork::new(
            vec![vec![0, 1], vec![1, 2]],
            vec![0, 2],
            (0..3).map(|e| (e, Cost::constant(2))),
            vec![vec![0, 1], vec![1, 2]],
        );
        assert_eq!(tn.validate(), Err(NetworkError::OverlappingParallelGroups(1)));
    }

    #[test]
    fn test_validate_unknown_parallel_index() {
        let tn = TensorNetwork::new(
            vec![vec![0, 1]],
            vec![0, 1],
            [(0, Cost::constant(2)), (1, Cost::constant(2))],
            vec![vec![9]],
        );
        assert_eq!(tn.validate(), Err(NetworkError::UnknownParallelIndex(9)));
    }
}
