//! Ready-made example networks.
//!
//! These are small, well-understood topologies used in documentation, tests
//! and quick experiments. [`named_network`] resolves a name to a network
//! together with sensible search options for it.

use crate::contractionpath::contraction_cost::Cost;
use crate::contractionpath::paths::optimal_slicing::{SearchError, SearchOptions};
use crate::tensornetwork::TensorNetwork;

/// An open chain of `length` matrices, the matrix-product shape: tensor `i`
/// carries the edges `i` and `i + 1`, the two boundary edges stay open. The
/// boundary edges have dimension 2, the internal bonds dimension 4.
pub fn chain(length: usize) -> TensorNetwork {
    assert!(length >= 1, "a chain needs at least one tensor");
    let inputs = (0..length).map(|i| vec![i, i + 1]).collect();
    let sizes = (0..=length).map(|edge| {
        let dim = if edge == 0 || edge == length { 2 } else { 4 };
        (edge, Cost::constant(dim))
    });
    TensorNetwork::new(inputs, vec![0, length], sizes, Vec::new())
}

/// Two small tensors joined by a single bond of symbolic dimension, the
/// minimal network where slicing pays off: cutting the bridge makes both
/// halves independent.
pub fn bridge() -> TensorNetwork {
    TensorNetwork::new(
        vec![vec![0, 1], vec![1, 2]],
        vec![0, 2],
        [
            (0, Cost::constant(2)),
            (1, Cost::variable()),
            (2, Cost::constant(2)),
        ],
        Vec::new(),
    )
}

/// A periodic chain of `length` matrices contracting to a scalar, the trace
/// of a matrix product. All bonds have symbolic dimension.
pub fn ring(length: usize) -> TensorNetwork {
    assert!(length >= 3, "a ring needs at least three tensors");
    let inputs = (0..length).map(|i| vec![i, (i + 1) % length]).collect();
    let sizes = (0..length).map(|edge| (edge, Cost::variable()));
    TensorNetwork::new(inputs, Vec::new(), sizes, Vec::new())
}

/// Resolves a registered network name to the network and the search options
/// it is usually searched with.
///
/// Registered names are `"chain"`, `"bridge"` and `"ring"`.
pub fn named_network(name: &str) -> Result<(TensorNetwork, SearchOptions), SearchError> {
    match name {
        "chain" => Ok((chain(3), SearchOptions::default())),
        "bridge" => Ok((bridge(), SearchOptions::sliced(1))),
        "ring" => Ok((ring(4), SearchOptions::default())),
        _ => Err(SearchError::UnknownNetwork(name.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_produce_valid_networks() {
        for length in 1..6 {
            assert_eq!(chain(length).validate(), Ok(()));
        }
        assert_eq!(bridge().validate(), Ok(()));
        for length in 3..6 {
            assert_eq!(ring(length).validate(), Ok(()));
        }
    }

    #[test]
    fn test_chain_shape() {
        let tn = chain(3);
        assert_eq!(tn.num_tensors(), 3);
        assert_eq!(tn.output(), &[0, 3]);
        assert_eq!(tn.open_indices(tn.full_subset()).len(), 2);
    }

    #[test]
    fn test_ring_contracts_to_scalar() {
        let tn = ring(4);
        assert!(tn.open_indices(tn.full_subset()).is_empty());
    }

    #[test]
    fn test_named_network_lookup() {
        assert!(named_network("bridge").is_ok());
        assert_eq!(
            named_network("moebius"),
            Err(SearchError::UnknownNetwork("moebius".to_owned()))
        );
    }
}
