//! Exact contraction-order and slicing search for tensor networks.
//!
//! A tensor network is a hypergraph of multi-dimensional arrays joined by
//! shared indices. Contracting it means combining tensors pairwise until only
//! the declared output indices remain; the order of those pairwise merges
//! determines the computational and memory cost. *Slicing* additionally fixes
//! selected indices to scalar values and sums the partial results afterwards,
//! trading repeated work for a smaller peak footprint.
//!
//! This crate searches the full subset space of a network with a layered
//! dynamic program and returns the best contraction path together with the
//! set of indices worth slicing. Costs are kept symbolic: polynomials in a
//! bond-dimension variable, compared by their leading-order behavior, so the
//! result is an asymptotic statement rather than a flop count for one fixed
//! dimension.
//!
//! # Examples
//! ```
//! use tnslice::contractionpath::paths::optimal_slicing::{search, SearchOptions};
//! use tnslice::contractionpath::contraction_cost::Cost;
//! use tnslice::tensornetwork::TensorNetwork;
//!
//! // A three-tensor chain: {0,1} - {1,2} - {2,3}, output {0, 3}.
//! let tn = TensorNetwork::new(
//!     vec![vec![0, 1], vec![1, 2], vec![2, 3]],
//!     vec![0, 3],
//!     [
//!         (0, Cost::constant(2)),
//!         (1, Cost::constant(4)),
//!         (2, Cost::constant(4)),
//!         (3, Cost::constant(2)),
//!     ],
//!     Vec::new(),
//! );
//! let outcome = search(&tn, &SearchOptions::default()).unwrap();
//! assert_eq!(outcome.cost, Cost::constant(48));
//! assert!(outcome.sliced.is_empty());
//! ```

pub mod builders;
pub mod contractionpath;
pub mod tensornetwork;
pub mod types;
mod utils;
