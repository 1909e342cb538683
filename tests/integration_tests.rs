use std::collections::BTreeSet;

use tnslice::builders::{bridge, chain, ring};
use tnslice::contractionpath::contraction_cost::Cost;
use tnslice::contractionpath::paths::optimal_slicing::{
    search, search_named, OptimalSlicing, SearchError, SearchOptions, SearchOutcome,
};
use tnslice::contractionpath::paths::{CostType, FindPath};
use tnslice::path;
use tnslice::tensornetwork::TensorNetwork;

fn monomial(coefficient: u128, degree: usize) -> Cost {
    let mut cost = Cost::constant(coefficient);
    for _ in 0..degree {
        cost = &cost * &Cost::variable();
    }
    cost
}

#[test]
fn test_chain_end_to_end() {
    let outcome = search(&chain(3), &SearchOptions::default()).unwrap();
    assert_eq!(outcome.path, path![(1, 2), (0, 3)]);
    assert_eq!(outcome.cost, Cost::constant(48));
    assert!(outcome.sliced.is_empty());
}

#[test]
fn test_longer_chain_through_optimizer_trait() {
    let tn = chain(5);
    let mut optimizer = OptimalSlicing::new(&tn, SearchOptions::default());
    optimizer.find_path().unwrap();

    // Five tensors always need exactly four pairwise merges.
    assert_eq!(optimizer.get_best_path().len(), 4);
    assert_eq!(optimizer.get_best_replace_path().len(), 4);
    // The replace path stays within the original tensor slots.
    assert!(optimizer
        .get_best_replace_path()
        .iter()
        .all(|&(t0, t1)| t0 < 5 && t1 < 5));
    assert!(optimizer.get_best_slicing().is_empty());
}

#[test]
fn test_chain_slicing_meets_leaf_floor() {
    // Slicing the third bond lets every step of chain(4) fit below the
    // largest input tensor, so the peak footprint drops to that floor.
    let outcome = search(&chain(4), &SearchOptions::sliced(2)).unwrap();
    assert_eq!(outcome.sliced, BTreeSet::from_iter([2]));
    assert_eq!(outcome.cost, Cost::constant(16));

    // Without slicing, the first merge alone already touches 32 elements.
    let unsliced = search(&chain(4), &SearchOptions::sliced(0)).unwrap();
    assert_eq!(unsliced.cost, Cost::constant(32));
}

#[test]
fn test_ring_trace_cost() {
    let outcome = search(&ring(4), &SearchOptions::default()).unwrap();
    assert_eq!(outcome.path.len(), 3);
    // Two bond-closing merges at x^3 each, plus the final x^2 trace step.
    assert_eq!(outcome.cost, &monomial(2, 3) + &monomial(1, 2));
    assert!(outcome.sliced.is_empty());
}

#[test]
fn test_named_bridge_slices_its_bond() {
    let outcome = search_named("bridge").unwrap();
    assert_eq!(outcome.sliced, BTreeSet::from_iter([1]));
    assert_eq!(outcome.cost, monomial(2, 1));
}

#[test]
fn test_parallel_edges_end_to_end() {
    let tn = TensorNetwork::new(
        vec![vec![0, 1, 2], vec![1, 2, 3]],
        vec![0, 3],
        [
            (0, Cost::constant(2)),
            (1, Cost::variable()),
            (2, Cost::variable()),
            (3, Cost::constant(2)),
        ],
        vec![vec![1, 2]],
    );
    let outcome = search(&tn, &SearchOptions::sliced(2)).unwrap();
    // Only the group head gets sliced; its partner would not lower the peak.
    assert_eq!(outcome.sliced, BTreeSet::from_iter([1]));
    assert_eq!(outcome.cost, monomial(2, 2));
}

#[test]
fn test_flops_and_size_disagree_on_slicing() {
    let tn = bridge();
    let size_options = SearchOptions::sliced(1);
    let flops_options = SearchOptions {
        minimize: CostType::Flops,
        max_sliced: 1,
        sliceable: None,
    };
    assert!(!search(&tn, &size_options).unwrap().sliced.is_empty());
    assert!(search(&tn, &flops_options).unwrap().sliced.is_empty());
}

#[test]
fn test_disconnected_input_reports_infeasible() {
    let tn = TensorNetwork::new(
        vec![vec![0], vec![1]],
        vec![0, 1],
        [(0, Cost::constant(2)), (1, Cost::constant(2))],
        Vec::new(),
    );
    assert_eq!(
        search(&tn, &SearchOptions::default()),
        Err(SearchError::Infeasible)
    );
}

#[test]
fn test_outcome_survives_serialization() {
    let outcome = search_named("bridge").unwrap();
    let json = serde_json::to_string(&outcome).unwrap();
    let roundtrip: SearchOutcome = serde_json::from_str(&json).unwrap();
    assert_eq!(outcome, roundtrip);
}

#[test]
fn test_network_survives_serialization() {
    let tn = chain(3);
    let json = serde_json::to_string(&tn).unwrap();
    let roundtrip: TensorNetwork = serde_json::from_str(&json).unwrap();
    assert_eq!(tn, roundtrip);

    let original = search(&tn, &SearchOptions::default()).unwrap();
    let reloaded = search(&roundtrip, &SearchOptions::default()).unwrap();
    assert_eq!(original, reloaded);
}
