//! Admissibility rules for slice sets.
//!
//! Parallel-edge groups mark indices that are linked by a structural symmetry
//! of the network: slicing any one of them is equivalent to slicing any
//! other, so the search only considers the canonical representative
//! configurations. Within a group the sliced members must form a prefix of
//! the declared order, and groups themselves are consumed in declaration
//! order.

use std::collections::BTreeSet;

use crate::types::EdgeIndex;

/// Checks whether `sliced_inds` is selected in the canonical order imposed by
/// `parallel_edges`, considering only group members that occur in `inds` (the
/// indices visible to the sub-network under consideration).
///
/// Two rules, both restricted to the visible members of each group:
/// - the sliced members of a group must be a prefix of the group's order;
/// - a group may only start slicing once every earlier group is fully sliced.
///
/// Indices outside any group are unconstrained. Violations are a normal part
/// of candidate filtering, not an error.
///
/// # Examples
/// ```
/// # use std::collections::BTreeSet;
/// # use tnslice::contractionpath::paths::optimal_slicing::slicing::check_parallel_edges;
/// let groups = vec![vec![0, 1]];
/// let inds = BTreeSet::from_iter([0, 1, 2]);
/// assert!(check_parallel_edges(&groups, &inds, &BTreeSet::from_iter([0])));
/// assert!(!check_parallel_edges(&groups, &inds, &BTreeSet::from_iter([1])));
/// ```
pub fn check_parallel_edges(
    parallel_edges: &[Vec<EdgeIndex>],
    inds: &BTreeSet<EdgeIndex>,
    sliced_inds: &BTreeSet<EdgeIndex>,
) -> bool {
    let mut earlier_fully_sliced = true;
    for group in parallel_edges {
        let visible: Vec<EdgeIndex> = group
            .iter()
            .filter(|index| inds.contains(index))
            .copied()
            .collect();
        if visible.is_empty() {
            continue;
        }

        let sliced_count = visible
            .iter()
            .filter(|index| sliced_inds.contains(index))
            .count();
        let is_prefix = visible[..sliced_count]
            .iter()
            .all(|index| sliced_inds.contains(index));
        if !is_prefix {
            return false;
        }
        if sliced_count > 0 && !earlier_fully_sliced {
            return false;
        }
        earlier_fully_sliced &= sliced_count == visible.len();
    }
    true
}
