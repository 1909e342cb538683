//! Contraction paths and everything needed to rank them.

use rustc_hash::FxHashMap;

use crate::types::TensorIndex;
use crate::utils::traits::{HashMapInsertNew, WithCapacity};

pub mod contraction_cost;
pub mod paths;

/// A flat contraction path: a sequence of pairwise merges. Ids below the
/// number of input tensors denote inputs; every merge produces a fresh id in
/// SSA fashion, numbered consecutively after the inputs.
pub type SimplePath = Vec<(TensorIndex, TensorIndex)>;

/// Reference to a [`SimplePath`].
pub type SimplePathRef<'a> = &'a [(TensorIndex, TensorIndex)];

/// Macro to create contraction paths.
///
/// `path![(1, 2), (0, 3)]` first merges tensors 1 and 2 (producing a new
/// tensor), then merges tensor 0 with that result (id 3 in SSA numbering).
#[macro_export]
macro_rules! path {
    [] => {
        $crate::contractionpath::SimplePath::new()
    };
    [$( ($t0:expr, $t1:expr) ),* $(,)?] => {
        vec![$( ($t0, $t1) ),*]
    };
}

/// Converts a `path` in SSA format into ReplaceLeft format: every merge result
/// takes the slot of its left operand instead of a fresh id, matching how an
/// in-place contraction engine would consume the path.
///
/// # Examples
/// ```
/// # use tnslice::contractionpath::ssa_replace_ordering;
/// # use tnslice::path;
/// let ssa = path![(1, 2), (0, 3)];
/// assert_eq!(ssa_replace_ordering(&ssa, 3), path![(1, 2), (0, 1)]);
/// ```
pub fn ssa_replace_ordering(path: SimplePathRef, num_tensors: usize) -> SimplePath {
    let mut slots = FxHashMap::with_capacity(path.len());
    let mut replace_path = Vec::with_capacity(path.len());
    let mut next_ssa_id = num_tensors;
    for (t0, t1) in path {
        let new_t0 = *slots.get(t0).unwrap_or(t0);
        let new_t1 = *slots.get(t1).unwrap_or(t1);

        slots.insert_new(next_ssa_id, new_t0);
        replace_path.push((new_t0, new_t1));
        next_ssa_id += 1;
    }
    replace_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_macro() {
        assert_eq!(path![], SimplePath::new());
        assert_eq!(path![(0, 1), (2, 3)], vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_ssa_replace_ordering() {
        let path = path![(0, 3), (1, 2), (6, 4), (5, 7), (9, 8), (11, 10)];
        let new_path = ssa_replace_ordering(&path, 7);

        assert_eq!(
            new_path,
            path![(0, 3), (1, 2), (6, 4), (5, 0), (6, 1), (6, 5)]
        );
    }

    #[test]
    fn test_ssa_replace_ordering_chain() {
        let path = path![(1, 2), (0, 3)];
        assert_eq!(ssa_replace_ordering(&path, 3), path![(1, 2), (0, 1)]);
    }
}
