//! Shared index types and the bitmask subset key used by the search table.

use serde::{Deserialize, Serialize};

/// Identifier of an edge (a tensor leg / summation index) of the network.
pub type EdgeIndex = usize;

/// Position of an input tensor within a [`TensorNetwork`].
///
/// [`TensorNetwork`]: crate::tensornetwork::TensorNetwork
pub type TensorIndex = usize;

/// The maximum number of input tensors a network may have. The subset key is a
/// 64-bit mask; the exact search becomes intractable long before this limit.
pub const MAX_TENSORS: usize = 64;

/// A subset of the input tensors of a network, stored as a bitmask over tensor
/// positions. Subsets are the keys of the search table; their numeric order
/// doubles as the deterministic iteration order of the dynamic program.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TensorSubset(u64);

impl TensorSubset {
    /// The empty subset.
    pub const EMPTY: Self = Self(0);

    /// The subset containing only the tensor at `index`.
    ///
    /// # Panics
    /// Panics if `index` is [`MAX_TENSORS`] or larger.
    #[inline]
    pub fn singleton(index: TensorIndex) -> Self {
        assert!(index < MAX_TENSORS, "tensor index {index} out of range");
        Self(1 << index)
    }

    /// The subset containing the first `n` tensors.
    ///
    /// # Panics
    /// Panics if `n` is larger than [`MAX_TENSORS`].
    #[inline]
    pub fn full(n: usize) -> Self {
        assert!(n <= MAX_TENSORS, "network of {n} tensors too large");
        if n == MAX_TENSORS {
            Self(u64::MAX)
        } else {
            Self((1 << n) - 1)
        }
    }

    /// The number of tensors in the subset.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether the tensor at `index` is a member.
    #[inline]
    pub fn contains(&self, index: TensorIndex) -> bool {
        index < MAX_TENSORS && self.0 & (1 << index) != 0
    }

    /// Whether `self` and `other` have no tensor in common.
    #[inline]
    pub fn is_disjoint(&self, other: Self) -> bool {
        self.0 & other.0 == 0
    }

    /// The union of two subsets.
    #[inline]
    pub fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Iterates over the member tensor positions in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = TensorIndex> + '_ {
        let mask = self.0;
        (0..MAX_TENSORS).filter(move |i| mask & (1 << i) != 0)
    }
}

impl FromIterator<TensorIndex> for TensorSubset {
    fn from_iter<I: IntoIterator<Item = TensorIndex>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::EMPTY, |acc, i| acc.union(Self::singleton(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_membership() {
        let s = TensorSubset::singleton(3);
        assert!(s.contains(3));
        assert!(!s.contains(2));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_union_and_disjoint() {
        let a = TensorSubset::from_iter([0, 2]);
        let b = TensorSubset::from_iter([1, 3]);
        assert!(a.is_disjoint(b));
        let ab = a.union(b);
        assert_eq!(ab, TensorSubset::full(4));
        assert!(!ab.is_disjoint(a));
    }

    #[test]
    fn test_iter_is_sorted() {
        let s = TensorSubset::from_iter([5, 1, 3]);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_full_limit() {
        let all = TensorSubset::full(MAX_TENSORS);
        assert_eq!(all.len(), MAX_TENSORS);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_singleton_out_of_range() {
        TensorSubset::singleton(MAX_TENSORS);
    }

    #[test]
    fn test_subset_order_is_numeric() {
        assert!(TensorSubset::singleton(0) < TensorSubset::singleton(1));
        assert!(TensorSubset::from_iter([0, 1]) < TensorSubset::from_iter([0, 2]));
    }
}
