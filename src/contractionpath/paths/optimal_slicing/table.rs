//! The dynamic-programming table of the slicing search.
//!
//! Keys are [`TensorSubset`] bitmasks; values are the best known way to
//! produce the corresponding intermediate tensor. The table only ever grows
//! and only ever improves: entries are replaced exclusively through
//! [`Table::put_if_better`].

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::contractionpath::contraction_cost::Cost;
use crate::types::{EdgeIndex, TensorIndex, TensorSubset};
use crate::utils::traits::WithCapacity;

use super::SearchOptions;

/// How an intermediate tensor was produced, for path reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// An original input tensor.
    Leaf(TensorIndex),
    /// A pairwise merge of two smaller entries, recording the slice choices
    /// made for each side at this merge.
    Merge {
        left: TensorSubset,
        right: TensorSubset,
        left_sliced: BTreeSet<EdgeIndex>,
        right_sliced: BTreeSet<EdgeIndex>,
    },
}

/// The best known record for one intermediate tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Cost of producing this intermediate under the configured metric.
    pub cost: Cost,
    /// All indices sliced anywhere within this sub-network.
    pub sliced: BTreeSet<EdgeIndex>,
    /// Back-pointer for path reconstruction.
    pub provenance: Provenance,
}

/// Map from tensor subsets to the best entry discovered so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    entries: FxHashMap<TensorSubset, TableEntry>,
}

impl Table {
    /// Creates an empty table sized for roughly `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the entry for `key`; absent means not yet discovered.
    #[inline]
    pub fn get(&self, key: TensorSubset) -> Option<&TableEntry> {
        self.entries.get(&key)
    }

    /// Iterates over all `(subset, entry)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (TensorSubset, &TableEntry)> {
        self.entries.iter().map(|(key, entry)| (*key, entry))
    }

    /// Inserts `candidate` if no entry exists for `key`, or replaces the
    /// existing entry if the candidate strictly wins under the configured
    /// comparator. On full ties the incumbent stays, so among equals the
    /// first-found entry wins and the search stays deterministic.
    ///
    /// Returns whether the candidate was stored.
    pub fn put_if_better(
        &mut self,
        key: TensorSubset,
        candidate: TableEntry,
        options: &SearchOptions,
    ) -> bool {
        match self.entries.entry(key) {
            std::collections::hash_map::Entry::Vacant(vacant) => {
                vacant.insert(candidate);
                true
            }
            std::collections::hash_map::Entry::Occupied(mut occupied) => {
                let incumbent = occupied.get();
                if options.better(
                    (&candidate.cost, candidate.sliced.len()),
                    (&incumbent.cost, incumbent.sliced.len()),
                ) {
                    occupied.insert(candidate);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// All keys covering exactly `size` tensors, in increasing bitmask order.
    /// This is the deterministic layer enumeration of the subset DP.
    pub(crate) fn keys_of_size(&self, size: usize) -> Vec<TensorSubset> {
        let mut keys: Vec<_> = self
            .entries
            .keys()
            .filter(|key| key.len() == size)
            .copied()
            .collect();
        keys.sort_unstable();
        keys
    }
}
