//! Exact, exhaustive search for the jointly optimal contraction order and
//! slice set of a tensor network.
//!
//! The search is a layered subset dynamic program: every subset of input
//! tensors is an intermediate tensor, subsets are processed in strictly
//! increasing size, and each subset of size `k` is formed from two disjoint,
//! already-finalized subsets of sizes summing to `k`. At every merge the
//! search additionally enumerates which of the step's indices to slice,
//! subject to the budget and allow-list in [`SearchOptions`] and to the
//! parallel-edge ordering of the network. Costs are symbolic polynomials, so
//! the winner is the asymptotically cheapest configuration.
//!
//! The size ordering makes the dependency structure acyclic by construction
//! and the table monotone: a subset's entry only ever improves, and only ever
//! depends on strictly smaller subsets.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contractionpath::contraction_cost::{bond_dim, compare_cost, compare_count, Cost};
use crate::contractionpath::paths::{validate_path, CostType, FindPath};
use crate::contractionpath::{ssa_replace_ordering, SimplePath, SimplePathRef};
use crate::tensornetwork::{NetworkError, TensorNetwork};
use crate::types::{EdgeIndex, TensorSubset};

pub mod slicing;
pub mod table;

use self::slicing::check_parallel_edges;
use self::table::{Provenance, Table, TableEntry};

/// Ways a search can fail. Anything else is an admissibility filter, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The network failed structural validation before the search started.
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// All subset sizes were processed but the full network never became
    /// reachable: the network is disconnected or the slicing constraints are
    /// unsatisfiable.
    #[error("no feasible contraction found")]
    Infeasible,
    /// [`search_named`] was given a name with no registered network.
    #[error("no network named {0:?} is registered")]
    UnknownNetwork(String),
}

/// Read-only configuration of a search run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// The cost metric that decides which table entry wins.
    pub minimize: CostType,
    /// Upper bound on the number of sliced indices; zero disables slicing.
    pub max_sliced: usize,
    /// Indices that may be sliced; `None` allows every non-output index.
    pub sliceable: Option<BTreeSet<EdgeIndex>>,
}

impl SearchOptions {
    /// Options minimizing the peak memory footprint with up to `max_sliced`
    /// sliced indices, the common configuration for slicing searches.
    pub fn sliced(max_sliced: usize) -> Self {
        Self {
            minimize: CostType::Size,
            max_sliced,
            sliceable: None,
        }
    }

    /// Whether `sliced` is a valid candidate slice set under the budget and
    /// allow-list, ignoring parallel-edge ordering (which depends on the
    /// sub-network and is checked separately).
    pub fn admits(&self, sliced: &BTreeSet<EdgeIndex>) -> bool {
        sliced.len() <= self.max_sliced
            && self
                .sliceable
                .as_ref()
                .is_none_or(|allowed| sliced.is_subset(allowed))
    }

    /// Whether the challenger beats the incumbent: strictly lower cost, or
    /// equal cost with strictly fewer sliced indices. Full ties keep the
    /// incumbent, so among equals the first-found candidate wins and the
    /// search stays deterministic.
    pub fn better(&self, challenger: (&Cost, usize), incumbent: (&Cost, usize)) -> bool {
        match compare_cost(challenger.0, incumbent.0) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => compare_count(challenger.1, incumbent.1) == Ordering::Less,
        }
    }
}

/// The result of a successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Pairwise merges in SSA format, leaves first.
    pub path: SimplePath,
    /// The indices to slice, fixed globally for the whole contraction.
    pub sliced: BTreeSet<EdgeIndex>,
    /// Total cost of the contraction under the configured metric.
    pub cost: Cost,
}

/// Validates the network and seeds `table` with one leaf entry per input
/// tensor: empty slicing, and as base cost either zero (`Flops`, nothing has
/// been contracted yet) or the tensor's own memory footprint (`Size`).
pub fn initialize_table(
    tn: &TensorNetwork,
    options: &SearchOptions,
    table: &mut Table,
) -> Result<(), SearchError> {
    tn.validate()?;
    for (tensor, legs) in tn.inputs().iter().enumerate() {
        let cost = match options.minimize {
            CostType::Flops => Cost::zero(),
            CostType::Size => bond_dim(legs.iter().copied(), tn.size_dict()),
        };
        table.put_if_better(
            TensorSubset::singleton(tensor),
            TableEntry {
                cost,
                sliced: BTreeSet::new(),
                provenance: Provenance::Leaf(tensor),
            },
            options,
        );
    }
    debug!(num_tensors = tn.num_tensors(); "initialized table with leaf entries");
    Ok(())
}

/// Populates `table` with all reachable intermediate tensors, one subset size
/// at a time. Both halves of every merge are strictly smaller than the
/// target, so they are final by the time they are combined. Running this a
/// second time on the same table is a no-op.
pub fn update_table(tn: &TensorNetwork, options: &SearchOptions, table: &mut Table) {
    let num_tensors = tn.num_tensors();
    let mut layers: Vec<Vec<TensorSubset>> = vec![Vec::new(); num_tensors + 1];
    if num_tensors > 0 {
        layers[1] = table.keys_of_size(1);
    }

    for size in 2..=num_tensors {
        for left_size in 1..=size / 2 {
            let right_size = size - left_size;
            for &ta in &layers[left_size] {
                for &tb in &layers[right_size] {
                    if left_size == right_size && tb <= ta {
                        continue;
                    }
                    if !ta.is_disjoint(tb) {
                        continue;
                    }
                    update_intermediate_tensor(tn, options, table, ta, tb);
                }
            }
        }
        layers[size] = table.keys_of_size(size);
        debug!(size, entries = table.len(); "finished subset layer");
    }
}

/// Considers forming `ta ∪ tb` from the two finalized entries, trying every
/// admissible pair of slice sets for the two sides, and records the best
/// resulting candidate in the table.
///
/// Sides that share no open index are skipped: an outer product never helps
/// a connected network, and merging disconnected components would mask a
/// genuinely infeasible input.
pub fn update_intermediate_tensor(
    tn: &TensorNetwork,
    options: &SearchOptions,
    table: &mut Table,
    ta: TensorSubset,
    tb: TensorSubset,
) {
    let (Some(entry_a), Some(entry_b)) = (table.get(ta), table.get(tb)) else {
        return;
    };

    let open_a = tn.open_indices(ta);
    let open_b = tn.open_indices(tb);
    if open_a.is_disjoint(&open_b) {
        return;
    }

    let tab = ta.union(tb);
    let all_inds = tn.all_indices(tab);
    let inherited: BTreeSet<EdgeIndex> =
        entry_a.sliced.union(&entry_b.sliced).copied().collect();
    if inherited.len() > options.max_sliced {
        // The children's combined slicing already blows the budget; no
        // admissible candidate can come out of this pairing.
        return;
    }
    let budget = options.max_sliced - inherited.len();

    let eligible = |index: &EdgeIndex| {
        !inherited.contains(index)
            && !tn.is_output(*index)
            && options
                .sliceable
                .as_ref()
                .is_none_or(|allowed| allowed.contains(index))
    };
    let candidates_a: Vec<EdgeIndex> = if budget == 0 {
        Vec::new()
    } else {
        open_a.iter().filter(|i| eligible(i)).copied().collect()
    };
    let candidates_b: Vec<EdgeIndex> = if budget == 0 {
        Vec::new()
    } else {
        open_b
            .difference(&open_a)
            .filter(|i| eligible(i))
            .copied()
            .collect()
    };

    let mut best: Option<TableEntry> = None;
    for ia in candidates_a.iter().copied().powerset() {
        for ib in candidates_b.iter().copied().powerset() {
            if ia.len() + ib.len() > budget {
                continue;
            }
            let ia: BTreeSet<EdgeIndex> = ia.iter().copied().collect();
            let ib: BTreeSet<EdgeIndex> = ib.into_iter().collect();
            let (cost, sliced) = get_slicing_cost(tn, options, table, ta, tb, &ia, &ib);
            if !options.admits(&sliced) || !check_parallel_edges(tn.parallel_edges(), &all_inds, &sliced) {
                continue;
            }

            let challenger_wins = best.as_ref().is_none_or(|incumbent| {
                options.better((&cost, sliced.len()), (&incumbent.cost, incumbent.sliced.len()))
            });
            if challenger_wins {
                best = Some(TableEntry {
                    cost,
                    sliced,
                    provenance: Provenance::Merge {
                        left: ta,
                        right: tb,
                        left_sliced: ia,
                        right_sliced: ib,
                    },
                });
            }
        }
    }

    if let Some(entry) = best {
        table.put_if_better(tab, entry, options);
    }
}

/// Computes the cost of forming `ta ∪ tb` when the sides additionally slice
/// `ia` and `ib`, together with the resulting total slice set (the union of
/// both children's slicing and the fresh choices).
///
/// Sliced indices count as dimension one inside a step; under `Flops` the
/// per-slice work is then multiplied by the sliced bond dimensions (the
/// repetitions slicing causes), with each child's accumulated cost rescaled
/// by the slices added after it was finalized. Under `Size` the cost is the
/// peak footprint: the larger of both children's peaks and this step's
/// operands-plus-result footprint.
pub fn get_slicing_cost(
    tn: &TensorNetwork,
    options: &SearchOptions,
    table: &Table,
    ta: TensorSubset,
    tb: TensorSubset,
    ia: &BTreeSet<EdgeIndex>,
    ib: &BTreeSet<EdgeIndex>,
) -> (Cost, BTreeSet<EdgeIndex>) {
    let entry_a = table.get(ta).expect("left child missing from table");
    let entry_b = table.get(tb).expect("right child missing from table");
    let sliced: BTreeSet<EdgeIndex> = entry_a
        .sliced
        .union(&entry_b.sliced)
        .chain(ia.iter())
        .chain(ib.iter())
        .copied()
        .collect();

    let size_dict = tn.size_dict();
    let open_a = tn.open_indices(ta);
    let open_b = tn.open_indices(tb);

    let cost = match options.minimize {
        CostType::Flops => {
            let rescale_a = bond_dim(sliced.difference(&entry_a.sliced).copied(), size_dict);
            let rescale_b = bond_dim(sliced.difference(&entry_b.sliced).copied(), size_dict);
            let step_inds: BTreeSet<EdgeIndex> = open_a.union(&open_b).copied().collect();
            let step = bond_dim(step_inds.difference(&sliced).copied(), size_dict);
            let repeats = bond_dim(sliced.iter().copied(), size_dict);
            &(&(&entry_a.cost * &rescale_a) + &(&entry_b.cost * &rescale_b)) + &(&step * &repeats)
        }
        CostType::Size => {
            let open_ab = tn.open_indices(ta.union(tb));
            let footprint =
                |open: &BTreeSet<EdgeIndex>| bond_dim(open.difference(&sliced).copied(), size_dict);
            let step_size = &(&footprint(&open_a) + &footprint(&open_b)) + &footprint(&open_ab);
            let mut peak = step_size;
            for child in [&entry_a.cost, &entry_b.cost] {
                if compare_cost(child, &peak) == Ordering::Greater {
                    peak = child.clone();
                }
            }
            peak
        }
    };
    (cost, sliced)
}

/// Looks up the full-network entry and walks its back-pointers down to the
/// leaves, producing the contraction path in SSA format together with the
/// top-level slice set and total cost.
///
/// Fails with [`SearchError::Infeasible`] if the full network was never
/// reached; for a well-formed connected network this cannot happen once
/// [`update_table`] has processed all subset sizes, but it is checked
/// defensively.
pub fn get_best_results(
    tn: &TensorNetwork,
    _options: &SearchOptions,
    table: &Table,
) -> Result<(SimplePath, BTreeSet<EdgeIndex>, Cost), SearchError> {
    let full = tn.full_subset();
    let entry = table.get(full).ok_or(SearchError::Infeasible)?;

    let mut path = SimplePath::new();
    let mut next_ssa_id = tn.num_tensors();
    extract_path(table, full, &mut path, &mut next_ssa_id);
    validate_path(&path, tn.num_tensors());

    Ok((path, entry.sliced.clone(), entry.cost.clone()))
}

/// Emits the merges below `subset` leaves-first and returns the SSA id of the
/// tensor `subset` ends up as.
fn extract_path(
    table: &Table,
    subset: TensorSubset,
    path: &mut SimplePath,
    next_ssa_id: &mut usize,
) -> usize {
    let entry = table
        .get(subset)
        .expect("provenance references a missing subset");
    match &entry.provenance {
        Provenance::Leaf(tensor) => *tensor,
        Provenance::Merge { left, right, .. } => {
            let t0 = extract_path(table, *left, path, next_ssa_id);
            let t1 = extract_path(table, *right, path, next_ssa_id);
            let id = *next_ssa_id;
            *next_ssa_id += 1;
            path.push((t0, t1));
            id
        }
    }
}

/// Subset-DP optimizer searching contraction order and slicing jointly.
#[derive(Debug, Clone)]
pub struct OptimalSlicing<'a> {
    tn: &'a TensorNetwork,
    options: SearchOptions,
    best_path: SimplePath,
    best_slicing: BTreeSet<EdgeIndex>,
    best_cost: Cost,
}

impl<'a> OptimalSlicing<'a> {
    /// Creates an optimizer for `tn` with the given options.
    pub fn new(tn: &'a TensorNetwork, options: SearchOptions) -> Self {
        Self {
            tn,
            options,
            best_path: SimplePath::new(),
            best_slicing: BTreeSet::new(),
            best_cost: Cost::zero(),
        }
    }
}

impl FindPath for OptimalSlicing<'_> {
    fn find_path(&mut self) -> Result<(), SearchError> {
        let mut table = Table::with_capacity(1 << self.tn.num_tensors().min(12));
        initialize_table(self.tn, &self.options, &mut table)?;
        update_table(self.tn, &self.options, &mut table);
        let (path, sliced, cost) = get_best_results(self.tn, &self.options, &table)?;
        debug!(entries = table.len(), num_sliced = sliced.len(); "search finished");

        self.best_path = path;
        self.best_slicing = sliced;
        self.best_cost = cost;
        Ok(())
    }

    fn get_best_path(&self) -> SimplePathRef {
        &self.best_path
    }

    fn get_best_replace_path(&self) -> SimplePath {
        ssa_replace_ordering(&self.best_path, self.tn.num_tensors())
    }

    fn get_best_cost(&self) -> &Cost {
        &self.best_cost
    }

    fn get_best_slicing(&self) -> &BTreeSet<EdgeIndex> {
        &self.best_slicing
    }
}

/// Searches the optimal contraction path and slicing of `tn`.
///
/// # Examples
/// ```
/// # use tnslice::contractionpath::contraction_cost::Cost;
/// # use tnslice::contractionpath::paths::optimal_slicing::{search, SearchOptions};
/// # use tnslice::tensornetwork::TensorNetwork;
/// # use tnslice::path;
/// let tn = TensorNetwork::new(
///     vec![vec![0, 1], vec![1, 2], vec![2, 3]],
///     vec![0, 3],
///     [
///         (0, Cost::constant(2)),
///         (1, Cost::constant(4)),
///         (2, Cost::constant(4)),
///         (3, Cost::constant(2)),
///     ],
///     Vec::new(),
/// );
/// let outcome = search(&tn, &SearchOptions::default()).unwrap();
/// assert_eq!(outcome.path, path![(1, 2), (0, 3)]);
/// assert_eq!(outcome.cost, Cost::constant(48));
/// ```
pub fn search(tn: &TensorNetwork, options: &SearchOptions) -> Result<SearchOutcome, SearchError> {
    let mut optimizer = OptimalSlicing::new(tn, options.clone());
    optimizer.find_path()?;
    Ok(SearchOutcome {
        path: optimizer.best_path,
        sliced: optimizer.best_slicing,
        cost: optimizer.best_cost,
    })
}

/// Searches the optimal contraction path and slicing of the network
/// registered under `name`, with that network's default options.
///
/// # Examples
/// ```
/// # use tnslice::contractionpath::paths::optimal_slicing::search_named;
/// let outcome = search_named("chain").unwrap();
/// assert!(outcome.sliced.is_empty());
/// ```
pub fn search_named(name: &str) -> Result<SearchOutcome, SearchError> {
    let (tn, options) = crate::builders::named_network(name)?;
    search(&tn, &options)
}
