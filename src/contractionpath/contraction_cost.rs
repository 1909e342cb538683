//! Symbolic contraction costs.
//!
//! Costs are polynomials in a single symbolic bond-dimension variable `x`.
//! A plain numeric dimension is a constant polynomial; an index whose size is
//! kept symbolic (the interesting case for slicing decisions) contributes a
//! factor of `x`. Two costs are ordered by their dominant growth term, so the
//! search compares asymptotic behavior rather than concrete flop counts.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::types::EdgeIndex;

/// A polynomial cost with non-negative integer coefficients.
///
/// `coeffs[d]` is the coefficient of `x^d`; trailing zeros are never stored,
/// so the zero polynomial has no coefficients at all.
///
/// # Examples
/// ```
/// # use tnslice::contractionpath::contraction_cost::Cost;
/// let quadratic = &(&Cost::variable() * &Cost::variable()) + &Cost::constant(3);
/// assert_eq!(quadratic.to_string(), "x^2 + 3");
/// assert_eq!(quadratic.degree(), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCost")]
pub struct Cost {
    coeffs: Vec<u128>,
}

/// Deserialization proxy: incoming coefficient vectors are trimmed so the
/// no-trailing-zeros invariant holds for external data too.
#[derive(Deserialize)]
struct RawCost {
    coeffs: Vec<u128>,
}

impl From<RawCost> for Cost {
    fn from(raw: RawCost) -> Self {
        Cost::trim(raw.coeffs)
    }
}

impl Cost {
    /// The additive identity.
    #[inline]
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// The multiplicative identity.
    #[inline]
    pub fn one() -> Self {
        Self::constant(1)
    }

    /// A constant cost (a plain numeric bond dimension).
    pub fn constant(value: u128) -> Self {
        if value == 0 {
            Self::zero()
        } else {
            Self {
                coeffs: vec![value],
            }
        }
    }

    /// The symbolic bond-dimension variable `x`.
    pub fn variable() -> Self {
        Self {
            coeffs: vec![0, 1],
        }
    }

    /// The degree of the dominant term, or `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    fn trim(mut coeffs: Vec<u128>) -> Self {
        while coeffs.last() == Some(&0) {
            coeffs.pop();
        }
        Self { coeffs }
    }
}

impl Add for &Cost {
    type Output = Cost;

    fn add(self, rhs: &Cost) -> Cost {
        let (longer, shorter) = if self.coeffs.len() >= rhs.coeffs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut coeffs = longer.coeffs.clone();
        for (c, s) in coeffs.iter_mut().zip(&shorter.coeffs) {
            *c += s;
        }
        // No trimming needed, coefficients only grow.
        Cost { coeffs }
    }
}

impl Mul for &Cost {
    type Output = Cost;

    fn mul(self, rhs: &Cost) -> Cost {
        if self.is_zero() || rhs.is_zero() {
            return Cost::zero();
        }
        let mut coeffs = vec![0u128; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Cost::trim(coeffs)
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        &self + &rhs
    }
}

impl Mul for Cost {
    type Output = Cost;

    fn mul(self, rhs: Cost) -> Cost {
        &self * &rhs
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (degree, coeff) in self.coeffs.iter().enumerate().rev() {
            if *coeff == 0 {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            match degree {
                0 => write!(f, "{coeff}")?,
                1 if *coeff == 1 => write!(f, "x")?,
                1 => write!(f, "{coeff}*x")?,
                _ if *coeff == 1 => write!(f, "x^{degree}")?,
                _ => write!(f, "{coeff}*x^{degree}")?,
            }
        }
        Ok(())
    }
}

/// Orders two polynomial costs by their dominant growth term.
///
/// A higher degree always loses; for equal degrees the coefficients are
/// compared from the leading term downwards, so `Ordering::Equal` is returned
/// only when the polynomials match exactly.
///
/// # Examples
/// ```
/// # use std::cmp::Ordering;
/// # use tnslice::contractionpath::contraction_cost::{compare_cost, Cost};
/// let linear = Cost::variable();
/// let huge_constant = Cost::constant(1 << 40);
/// assert_eq!(compare_cost(&huge_constant, &linear), Ordering::Less);
/// ```
pub fn compare_cost(cost1: &Cost, cost2: &Cost) -> Ordering {
    match cost1.coeffs.len().cmp(&cost2.coeffs.len()) {
        Ordering::Equal => {}
        unequal => return unequal,
    }
    for (a, b) in cost1.coeffs.iter().rev().zip(cost2.coeffs.iter().rev()) {
        match a.cmp(b) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
    }
    Ordering::Equal
}

/// Orders two concrete counts (for example slice-set sizes) with the same
/// three-way contract as [`compare_cost`]. Counts are plain integers, never
/// polynomials, so this is a separate comparator instead of a special case.
#[inline]
pub fn compare_count(count1: usize, count2: usize) -> Ordering {
    count1.cmp(&count2)
}

/// The product of the bond dimensions of the given indices; the empty set
/// yields the multiplicative identity.
///
/// # Panics
/// Panics if an index is missing from `size_dict`. Networks are validated
/// before the search starts, so this indicates a caller bug.
///
/// # Examples
/// ```
/// # use rustc_hash::FxHashMap;
/// # use tnslice::contractionpath::contraction_cost::{bond_dim, Cost};
/// let size_dict = FxHashMap::from_iter([(0, Cost::constant(3)), (1, Cost::variable())]);
/// assert_eq!(bond_dim([0, 1], &size_dict).to_string(), "3*x");
/// assert_eq!(bond_dim([], &size_dict), Cost::one());
/// ```
pub fn bond_dim(
    indices: impl IntoIterator<Item = EdgeIndex>,
    size_dict: &FxHashMap<EdgeIndex, Cost>,
) -> Cost {
    indices
        .into_iter()
        .fold(Cost::one(), |acc, index| &acc * &size_dict[&index])
}
