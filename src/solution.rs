//! Solution representation and manipulation for the QAP.
//!
//! This module provides the permutation type used throughout construction
//! and local search, and the assignment record returned by the solver.

use crate::instance::QAPInstance;
use serde::{Deserialize, Serialize};

/// Permutation of {0..n-1} carrying paired forward and inverse mappings.
///
/// Both arrays are updated together on every swap, so the bijection
/// invariant holds by construction and position lookups are O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Permutation {
            forward: (0..n).collect(),
            inverse: (0..n).collect(),
        }
    }

    /// Adopt a forward mapping, validating that it is a bijection.
    pub fn from_vec(forward: Vec<usize>) -> Result<Self, String> {
        let n = forward.len();
        let mut inverse = vec![usize::MAX; n];
        for (position, &value) in forward.iter().enumerate() {
            if value >= n {
                return Err(format!("value {} out of range for permutation of {}", value, n));
            }
            if inverse[value] != usize::MAX {
                return Err(format!("value {} appears more than once", value));
            }
            inverse[value] = position;
        }
        Ok(Permutation { forward, inverse })
    }

    /// Collapse the paired construction permutations into a location-indexed
    /// assignment: entry p is the facility committed to location p.
    pub fn from_pairs(facilities: &Permutation, locations: &Permutation) -> Self {
        let n = facilities.len();
        let mut forward = vec![0; n];
        let mut inverse = vec![0; n];
        for i in 0..n {
            let facility = facilities.at(i);
            let location = locations.at(i);
            forward[location] = facility;
            inverse[facility] = location;
        }
        Permutation { forward, inverse }
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Value at position `i`.
    #[inline]
    pub fn at(&self, i: usize) -> usize {
        self.forward[i]
    }

    /// Position currently holding `value`.
    #[inline]
    pub fn position_of(&self, value: usize) -> usize {
        self.inverse[value]
    }

    /// Exchange the values at positions `i` and `j`.
    pub fn swap_positions(&mut self, i: usize, j: usize) {
        self.forward.swap(i, j);
        self.inverse[self.forward[i]] = i;
        self.inverse[self.forward[j]] = j;
    }

    /// Move `value` into position `slot` by swapping it with the occupant.
    pub fn place(&mut self, value: usize, slot: usize) {
        let from = self.inverse[value];
        self.swap_positions(from, slot);
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.forward
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.forward.clone()
    }

    /// The inverse mapping as a fresh permutation.
    pub fn inverted(&self) -> Permutation {
        Permutation {
            forward: self.inverse.clone(),
            inverse: self.forward.clone(),
        }
    }

    /// Check that forward and inverse agree and cover 0..n-1.
    pub fn is_valid(&self) -> bool {
        self.forward.len() == self.inverse.len()
            && self
                .forward
                .iter()
                .enumerate()
                .all(|(i, &v)| v < self.inverse.len() && self.inverse[v] == i)
    }
}

/// A complete assignment of facilities to locations with its objective value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// `permutation[f]` is the location assigned to facility `f`
    pub permutation: Vec<usize>,
    /// Objective value: sum of flow(i, j) * distance(p[i], p[j])
    pub cost: i64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Iterations actually performed
    pub iterations: usize,
    /// Whether the caller-supplied cost target was reached
    pub target_met: bool,
    /// Generator state after the run, for reproducible chained calls
    pub final_seed: u32,
}

impl Solution {
    /// Create a new empty solution
    pub fn new() -> Self {
        Solution {
            permutation: Vec::new(),
            cost: i64::MAX,
            algorithm: String::new(),
            computation_time: 0.0,
            iterations: 0,
            target_met: false,
            final_seed: 0,
        }
    }

    /// Create a solution from an assignment, evaluating its true cost.
    pub fn from_permutation(
        instance: &QAPInstance,
        permutation: Vec<usize>,
        algorithm: &str,
    ) -> Self {
        let cost = instance.evaluate(&permutation);
        Solution {
            permutation,
            cost,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: 0,
            target_met: false,
            final_seed: 0,
        }
    }

    /// Recompute the cost directly from the instance.
    pub fn validate(&mut self, instance: &QAPInstance) {
        self.cost = instance.evaluate(&self.permutation);
    }

    /// Check that the assignment is a bijection of the right size.
    pub fn is_complete(&self, instance: &QAPInstance) -> bool {
        self.permutation.len() == instance.n
            && Permutation::from_vec(self.permutation.clone()).is_ok()
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Cost: {}", self.cost)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Target met: {}", self.target_met)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        writeln!(f, "  Assignment: {:?}", self.permutation)
    }
}
