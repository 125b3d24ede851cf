//! Candidate list builder: a surrogate ranking of cheap elementary
//! assignments.
//!
//! The list pairs the shortest distances with the largest flows rank for
//! rank, without evaluating true incremental assignment costs. It is built
//! once per instance and seeds every construction run.

use crate::heap::RankingHeap;
use crate::instance::QAPInstance;

/// One pre-ranked elementary assignment: committing `facilities.0` and
/// `facilities.1` onto `locations.0` and `locations.1` contributes
/// `cost = flow * distance` once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateEntry {
    pub cost: i64,
    pub facilities: (usize, usize),
    pub locations: (usize, usize),
}

/// Ascending-by-cost list of the retained elementary assignments.
#[derive(Debug, Clone)]
pub struct CandidateList {
    entries: Vec<CandidateEntry>,
}

impl CandidateList {
    /// Build the list, retaining `floor(beta * (n^2 - n))` entries (at
    /// least one, so construction always has something to sample).
    pub fn build(instance: &QAPInstance, beta: f64) -> Self {
        let n = instance.n;
        let off_diagonal = n * n - n;
        let retained = ((beta * off_diagonal as f64) as usize).clamp(1, off_diagonal);

        // Rank off-diagonal distances ascending and flows descending,
        // independently. Tags encode the originating (row, col) position.
        let mut distance_heap = RankingHeap::with_capacity(off_diagonal);
        let mut flow_heap = RankingHeap::with_capacity(off_diagonal);
        for row in 0..n {
            for col in 0..n {
                if row == col {
                    continue;
                }
                distance_heap.insert(instance.distance.at(row, col), row * n + col);
                flow_heap.insert(-instance.flow.at(row, col), row * n + col);
            }
        }

        let mut ranked_distances = Vec::with_capacity(retained);
        let mut ranked_flows = Vec::with_capacity(retained);
        for _ in 0..retained {
            ranked_distances.push(distance_heap.extract_min());
            ranked_flows.push(flow_heap.extract_min());
        }

        // Pair rank for rank and restore the flow's sign, then rank the
        // composite products ascending.
        let mut product_heap = RankingHeap::with_capacity(retained);
        for rank in 0..retained {
            let cost = -ranked_flows[rank].value * ranked_distances[rank].value;
            product_heap.insert(cost, rank);
        }

        let mut entries = Vec::with_capacity(retained);
        for _ in 0..retained {
            let product = product_heap.extract_min();
            let flow_tag = ranked_flows[product.tag].tag;
            let distance_tag = ranked_distances[product.tag].tag;
            entries.push(CandidateEntry {
                cost: product.value,
                facilities: (flow_tag / n, flow_tag % n),
                locations: (distance_tag / n, distance_tag % n),
            });
        }

        CandidateList { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> &CandidateEntry {
        &self.entries[index]
    }

    pub fn entries(&self) -> &[CandidateEntry] {
        &self.entries
    }
}
