//! 2-exchange local search over complete assignments.
//!
//! Operates on a location-indexed permutation: entry p is the facility
//! assigned to location p. Each candidate exchange is scored with an exact
//! closed-form delta that only touches terms involving the two exchanged
//! locations, so one sweep costs O(n^3) instead of O(n^4).

use crate::instance::QAPInstance;
use crate::solution::Permutation;

/// First-improvement 2-exchange descent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoExchangeSearch;

impl TwoExchangeSearch {
    pub fn new() -> Self {
        TwoExchangeSearch
    }

    /// Exact objective decrease from exchanging the facilities at locations
    /// `i` and `j`. Positive gain means the exchange improves.
    ///
    /// Holds for asymmetric matrices and nonzero diagonals: both ordered
    /// directions and the self terms are accounted for.
    pub fn exchange_gain(
        instance: &QAPInstance,
        assignment: &Permutation,
        i: usize,
        j: usize,
    ) -> i64 {
        let flow = &instance.flow;
        let distance = &instance.distance;
        let fi = assignment.at(i);
        let fj = assignment.at(j);

        // Terms between the exchanged pair itself, plus the diagonal terms.
        let mut gain = (flow.at(fi, fj) - flow.at(fj, fi)) * (distance.at(i, j) - distance.at(j, i))
            + (flow.at(fi, fi) - flow.at(fj, fj)) * (distance.at(i, i) - distance.at(j, j));

        for k in 0..assignment.len() {
            if k == i || k == j {
                continue;
            }
            let fk = assignment.at(k);
            gain += (distance.at(i, k) - distance.at(j, k)) * (flow.at(fi, fk) - flow.at(fj, fk))
                + (distance.at(k, i) - distance.at(k, j)) * (flow.at(fk, fi) - flow.at(fk, fj));
        }
        gain
    }

    /// Descend to a 2-exchange local optimum.
    ///
    /// Sweeps all unordered location pairs, applies any improving exchange
    /// immediately, and repeats until a full sweep applies none. Returns the
    /// improved objective and the number of sweeps performed.
    pub fn improve(
        &self,
        instance: &QAPInstance,
        assignment: &mut Permutation,
        mut objective: i64,
    ) -> (i64, usize) {
        let n = assignment.len();
        let mut sweeps = 0usize;

        loop {
            sweeps += 1;
            let mut improved = false;
            for i in 0..n {
                for j in (i + 1)..n {
                    let gain = Self::exchange_gain(instance, assignment, i, j);
                    if gain > 0 {
                        assignment.swap_positions(i, j);
                        objective -= gain;
                        improved = true;
                    }
                }
            }
            if !improved {
                break;
            }
        }

        (objective, sweeps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Matrix, QAPInstance};
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn random_matrix(rng: &mut ChaCha8Rng, n: usize, with_diagonal: bool) -> Matrix {
        let rows: Vec<Vec<i64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j && !with_diagonal {
                            0
                        } else {
                            rng.gen_range(0..20)
                        }
                    })
                    .collect()
            })
            .collect();
        Matrix::from_rows(rows).unwrap()
    }

    fn random_assignment(rng: &mut ChaCha8Rng, n: usize) -> Permutation {
        let mut forward: Vec<usize> = (0..n).collect();
        forward.shuffle(rng);
        Permutation::from_vec(forward).unwrap()
    }

    #[test]
    fn test_gain_matches_brute_force_recomputation() {
        // Core correctness property: the incremental delta must equal the
        // naive before/after recomputation, including asymmetric matrices
        // with nonzero diagonals.
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        for n in 2..=8 {
            let instance = QAPInstance::new(
                "delta",
                random_matrix(&mut rng, n, true),
                random_matrix(&mut rng, n, true),
            )
            .unwrap();

            for _ in 0..20 {
                let assignment = random_assignment(&mut rng, n);
                let before = instance.evaluate(assignment.inverted().as_slice());

                for i in 0..n {
                    for j in (i + 1)..n {
                        let mut swapped = assignment.clone();
                        swapped.swap_positions(i, j);
                        let after = instance.evaluate(swapped.inverted().as_slice());

                        let gain = TwoExchangeSearch::exchange_gain(&instance, &assignment, i, j);
                        assert_eq!(gain, before - after, "n={} i={} j={}", n, i, j);
                    }
                }
            }
        }
    }

    #[test]
    fn test_improve_never_increases_objective() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let search = TwoExchangeSearch::new();

        for trial in 0..10 {
            let instance = QAPInstance::random("descent", 9, 30, true, trial).unwrap();
            let mut assignment = random_assignment(&mut rng, 9);
            let start = instance.evaluate(assignment.inverted().as_slice());

            let (end, sweeps) = search.improve(&instance, &mut assignment, start);
            assert!(end <= start);
            assert!(sweeps >= 1);
            assert_eq!(end, instance.evaluate(assignment.inverted().as_slice()));
        }
    }

    #[test]
    fn test_improve_reaches_a_local_optimum() {
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        let instance = QAPInstance::random("optimum", 8, 25, true, 4).unwrap();
        let mut assignment = random_assignment(&mut rng, 8);
        let start = instance.evaluate(assignment.inverted().as_slice());

        let search = TwoExchangeSearch::new();
        let (_, _) = search.improve(&instance, &mut assignment, start);

        for i in 0..8 {
            for j in (i + 1)..8 {
                assert!(TwoExchangeSearch::exchange_gain(&instance, &assignment, i, j) <= 0);
            }
        }
    }

    #[test]
    fn test_improve_terminates_within_a_modest_sweep_count() {
        // Convergence is not bounded analytically; check it empirically.
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let search = TwoExchangeSearch::new();

        for trial in 0..20 {
            let instance = QAPInstance::random("sweeps", 12, 50, trial % 2 == 0, trial).unwrap();
            let mut assignment = random_assignment(&mut rng, 12);
            let start = instance.evaluate(assignment.inverted().as_slice());

            let (_, sweeps) = search.improve(&instance, &mut assignment, start);
            assert!(sweeps <= 100, "trial {} needed {} sweeps", trial, sweeps);
            assert!(assignment.is_valid());
        }
    }
}
