//! GRASP driver: repeated randomized construction plus local search.

use crate::heuristics::candidates::CandidateList;
use crate::heuristics::construction::Construction;
use crate::heuristics::local_search::TwoExchangeSearch;
use crate::instance::QAPInstance;
use crate::rng::RandomStream;
use crate::solution::{Permutation, Solution};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Tunable parameters of the GRASP loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraspConfig {
    /// Construction greediness in (0, 1]; smaller samples closer to the
    /// greedy choice
    pub alpha: f64,
    /// Candidate-list retention fraction in (0, 1]
    pub beta: f64,
    /// Iteration budget (>= 1)
    pub iterations: usize,
    /// Stop as soon as the incumbent cost reaches this value
    /// (`i64::MAX` disables early exit)
    pub target: i64,
    /// Initial generator seed (non-zero)
    pub seed: u32,
}

impl Default for GraspConfig {
    fn default() -> Self {
        GraspConfig {
            alpha: 0.25,
            beta: 0.5,
            iterations: 128,
            target: i64::MAX,
            seed: 270_001,
        }
    }
}

impl GraspConfig {
    /// Fail fast on parameters the selection formulas divide by.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(format!("alpha must be in (0, 1], got {}", self.alpha));
        }
        if !(self.beta > 0.0 && self.beta <= 1.0) {
            return Err(format!("beta must be in (0, 1], got {}", self.beta));
        }
        if self.iterations < 1 {
            return Err("iterations must be >= 1".to_string());
        }
        if self.seed == 0 {
            return Err("seed must be a positive non-zero integer".to_string());
        }
        Ok(())
    }
}

/// GRASP solver for the QAP.
///
/// Builds the candidate list once, then alternates randomized-greedy
/// construction and 2-exchange local search, keeping the best assignment
/// seen. Terminates early once the incumbent reaches the configured target.
pub struct GraspSolver {
    config: GraspConfig,
}

impl GraspSolver {
    pub fn new(config: GraspConfig) -> Self {
        GraspSolver { config }
    }

    pub fn with_defaults() -> Self {
        GraspSolver {
            config: GraspConfig::default(),
        }
    }

    pub fn config(&self) -> &GraspConfig {
        &self.config
    }

    /// Run the full GRASP loop and return the best assignment found.
    pub fn solve(&self, instance: &QAPInstance) -> Result<Solution, String> {
        self.config.validate()?;
        if instance.n < 2 {
            return Err(format!("instance must have n >= 2, got {}", instance.n));
        }

        let start = Instant::now();
        let mut rng = RandomStream::new(self.config.seed)?;

        let candidates = CandidateList::build(instance, self.config.beta);
        log::debug!(
            "candidate list for {} holds {} entries",
            instance.name,
            candidates.len()
        );

        let mut construction = Construction::new(instance, &candidates, self.config.alpha);
        let search = TwoExchangeSearch::new();

        let mut incumbent: Option<Permutation> = None;
        let mut incumbent_cost = i64::MAX;
        let mut performed = 0usize;
        let mut target_met = false;

        for iteration in 1..=self.config.iterations {
            performed = iteration;

            let (facilities, locations, constructed) = construction.run(&mut rng);
            let mut assignment = Permutation::from_pairs(&facilities, &locations);
            let (objective, sweeps) = search.improve(instance, &mut assignment, constructed);

            if objective < incumbent_cost {
                incumbent_cost = objective;
                incumbent = Some(assignment);
                log::info!(
                    "iteration {}: new incumbent {} ({} sweeps)",
                    iteration,
                    incumbent_cost,
                    sweeps
                );
            }

            if self.config.target != i64::MAX && incumbent_cost <= self.config.target {
                target_met = true;
                log::info!(
                    "target {} reached after {} iterations",
                    self.config.target,
                    iteration
                );
                break;
            }
        }

        let assignment = incumbent.ok_or_else(|| "no iteration completed".to_string())?;
        Ok(Solution {
            permutation: assignment.inverted().to_vec(),
            cost: incumbent_cost,
            algorithm: "GRASP".to_string(),
            computation_time: start.elapsed().as_secs_f64(),
            iterations: performed,
            target_met,
            final_seed: rng.state(),
        })
    }
}
