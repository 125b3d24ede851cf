//! QAP GRASP Solver Library
//!
//! A heuristic solver for the Quadratic Assignment Problem (QAP): given n
//! facilities and n locations with a flow matrix F and a distance matrix D,
//! find the assignment minimizing the sum of F(i,j) * D(p(i),p(j)) over all
//! facility pairs.
//!
//! # Features
//!
//! - GRASP metaheuristic: randomized-greedy two-stage construction seeded by
//!   a pre-ranked candidate list, improved by 2-exchange local search
//! - Deterministic Park-Miller random stream for reproducible runs
//! - QAPLIB format parsing and random instance generation
//! - Benchmarking with CSV export
//!
//! # Example
//!
//! ```no_run
//! use qap_grasp_solver::heuristics::grasp::{GraspConfig, GraspSolver};
//! use qap_grasp_solver::instance::QAPInstance;
//!
//! // Load instance
//! let instance = QAPInstance::from_file("nug12.dat").unwrap();
//!
//! // Solve with default parameters
//! let solver = GraspSolver::new(GraspConfig::default());
//! let solution = solver.solve(&instance).unwrap();
//!
//! println!("Best cost: {}", solution.cost);
//! println!("Assignment: {:?}", solution.permutation);
//! ```

pub mod instance;
pub mod solution;
pub mod rng;
pub mod heap;
pub mod heuristics;
pub mod benchmark;

pub use instance::QAPInstance;
pub use solution::Solution;
