//! GRASP engine for the QAP.
//!
//! This module exports the candidate list builder, the randomized-greedy
//! construction, the 2-exchange local search, and the driver tying them
//! together.

pub mod candidates;
pub mod construction;
pub mod grasp;
pub mod local_search;

pub use candidates::*;
pub use construction::*;
pub use grasp::*;
pub use local_search::*;
