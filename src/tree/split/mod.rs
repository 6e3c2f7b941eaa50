//! Split scoring and best-split search.
//!
//! A [`SplitCriterion`] scores one `(attribute, threshold)` candidate over a
//! node's rows. [`find_best_split`] drives a criterion across every attribute
//! and the candidate thresholds sampled for it.

pub mod criterion;
pub mod finder;

pub use criterion::{entropy, information_gain, InformationGain, SplitCriterion, SplitScore, SquaredError};
pub use finder::{candidate_values, find_best_split, SplitInfo};
