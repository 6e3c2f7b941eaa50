//! # dtree-gbdt
//!
//! Binary decision tree induction and gradient boosted regression trees
//! over dense numeric samples.
//!
//! ## Features
//!
//! - **Two criteria**: information gain over {0, 1} labels for
//!   classification trees, squared error for regression trees.
//! - **Bounded split search**: candidate thresholds come from the first
//!   `max_attr_try_time` rows of each node; attributes can be scored on the
//!   rayon pool with identical results.
//! - **GBDT**: least-squares, least-absolute-deviation or logistic loss
//!   with shrinkage, per-round training loss and split-gain feature
//!   importance.
//! - **Arena trees**: trained trees are flat, immutable, serde-serializable
//!   structures with stack-based traversals.
//! - **Structured progress**: training reports [`TrainingEvent`]s to a
//!   caller-supplied [`TrainingObserver`] instead of printing.
//!
//! ## Quick Start
//!
//! ```rust
//! use dtree_gbdt::{NoopObserver, ParamsBuilder, Predict, SampleStore, GBDT};
//!
//! # fn main() -> dtree_gbdt::Result<()> {
//! let store = SampleStore::from_rows(
//!     (0..16).map(|i| vec![i as f64]).collect(),
//!     (0..16).map(|i| if i < 8 { 1.0 } else { 5.0 }).collect(),
//! )?;
//!
//! let params = ParamsBuilder::new()
//!     .tree_number(20)
//!     .learning_rate(0.5)
//!     .min_samples_in_leave(1)
//!     .build()?;
//!
//! let model = GBDT::new(params)?.train(&store, &mut NoopObserver)?;
//! let low = model.predict(&[2.0])?;
//! let high = model.predict(&[12.0])?;
//! assert!((low - 1.0).abs() < 1e-3);
//! assert!((high - 5.0).abs() < 1e-3);
//!
//! let all = model.predict_rows(&store)?;
//! assert_eq!(all.len(), 16);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: types, constants, the error type, training events, logging
//!   bootstrap
//! - [`config`]: [`TreeParams`] and its builder, file and environment loading
//! - [`dataset`]: [`SampleStore`] and the dense/sparse loaders
//! - [`tree`]: split criteria, the work-list [`TreeBuilder`], the [`Tree`]
//!   arena
//! - [`boosting`]: the [`GBDT`] trainer and [`GbdtModel`] ensemble
//! - [`prediction`]: the [`Predict`] trait with batch evaluation
//! - [`metrics`]: squared error, absolute error, logistic loss, accuracy

#![warn(missing_docs)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Sample storage and loading
pub mod dataset;

// Tree induction
pub mod tree;

// Boosting module
pub mod boosting;

// Prediction module
pub mod prediction;

// Metrics module
pub mod metrics;

// Re-export core functionality for convenience
pub use core::{
    constants::*,
    error::{DTreeError, Result},
    observer::{LogObserver, NoopObserver, RecordingObserver, TrainingEvent, TrainingObserver},
    types::*,
};

pub use config::{ParamsBuilder, TreeParams};

pub use dataset::{load, load_samples, load_sparse, parse_dense, parse_sparse, SampleStore};

pub use tree::{InformationGain, SplitCriterion, SquaredError, Tree, TreeBuilder, TreeNode};

pub use boosting::{GbdtModel, TrainingHistory, GBDT};

pub use prediction::Predict;

pub use metrics::{absolute_error, accuracy, logistic_loss, squared_error, ErrorSummary};

// Version information
pub use core::CORE_MODULE_VERSION as VERSION;

/// Initialize logging for the library.
///
/// Installs `env_logger` with `RUST_LOG` defaulting to `info`. Safe to call
/// repeatedly.
///
/// # Examples
///
/// ```rust
/// fn main() -> dtree_gbdt::Result<()> {
///     dtree_gbdt::init()?;
///     assert!(dtree_gbdt::is_initialized());
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    core::initialize_core()
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    core::is_core_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_initialization() {
        assert!(init().is_ok());
        assert!(is_initialized());
        assert!(!VERSION.is_empty());
    }
}
