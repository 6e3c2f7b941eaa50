//! Prediction over single vectors, sample stores and `ndarray` batches.
//!
//! [`Predict`] is implemented for a single [`Tree`](crate::tree::Tree) and
//! for a [`GbdtModel`](crate::boosting::GbdtModel). Traversal never mutates
//! the model, so batches are evaluated in parallel.

pub mod predictor;

pub use predictor::Predict;
