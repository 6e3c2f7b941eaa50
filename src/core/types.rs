//! Core data types shared across the crate.

use crate::core::error::{DTreeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Feature index type for identifying attributes in a feature vector.
pub type FeatureIndex = usize;

/// Tree node identifier type (position in a tree's node arena).
pub type NodeIndex = usize;

/// Target value type. Classification labels are 0.0 or 1.0.
pub type Label = f64;

/// Prediction value type.
pub type Score = f64;

/// One feature vector. Rows are shared between a store and every store
/// split or derived from it; only the handle is cloned.
pub type Row = Arc<[f64]>;

/// The kind of tree being induced, which selects the split criterion and
/// stopping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeKind {
    /// Information gain criterion, purity stop, leaf = positive fraction
    Classification,
    /// Squared error criterion, size stop, leaf = mean response
    Regression,
}

impl Default for TreeKind {
    fn default() -> Self {
        TreeKind::Regression
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeKind::Classification => write!(f, "classification"),
            TreeKind::Regression => write!(f, "regression"),
        }
    }
}

/// Boosting loss.
///
/// Every loss fits its regression trees with the squared-error criterion
/// against a per-row response; they differ in the base value, the response,
/// and how a leaf turns its rows into an output value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossKind {
    /// Least squares: base = label mean, response = residual, leaf = mean
    Ls,
    /// Least absolute deviation: base = label median,
    /// response = sign(residual), leaf = median residual
    Lad,
    /// Binomial log-likelihood over labels mapped to {-1, +1}, one Newton
    /// step per leaf
    Logistic,
}

impl Default for LossKind {
    fn default() -> Self {
        LossKind::Ls
    }
}

impl fmt::Display for LossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LossKind::Ls => write!(f, "ls"),
            LossKind::Lad => write!(f, "lad"),
            LossKind::Logistic => write!(f, "logistic"),
        }
    }
}

impl FromStr for LossKind {
    type Err = DTreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ls" => Ok(LossKind::Ls),
            "lad" => Ok(LossKind::Lad),
            "logistic" => Ok(LossKind::Logistic),
            other => Err(DTreeError::invalid_parameter(
                "loss",
                other,
                "must be \"ls\", \"lad\" or \"logistic\"",
            )),
        }
    }
}

/// Sample file formats understood by the loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// `<label> <v1> <v2> ...`
    Dense,
    /// `<label> <index>:<value> ...` with 1-based indices
    Sparse,
}

impl Default for SampleFormat {
    fn default() -> Self {
        SampleFormat::Dense
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleFormat::Dense => write!(f, "dense"),
            SampleFormat::Sparse => write!(f, "sparse"),
        }
    }
}

impl FromStr for SampleFormat {
    type Err = DTreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dense" => Ok(SampleFormat::Dense),
            "sparse" | "liblinear" => Ok(SampleFormat::Sparse),
            other => Err(DTreeError::invalid_parameter(
                "format",
                other,
                "must be \"dense\" or \"sparse\"",
            )),
        }
    }
}
