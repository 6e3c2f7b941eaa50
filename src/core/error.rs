//! Error handling and error types for dtree-gbdt.
//!
//! Loading errors abort the load entirely, degenerate splits are recovered
//! by the tree builder, and traversal errors surface to the caller of
//! `predict`.

use std::io;
use thiserror::Error;

/// Main error type for the crate.
#[deny(missing_docs)]
#[derive(Error, Debug)]
pub enum DTreeError {
    /// Malformed sample file (inconsistent feature counts, bad numeric token)
    #[error("Data format error at line {line}: {message}")]
    DataFormat {
        /// 1-based line number in the input
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// Split search found no attribute beating the initial sentinel gain
    #[error("Degenerate split at level {level} over {samples} samples")]
    DegenerateSplit {
        /// Depth of the node being split
        level: usize,
        /// Rows held by that node
        samples: usize,
    },

    /// Prediction reached a node whose required child is absent
    #[error("Invalid traversal at node {node}: attribute {attr_index}, value {value}")]
    InvalidTraversal {
        /// Arena index of the node
        node: usize,
        /// Attribute the node tests
        attr_index: usize,
        /// Value the row holds for that attribute (NaN when the row is too short)
        value: f64,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Offending value as written
        value: String,
        /// Why the value was refused
        reason: String,
    },

    /// Dimension mismatch errors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected shape or length
        expected: String,
        /// Shape or length received
        actual: String,
    },

    /// Training requested on a store without rows
    #[error("Empty sample store")]
    EmptyDataset,

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        /// Underlying I/O error
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        /// Underlying serde_json error
        #[from]
        source: serde_json::Error,
    },
}

/// Type alias for Results using DTreeError
pub type Result<T> = std::result::Result<T, DTreeError>;

impl DTreeError {
    /// Create a data format error for a 1-based line number
    pub fn data_format<S: Into<String>>(line: usize, message: S) -> Self {
        DTreeError::DataFormat {
            line,
            message: message.into(),
        }
    }

    /// Create a degenerate split error
    pub fn degenerate_split(level: usize, samples: usize) -> Self {
        DTreeError::DegenerateSplit { level, samples }
    }

    /// Create an invalid traversal error
    pub fn invalid_traversal(node: usize, attr_index: usize, value: f64) -> Self {
        DTreeError::InvalidTraversal {
            node,
            attr_index,
            value,
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        DTreeError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        DTreeError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        DTreeError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            DTreeError::DegenerateSplit { .. } => true,
            DTreeError::DataFormat { .. }
            | DTreeError::InvalidTraversal { .. }
            | DTreeError::Config { .. }
            | DTreeError::InvalidParameter { .. }
            | DTreeError::DimensionMismatch { .. }
            | DTreeError::EmptyDataset
            | DTreeError::IO { .. }
            | DTreeError::Json { .. } => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            DTreeError::DataFormat { .. } => "data_format",
            DTreeError::DegenerateSplit { .. } => "degenerate_split",
            DTreeError::InvalidTraversal { .. } => "invalid_traversal",
            DTreeError::Config { .. } => "config",
            DTreeError::InvalidParameter { .. } => "invalid_parameter",
            DTreeError::DimensionMismatch { .. } => "dimension_mismatch",
            DTreeError::EmptyDataset => "empty_dataset",
            DTreeError::IO { .. } => "io",
            DTreeError::Json { .. } => "json",
        }
    }
}
