//! Default configuration values.

/// Default hard depth cap; the root is level 0.
pub const DEFAULT_MAX_LEVEL: usize = 5;

/// Default majority-class fraction at which a classification node stops.
pub const DEFAULT_SPLIT_THRESHOLD: f64 = 0.8;

/// Default number of leading rows whose values become split candidates.
pub const DEFAULT_MAX_ATTR_TRY_TIME: usize = 1000;

/// Default node size at or below which a regression node stops.
pub const DEFAULT_MIN_SAMPLES_IN_LEAVE: usize = 3;

/// Default ensemble size.
pub const DEFAULT_TREE_NUMBER: usize = 800;

/// Default shrinkage factor applied to every leaf of a boosted tree.
pub const DEFAULT_LEARNING_RATE: f64 = 0.5;

/// Largest 1-based index accepted in a sparse sample file. Sparse rows are
/// expanded to dense vectors of the largest index seen.
pub const MAX_SPARSE_INDEX: usize = 1 << 20;

/// Newton-step numerator and denominator below which a logistic leaf
/// outputs 0.
pub const LOGISTIC_EPSILON: f64 = 1e-12;

/// Sentinel gain for the information-gain search (gain is never below 0).
pub const INFORMATION_GAIN_SENTINEL: f64 = -1.0;

/// Sentinel gain for the squared-error search (gain is a negated loss).
pub const SQUARED_ERROR_SENTINEL: f64 = -f64::MAX;

/// Prefix for parameter overrides read from the environment.
pub const ENV_PREFIX: &str = "DTREE_";
