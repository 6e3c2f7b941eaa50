//! Tree and boosting parameters.
//!
//! [`TreeParams`] carries every recognized training option. It is passed
//! explicitly to each train call; nothing is cached between calls.

use crate::core::constants::*;
use crate::core::error::{DTreeError, Result};
use crate::core::types::LossKind;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Training parameters for single trees and the boosting driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Hard depth cap; a node at this level always becomes a leaf
    pub max_level: usize,
    /// Majority fraction at which a classification node stops, in (0, 1]
    pub split_threshold: f64,
    /// Number of leading rows whose values are tried as split thresholds
    pub max_attr_try_time: usize,
    /// Regression node size at or below which the node stops
    pub min_samples_in_leave: usize,
    /// Number of boosting rounds
    pub tree_number: usize,
    /// Shrinkage factor applied to every leaf of a boosted tree, in (0, 1]
    pub learning_rate: f64,
    /// Score attributes on the rayon pool instead of serially
    pub parallel_split_search: bool,
    /// Once this many leaves exist, pending nodes stop; unbounded when unset
    pub max_leaf_number: Option<usize>,
    /// Boosting loss
    pub loss: LossKind,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams {
            max_level: DEFAULT_MAX_LEVEL,
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            max_attr_try_time: DEFAULT_MAX_ATTR_TRY_TIME,
            min_samples_in_leave: DEFAULT_MIN_SAMPLES_IN_LEAVE,
            tree_number: DEFAULT_TREE_NUMBER,
            learning_rate: DEFAULT_LEARNING_RATE,
            parallel_split_search: false,
            max_leaf_number: None,
            loss: LossKind::Ls,
        }
    }
}

impl TreeParams {
    /// Create parameters with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the parameters
    pub fn validate(&self) -> Result<()> {
        if !(self.split_threshold > 0.0 && self.split_threshold <= 1.0) {
            return Err(DTreeError::invalid_parameter(
                "split_threshold",
                self.split_threshold.to_string(),
                "must be in range (0.0, 1.0]",
            ));
        }

        if self.max_attr_try_time == 0 {
            return Err(DTreeError::invalid_parameter(
                "max_attr_try_time",
                "0",
                "must be positive",
            ));
        }

        if self.min_samples_in_leave < 1 {
            return Err(DTreeError::invalid_parameter(
                "min_samples_in_leave",
                self.min_samples_in_leave.to_string(),
                "must be at least 1",
            ));
        }

        if self.tree_number == 0 {
            return Err(DTreeError::invalid_parameter(
                "tree_number",
                "0",
                "must be positive",
            ));
        }

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(DTreeError::invalid_parameter(
                "learning_rate",
                self.learning_rate.to_string(),
                "must be in range (0.0, 1.0]",
            ));
        }

        if self.max_leaf_number == Some(0) {
            return Err(DTreeError::invalid_parameter(
                "max_leaf_number",
                "0",
                "must be positive when set",
            ));
        }

        Ok(())
    }

    /// Load parameters from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DTreeError::config(format!("Failed to read config file: {}", e)))?;

        let params: TreeParams = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| DTreeError::config(format!("Failed to parse JSON config: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| DTreeError::config(format!("Failed to parse TOML config: {}", e)))?,
            _ => {
                return Err(DTreeError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        params.validate()?;
        Ok(params)
    }

    /// Save parameters to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| DTreeError::config(format!("Failed to serialize to JSON: {}", e)))?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| DTreeError::config(format!("Failed to serialize to TOML: {}", e)))?,
            _ => {
                return Err(DTreeError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)
            .map_err(|e| DTreeError::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Load parameters from `DTREE_*` environment variables on top of
    /// the defaults
    pub fn load_from_environment() -> Result<Self> {
        let mut params = TreeParams::default();
        params.apply_environment_overrides()?;
        Ok(params)
    }

    /// Apply any `DTREE_*` environment variables present to these
    /// parameters
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        fn read<T: FromStr>(key: &str) -> Result<Option<T>> {
            let name = format!("{}{}", ENV_PREFIX, key);
            match std::env::var(&name) {
                Ok(val) => val
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| DTreeError::config(format!("Invalid {}", name))),
                Err(_) => Ok(None),
            }
        }

        if let Some(v) = read("MAX_LEVEL")? {
            self.max_level = v;
        }
        if let Some(v) = read("SPLIT_THRESHOLD")? {
            self.split_threshold = v;
        }
        if let Some(v) = read("MAX_ATTR_TRY_TIME")? {
            self.max_attr_try_time = v;
        }
        if let Some(v) = read("MIN_SAMPLES_IN_LEAVE")? {
            self.min_samples_in_leave = v;
        }
        if let Some(v) = read("TREE_NUMBER")? {
            self.tree_number = v;
        }
        if let Some(v) = read("LEARNING_RATE")? {
            self.learning_rate = v;
        }
        if let Some(v) = read("MAX_LEAF_NUMBER")? {
            self.max_leaf_number = Some(v);
        }
        if let Some(v) = read("LOSS")? {
            self.loss = v;
        }

        self.validate()
    }
}

/// Builder for [`TreeParams`]
#[derive(Debug, Clone)]
pub struct ParamsBuilder {
    params: TreeParams,
    validation_errors: Vec<String>,
}

impl ParamsBuilder {
    /// Create a new builder seeded with the defaults
    pub fn new() -> Self {
        ParamsBuilder {
            params: TreeParams::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the depth cap
    pub fn max_level(mut self, level: usize) -> Self {
        self.params.max_level = level;
        self
    }

    /// Set the classification purity stop
    pub fn split_threshold(mut self, threshold: f64) -> Self {
        if !(threshold > 0.0 && threshold <= 1.0) {
            self.validation_errors
                .push("split_threshold must be in range (0.0, 1.0]".to_string());
        }
        self.params.split_threshold = threshold;
        self
    }

    /// Set the number of candidate rows per attribute
    pub fn max_attr_try_time(mut self, tries: usize) -> Self {
        if tries == 0 {
            self.validation_errors
                .push("max_attr_try_time must be positive".to_string());
        }
        self.params.max_attr_try_time = tries;
        self
    }

    /// Set the regression size stop
    pub fn min_samples_in_leave(mut self, samples: usize) -> Self {
        if samples < 1 {
            self.validation_errors
                .push("min_samples_in_leave must be at least 1".to_string());
        }
        self.params.min_samples_in_leave = samples;
        self
    }

    /// Set the ensemble size
    pub fn tree_number(mut self, trees: usize) -> Self {
        if trees == 0 {
            self.validation_errors
                .push("tree_number must be positive".to_string());
        }
        self.params.tree_number = trees;
        self
    }

    /// Set the shrinkage factor
    pub fn learning_rate(mut self, rate: f64) -> Self {
        if !(rate > 0.0 && rate <= 1.0) {
            self.validation_errors
                .push("learning_rate must be in range (0.0, 1.0]".to_string());
        }
        self.params.learning_rate = rate;
        self
    }

    /// Score attributes in parallel during split search
    pub fn parallel_split_search(mut self, enabled: bool) -> Self {
        self.params.parallel_split_search = enabled;
        self
    }

    /// Cap the number of leaves per tree
    pub fn max_leaf_number(mut self, leaves: usize) -> Self {
        if leaves == 0 {
            self.validation_errors
                .push("max_leaf_number must be positive".to_string());
        }
        self.params.max_leaf_number = Some(leaves);
        self
    }

    /// Set the boosting loss
    pub fn loss(mut self, loss: LossKind) -> Self {
        self.params.loss = loss;
        self
    }

    /// Build the parameters
    pub fn build(self) -> Result<TreeParams> {
        if !self.validation_errors.is_empty() {
            return Err(DTreeError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.params.validate()?;
        Ok(self.params)
    }
}

impl Default for ParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
