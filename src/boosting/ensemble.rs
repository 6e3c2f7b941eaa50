//! Trained GBDT ensemble.
//!
//! A [`GbdtModel`] is the base value `F0` plus an ordered list of already
//! shrunk regression trees, tagged with the loss it was trained under. It is
//! the read-only structure handed to model consumers and the unit of JSON
//! persistence.

use crate::core::error::Result;
use crate::core::types::{LossKind, Score};
use crate::tree::Tree;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Per-round training record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Mean training loss after each round, under the model's loss
    pub losses: Vec<f64>,
}

impl TrainingHistory {
    /// Loss after the last round.
    pub fn final_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }

    /// Round with the lowest loss and that loss.
    pub fn best_round(&self) -> Option<(usize, f64)> {
        self.losses
            .iter()
            .copied()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Base value plus ordered regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbdtModel {
    base_value: f64,
    trees: Vec<Tree>,
    #[serde(default)]
    history: TrainingHistory,
    #[serde(default)]
    loss: LossKind,
}

impl GbdtModel {
    /// Assemble a model from its parts.
    pub fn new(base_value: f64, trees: Vec<Tree>, history: TrainingHistory) -> Self {
        GbdtModel {
            base_value,
            trees,
            history,
            loss: LossKind::Ls,
        }
    }

    /// Tag the model with the loss it was trained under.
    pub fn with_loss(mut self, loss: LossKind) -> Self {
        self.loss = loss;
        self
    }

    /// Wrap a single tree with base value 0.
    pub fn from_tree(tree: Tree) -> Self {
        Self::new(0.0, vec![tree], TrainingHistory::default())
    }

    /// Initial constant `F0`.
    pub fn base_value(&self) -> f64 {
        self.base_value
    }

    /// Trees in insertion order.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Number of trees.
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Loss the model was trained under.
    pub fn loss(&self) -> LossKind {
        self.loss
    }

    /// Training history.
    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    /// Width of the training feature vectors, 0 for a tree-less model.
    pub fn num_features(&self) -> usize {
        self.trees.iter().map(Tree::num_features).max().unwrap_or(0)
    }

    /// `F0` plus the prediction of every tree.
    pub fn predict(&self, x: &[f64]) -> Result<Score> {
        let mut score = self.base_value;
        for tree in &self.trees {
            score += tree.predict(x)?;
        }
        Ok(score)
    }

    /// Probability of label 1, `1 / (1 + exp(-2 F(x)))`. Meaningful for
    /// models trained with the logistic loss.
    pub fn predict_logistic(&self, x: &[f64]) -> Result<Score> {
        Ok(1.0 / (1.0 + (-2.0 * self.predict(x)?).exp()))
    }

    /// Split improvement per attribute summed over all trees, normalized to
    /// sum to 1. All zeros when no tree splits.
    pub fn feature_importance(&self, num_features: usize) -> Array1<f64> {
        let mut importance = Array1::zeros(num_features);
        for tree in &self.trees {
            importance += &tree.split_gains(num_features);
        }
        let total = importance.sum();
        if total > 0.0 {
            importance /= total;
        }
        importance
    }

    /// Summary statistics over the trees.
    pub fn statistics(&self) -> EnsembleStatistics {
        let total_trees = self.trees.len();
        let (avg_tree_depth, avg_tree_leaves) = if total_trees > 0 {
            let depth: usize = self.trees.iter().map(Tree::depth).sum();
            let leaves: usize = self.trees.iter().map(Tree::num_leaves).sum();
            (
                depth as f64 / total_trees as f64,
                leaves as f64 / total_trees as f64,
            )
        } else {
            (0.0, 0.0)
        };

        EnsembleStatistics {
            total_trees,
            avg_tree_depth,
            avg_tree_leaves,
            base_value: self.base_value,
            final_loss: self.history.final_loss(),
        }
    }

    /// Exports the model to a JSON representation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Imports a model from a JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the model as JSON to `path`.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a model written by [`GbdtModel::save_json`].
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Ensemble summary.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleStatistics {
    /// Number of trees
    pub total_trees: usize,
    /// Mean tree depth
    pub avg_tree_depth: f64,
    /// Mean leaves per tree
    pub avg_tree_leaves: f64,
    /// `F0`
    pub base_value: f64,
    /// Training loss after the last round, if recorded
    pub final_loss: Option<f64>,
}

impl fmt::Display for EnsembleStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ensemble Statistics:")?;
        writeln!(f, "  Total trees: {}", self.total_trees)?;
        writeln!(f, "  Average tree depth: {:.2}", self.avg_tree_depth)?;
        writeln!(f, "  Average leaves per tree: {:.2}", self.avg_tree_leaves)?;
        writeln!(f, "  Base value: {:.6}", self.base_value)?;
        match self.final_loss {
            Some(loss) => write!(f, "  Final training loss: {:.6}", loss),
            None => write!(f, "  Final training loss: n/a"),
        }
    }
}
