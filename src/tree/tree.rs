//! Trained decision tree.
//!
//! Nodes live in a contiguous arena with the root at index 0; children are
//! referenced by index. Every walk over the tree uses an explicit stack, so
//! unbalanced trees never deepen the call stack.

use crate::core::error::{DTreeError, Result};
use crate::core::types::{FeatureIndex, NodeIndex, Score, TreeKind};
use crate::tree::node::TreeNode;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trained binary decision tree.
///
/// Immutable after induction apart from [`Tree::shrink`], which the boosting
/// driver applies once before storing the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    /// Node arena (index 0 is always the root)
    nodes: Vec<TreeNode>,
    /// Criterion family the tree was induced with
    kind: TreeKind,
    /// Width of the feature vectors the tree was trained on
    num_features: usize,
}

impl Tree {
    pub(crate) fn from_nodes(kind: TreeKind, num_features: usize, nodes: Vec<TreeNode>) -> Self {
        Tree {
            nodes,
            kind,
            num_features,
        }
    }

    /// A tree made of a single leaf.
    pub fn constant(kind: TreeKind, num_features: usize, value: f64) -> Self {
        let leaf = TreeNode::Leaf {
            level: 0,
            value,
            samples: 0,
            positives: 0,
            negatives: 0,
        };
        Self::from_nodes(kind, num_features, vec![leaf])
    }

    /// Criterion family of the tree.
    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    /// Width of the training feature vectors.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Returns the number of nodes in the tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Deepest node level.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(TreeNode::level).max().unwrap_or(0)
    }

    /// Node at `index`.
    pub fn node(&self, index: NodeIndex) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    /// All nodes in arena order.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Root node.
    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.first()
    }

    /// Index of the leaf `x` falls into.
    ///
    /// Fails with `InvalidTraversal` if `x` is shorter than a tested
    /// attribute or the branch taken leads to an absent child.
    pub fn predict_leaf_index(&self, x: &[f64]) -> Result<NodeIndex> {
        let mut index = 0;

        loop {
            let node = self
                .nodes
                .get(index)
                .ok_or_else(|| DTreeError::invalid_traversal(index, 0, f64::NAN))?;

            match *node {
                TreeNode::Leaf { .. } => return Ok(index),
                TreeNode::Split {
                    attr_index,
                    partition_value,
                    left,
                    right,
                    ..
                } => {
                    let value = *x.get(attr_index).ok_or_else(|| {
                        DTreeError::invalid_traversal(index, attr_index, f64::NAN)
                    })?;
                    let next = if value <= partition_value { left } else { right };
                    index = next
                        .ok_or_else(|| DTreeError::invalid_traversal(index, attr_index, value))?;
                }
            }
        }
    }

    /// Predicts the output for a single feature vector.
    pub fn predict(&self, x: &[f64]) -> Result<Score> {
        let leaf = self.predict_leaf_index(x)?;
        self.nodes[leaf]
            .value()
            .ok_or_else(|| DTreeError::invalid_traversal(leaf, 0, f64::NAN))
    }

    /// Multiply every reachable leaf value by `rate`.
    pub fn shrink(&mut self, rate: f64) {
        let mut stack = vec![0];
        while let Some(index) = stack.pop() {
            match self.nodes.get_mut(index) {
                Some(TreeNode::Leaf { value, .. }) => *value *= rate,
                Some(TreeNode::Split { left, right, .. }) => {
                    stack.extend(right.iter().chain(left.iter()).copied());
                }
                None => {}
            }
        }
    }

    /// Reachable leaves in depth-first, left-to-right order.
    pub fn leaves(&self) -> Vec<&TreeNode> {
        let mut leaves = Vec::new();
        let mut stack = vec![0];
        while let Some(index) = stack.pop() {
            match self.nodes.get(index) {
                Some(leaf @ TreeNode::Leaf { .. }) => leaves.push(leaf),
                Some(TreeNode::Split { left, right, .. }) => {
                    stack.extend(right.iter().chain(left.iter()).copied());
                }
                None => {}
            }
        }
        leaves
    }

    /// Total training rows across all leaves; equals the root's row count.
    pub fn leaf_sample_total(&self) -> usize {
        self.leaves().iter().map(|leaf| leaf.samples()).sum()
    }

    /// Split improvement summed per attribute.
    ///
    /// Attributes at or beyond `num_features` are not counted.
    pub fn split_gains(&self, num_features: usize) -> Array1<f64> {
        let mut gains = Array1::zeros(num_features);
        for node in &self.nodes {
            if let TreeNode::Split {
                attr_index,
                improvement,
                ..
            } = *node
            {
                if attr_index < num_features {
                    gains[attr_index] += improvement;
                }
            }
        }
        gains
    }

    /// Attributes tested anywhere in the tree, ascending and deduplicated.
    pub fn used_attributes(&self) -> Vec<FeatureIndex> {
        let mut attrs: Vec<FeatureIndex> = self
            .nodes
            .iter()
            .filter_map(|node| match *node {
                TreeNode::Split { attr_index, .. } => Some(attr_index),
                TreeNode::Leaf { .. } => None,
            })
            .collect();
        attrs.sort_unstable();
        attrs.dedup();
        attrs
    }

    /// Converts the tree to a JSON representation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Creates a tree from a JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Indented dump, one line per node, left subtree first.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<(Option<NodeIndex>, usize)> = vec![(Some(0), 0)];
        while let Some((index, indent)) = stack.pop() {
            let pad = "  ".repeat(indent);
            match index.and_then(|i| self.nodes.get(i)) {
                Some(node) => {
                    writeln!(f, "{}{}", pad, node)?;
                    if let TreeNode::Split { left, right, .. } = *node {
                        stack.push((right, indent + 1));
                        stack.push((left, indent + 1));
                    }
                }
                None => writeln!(f, "{}[absent]", pad)?,
            }
        }
        Ok(())
    }
}
