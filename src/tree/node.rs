//! Tree node types.
//!
//! Induction works on [`TrainingNode`]s, each owning the rows that reached
//! it. Once a node is decided it is frozen into an immutable [`TreeNode`] in
//! the tree arena and its rows are dropped.

use crate::core::types::{FeatureIndex, NodeIndex};
use crate::dataset::SampleStore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A finalized node of a trained tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Terminal node carrying the prediction value.
    Leaf {
        /// Depth from the root (root = 0)
        level: usize,
        /// Output value: positive fraction for classification, response
        /// mean (possibly shrunk) for regression
        value: f64,
        /// Training rows that reached this leaf
        samples: usize,
        /// Rows labelled 1
        positives: usize,
        /// Rows not labelled 1
        negatives: usize,
    },
    /// Internal node testing `x[attr_index] <= partition_value`.
    Split {
        /// Depth from the root (root = 0)
        level: usize,
        /// Attribute tested
        attr_index: FeatureIndex,
        /// Rows with `x[attr_index] <= partition_value` go left
        partition_value: f64,
        /// Criterion score of the chosen split
        gain: f64,
        /// Gain over leaving the node unsplit; never negative
        improvement: f64,
        /// Training rows that reached this node
        samples: usize,
        /// Left child, absent when no row went left
        left: Option<NodeIndex>,
        /// Right child, absent when no row went right
        right: Option<NodeIndex>,
    },
}

impl TreeNode {
    /// Returns true if this node is a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Depth of the node.
    pub fn level(&self) -> usize {
        match *self {
            TreeNode::Leaf { level, .. } | TreeNode::Split { level, .. } => level,
        }
    }

    /// Number of training rows that reached the node.
    pub fn samples(&self) -> usize {
        match *self {
            TreeNode::Leaf { samples, .. } | TreeNode::Split { samples, .. } => samples,
        }
    }

    /// Leaf value, `None` for split nodes.
    pub fn value(&self) -> Option<f64> {
        match *self {
            TreeNode::Leaf { value, .. } => Some(value),
            TreeNode::Split { .. } => None,
        }
    }

    /// Child indices of a split node, `(None, None)` for a leaf.
    pub fn children(&self) -> (Option<NodeIndex>, Option<NodeIndex>) {
        match *self {
            TreeNode::Leaf { .. } => (None, None),
            TreeNode::Split { left, right, .. } => (left, right),
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TreeNode::Leaf {
                level,
                value,
                samples,
                positives,
                negatives,
            } => write!(
                f,
                "[leaf] level={} value={} samples={} pos/neg={}/{}",
                level, value, samples, positives, negatives
            ),
            TreeNode::Split {
                level,
                attr_index,
                partition_value,
                gain,
                samples,
                ..
            } => write!(
                f,
                "[split] level={} x[{}] <= {} gain={:.6} samples={}",
                level, attr_index, partition_value, gain, samples
            ),
        }
    }
}

/// A node still being induced.
///
/// Owns the rows that reached it; they are handed to the children on split
/// and dropped on leaf creation.
#[derive(Debug, Clone)]
pub struct TrainingNode {
    pub(crate) level: usize,
    pub(crate) store: SampleStore,
    /// Side mean computed by the parent's split, used as leaf value
    pub(crate) carried_value: Option<f64>,
    /// Arena slot this node will be written to
    pub(crate) slot: NodeIndex,
}

impl TrainingNode {
    /// The root of a new tree, written to arena slot 0.
    pub fn root(store: SampleStore) -> Self {
        TrainingNode {
            level: 0,
            store,
            carried_value: None,
            slot: 0,
        }
    }

    /// A child one level below `parent_level`.
    pub fn child(
        parent_level: usize,
        store: SampleStore,
        carried_value: Option<f64>,
        slot: NodeIndex,
    ) -> Self {
        TrainingNode {
            level: parent_level + 1,
            store,
            carried_value,
            slot,
        }
    }

    /// Depth of the node.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Rows that reached the node.
    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    /// Arena slot.
    pub fn slot(&self) -> NodeIndex {
        self.slot
    }

    /// Freeze into a leaf with the given value, dropping the rows.
    pub fn into_leaf(self, value: f64) -> TreeNode {
        TreeNode::Leaf {
            level: self.level,
            value,
            samples: self.store.len(),
            positives: self.store.positives(),
            negatives: self.store.negatives(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_node_into_leaf() {
        let store =
            SampleStore::from_rows(vec![vec![1.0], vec![2.0], vec![3.0]], vec![1.0, 0.0, 1.0])
                .unwrap();
        let root = TrainingNode::root(store.clone());
        assert_eq!(root.level(), 0);
        assert_eq!(root.slot(), 0);

        let child = TrainingNode::child(root.level(), store, Some(0.25), 4);
        assert_eq!(child.level(), 1);
        assert_eq!(child.carried_value, Some(0.25));

        let leaf = child.into_leaf(0.25);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.value(), Some(0.25));
        assert_eq!(leaf.samples(), 3);
        assert_eq!(leaf.level(), 1);
        assert_eq!(leaf.children(), (None, None));
    }

    #[test]
    fn test_split_node_accessors() {
        let node = TreeNode::Split {
            level: 2,
            attr_index: 3,
            partition_value: 0.5,
            gain: 0.7,
            improvement: 0.7,
            samples: 10,
            left: Some(1),
            right: None,
        };
        assert!(!node.is_leaf());
        assert_eq!(node.value(), None);
        assert_eq!(node.children(), (Some(1), None));
        assert!(node.to_string().contains("x[3] <= 0.5"));
    }
}
