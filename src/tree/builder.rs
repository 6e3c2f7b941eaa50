//! Work-list tree induction.
//!
//! The builder keeps a LIFO stack of pending [`TrainingNode`]s. Each popped
//! node either becomes a leaf (stop rule hit or no usable split) or is
//! partitioned into at most two children that are pushed back onto the
//! stack. Sibling order only changes the order of emitted events.

use crate::config::TreeParams;
use crate::core::error::{DTreeError, Result};
use crate::core::observer::{TrainingEvent, TrainingObserver};
use crate::core::types::{LossKind, NodeIndex, TreeKind};
use crate::dataset::SampleStore;
use crate::tree::node::{TrainingNode, TreeNode};
use crate::tree::split::{find_best_split, InformationGain, SplitCriterion, SplitInfo, SquaredError};
use crate::tree::tree::Tree;

/// Induces a single tree with the criterion matching its [`TreeKind`].
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    kind: TreeKind,
    params: TreeParams,
}

impl TreeBuilder {
    /// Create a builder; fails if `params` does not validate.
    pub fn new(kind: TreeKind, params: TreeParams) -> Result<Self> {
        params.validate()?;
        Ok(TreeBuilder { kind, params })
    }

    /// Classification builder (information gain).
    pub fn classification(params: TreeParams) -> Result<Self> {
        Self::new(TreeKind::Classification, params)
    }

    /// Regression builder (squared error).
    pub fn regression(params: TreeParams) -> Result<Self> {
        Self::new(TreeKind::Regression, params)
    }

    /// Criterion family of the trees built.
    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    /// Parameters in use.
    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    fn criterion(&self) -> &'static dyn SplitCriterion {
        match self.kind {
            TreeKind::Classification => &InformationGain,
            TreeKind::Regression => &SquaredError,
        }
    }

    /// Build a tree from `store`.
    ///
    /// A regression store without a residual is fitted against its labels.
    /// Once `max_leaf_number` leaves exist, every node still pending becomes
    /// a leaf. Degenerate split searches are recovered by forcing a leaf; they are
    /// reported through `observer` and never returned.
    pub fn build(&self, mut store: SampleStore, observer: &mut dyn TrainingObserver) -> Result<Tree> {
        if store.is_empty() {
            return Err(DTreeError::EmptyDataset);
        }
        if self.kind == TreeKind::Regression && store.residual().is_none() {
            let labels = store.labels().to_vec();
            store.set_residual(labels)?;
        }

        let num_features = store.num_features();
        let criterion = self.criterion();
        let mut nodes = vec![placeholder()];
        let mut pending = vec![TrainingNode::root(store)];
        let mut leaves = 0usize;

        while let Some(mut node) = pending.pop() {
            node.store.refresh_response();

            if self.should_stop(&node, leaves) {
                let slot = node.slot;
                nodes[slot] = self.make_leaf(node, observer);
                leaves += 1;
                continue;
            }

            let split = match find_best_split(&node.store, criterion, &self.params, node.level) {
                Ok(split) => split,
                Err(DTreeError::DegenerateSplit { level, samples }) => {
                    observer.on_event(&TrainingEvent::DegenerateSplit { level, samples });
                    let slot = node.slot;
                    nodes[slot] = self.make_leaf(node, observer);
                    leaves += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let improvement = split.gain - criterion.unsplit_gain(&node.store);
            let TrainingNode {
                level,
                store,
                slot,
                ..
            } = node;
            let samples = store.len();
            let (left_store, right_store) = self.partition(store, &split)?;

            observer.on_event(&TrainingEvent::NodeSplit {
                level,
                gain: split.gain,
                attr_index: split.attr_index,
                partition_value: split.partition_value,
                left: left_store.len(),
                right: right_store.len(),
            });

            let (left_value, right_value) = match split.side_values {
                Some((l, r)) => (Some(l), Some(r)),
                None => (None, None),
            };
            let left = enqueue(&mut nodes, &mut pending, level, left_store, left_value);
            let right = enqueue(&mut nodes, &mut pending, level, right_store, right_value);

            nodes[slot] = TreeNode::Split {
                level,
                attr_index: split.attr_index,
                partition_value: split.partition_value,
                gain: split.gain,
                improvement: improvement.max(0.0),
                samples,
                left,
                right,
            };
        }

        Ok(Tree::from_nodes(self.kind, num_features, nodes))
    }

    fn should_stop(&self, node: &TrainingNode, leaves: usize) -> bool {
        if node.level >= self.params.max_level {
            return true;
        }
        if self.params.max_leaf_number.map_or(false, |max| leaves >= max) {
            return true;
        }
        let store = &node.store;
        match self.kind {
            TreeKind::Classification => {
                let majority = store.positives().max(store.negatives()) as f64;
                majority / store.len() as f64 >= self.params.split_threshold
            }
            TreeKind::Regression => store.len() <= self.params.min_samples_in_leave,
        }
    }

    fn make_leaf(&self, node: TrainingNode, observer: &mut dyn TrainingObserver) -> TreeNode {
        let store = &node.store;
        let value = match self.kind {
            TreeKind::Classification => store.positives() as f64 / store.len() as f64,
            TreeKind::Regression => match store.loss() {
                LossKind::Ls => node
                    .carried_value
                    .or_else(|| store.response_mean())
                    .unwrap_or(0.0),
                loss => store.residual().map_or(0.0, |r| loss.leaf_value(r)),
            },
        };
        observer.on_event(&TrainingEvent::LeafCreated {
            level: node.level,
            samples: store.len(),
            positives: store.positives(),
            negatives: store.negatives(),
            value,
        });
        node.into_leaf(value)
    }

    /// Split `store` into `(left, right)`, keeping residuals aligned.
    /// Rows move as shared handles.
    fn partition(&self, store: SampleStore, split: &SplitInfo) -> Result<(SampleStore, SampleStore)> {
        let mut left = store.empty_like();
        let mut right = store.empty_like();

        let residual = store.residual();
        for (i, (x, &y)) in store.features().iter().zip(store.labels()).enumerate() {
            let side = if x[split.attr_index] <= split.partition_value {
                &mut left
            } else {
                &mut right
            };
            match residual {
                Some(r) => side.append_row_with_residual(x.clone(), y, r[i])?,
                None => side.append_row(x.clone(), y)?,
            }
        }

        Ok((left, right))
    }
}

fn placeholder() -> TreeNode {
    TreeNode::Leaf {
        level: 0,
        value: 0.0,
        samples: 0,
        positives: 0,
        negatives: 0,
    }
}

/// Reserve an arena slot for a non-empty child and queue it.
fn enqueue(
    nodes: &mut Vec<TreeNode>,
    pending: &mut Vec<TrainingNode>,
    parent_level: usize,
    store: SampleStore,
    carried_value: Option<f64>,
) -> Option<NodeIndex> {
    if store.is_empty() {
        return None;
    }
    let slot = nodes.len();
    nodes.push(placeholder());
    pending.push(TrainingNode::child(parent_level, store, carried_value, slot));
    Some(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParamsBuilder;
    use crate::core::observer::{NoopObserver, RecordingObserver};
    use approx::assert_abs_diff_eq;

    fn scenario_store() -> SampleStore {
        SampleStore::from_rows(
            vec![vec![0.1], vec![0.2], vec![0.8], vec![0.9]],
            vec![1.0, 1.0, 0.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_regression_single_split() {
        let params = ParamsBuilder::new()
            .max_level(1)
            .min_samples_in_leave(1)
            .build()
            .unwrap();
        let builder = TreeBuilder::regression(params).unwrap();
        let tree = builder.build(scenario_store(), &mut NoopObserver).unwrap();

        assert_eq!(tree.num_leaves(), 2);
        assert_abs_diff_eq!(tree.predict(&[0.15]).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tree.predict(&[0.85]).unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(tree.leaf_sample_total(), 4);
    }

    #[test]
    fn test_regression_root_leaf_is_label_mean() {
        let params = ParamsBuilder::new().max_level(0).build().unwrap();
        let tree = TreeBuilder::regression(params)
            .unwrap()
            .build(scenario_store(), &mut NoopObserver)
            .unwrap();
        assert_eq!(tree.num_nodes(), 1);
        assert_abs_diff_eq!(tree.predict(&[0.5]).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_classification_purity_stop() {
        let params = ParamsBuilder::new().split_threshold(0.75).build().unwrap();
        let store = SampleStore::from_rows(
            vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]],
            vec![1.0, 1.0, 1.0, 0.0],
        )
        .unwrap();
        let tree = TreeBuilder::classification(params)
            .unwrap()
            .build(store, &mut NoopObserver)
            .unwrap();
        // 3/4 positive reaches the threshold at the root
        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(tree.predict(&[0.0]).unwrap(), 0.75);
    }

    #[test]
    fn test_classification_splits_to_purity() {
        let tree = TreeBuilder::classification(TreeParams::default())
            .unwrap()
            .build(scenario_store(), &mut NoopObserver)
            .unwrap();
        assert_eq!(tree.num_leaves(), 2);
        assert_eq!(tree.predict(&[0.0]).unwrap(), 1.0);
        assert_eq!(tree.predict(&[1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_identical_rows_omit_empty_side() {
        let store = SampleStore::from_rows(vec![vec![1.0]; 4], vec![1.0, 0.0, 1.0, 0.0]).unwrap();
        let params = ParamsBuilder::new().max_level(2).build().unwrap();
        let tree = TreeBuilder::classification(params)
            .unwrap()
            .build(store, &mut NoopObserver)
            .unwrap();

        // every row goes left; the right side is never created
        match tree.root() {
            Some(TreeNode::Split { right, .. }) => assert!(right.is_none()),
            other => panic!("expected split root, got {:?}", other),
        }
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.predict(&[1.0]).unwrap(), 0.5);
        assert!(tree.predict(&[2.0]).is_err());
        assert_eq!(tree.leaf_sample_total(), 4);
    }

    #[test]
    fn test_degenerate_split_forces_leaf() {
        let store = SampleStore::from_rows(vec![vec![]; 4], vec![1.0, 0.0, 1.0, 0.0]).unwrap();
        let mut observer = RecordingObserver::new();
        let tree = TreeBuilder::classification(TreeParams::default())
            .unwrap()
            .build(store, &mut observer)
            .unwrap();

        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(tree.predict(&[]).unwrap(), 0.5);
        assert!(observer
            .events()
            .iter()
            .any(|e| matches!(e, TrainingEvent::DegenerateSplit { level: 0, samples: 4 })));
    }

    #[test]
    fn test_events_match_structure() {
        let params = ParamsBuilder::new()
            .max_level(3)
            .min_samples_in_leave(1)
            .build()
            .unwrap();
        let store = SampleStore::from_rows(
            (0..8).map(|i| vec![i as f64]).collect(),
            vec![0.0, 0.0, 1.0, 1.0, 4.0, 4.0, 9.0, 9.0],
        )
        .unwrap();
        let mut observer = RecordingObserver::new();
        let tree = TreeBuilder::regression(params)
            .unwrap()
            .build(store, &mut observer)
            .unwrap();

        assert_eq!(observer.leaf_count(), tree.num_leaves());
        assert_eq!(observer.split_count(), tree.num_nodes() - tree.num_leaves());
    }

    #[test]
    fn test_max_leaf_number_turns_pending_nodes_into_leaves() {
        let store = SampleStore::from_rows(
            (0..16).map(|i| vec![i as f64]).collect(),
            (0..16).map(|i| i as f64).collect(),
        )
        .unwrap();
        let unbounded = ParamsBuilder::new()
            .max_level(10)
            .min_samples_in_leave(1)
            .build()
            .unwrap();
        let capped = ParamsBuilder::new()
            .max_level(10)
            .min_samples_in_leave(1)
            .max_leaf_number(1)
            .build()
            .unwrap();

        let full = TreeBuilder::regression(unbounded)
            .unwrap()
            .build(store.clone(), &mut NoopObserver)
            .unwrap();
        let tree = TreeBuilder::regression(capped)
            .unwrap()
            .build(store, &mut NoopObserver)
            .unwrap();

        assert_eq!(full.num_leaves(), 16);
        // the right spine is grown to a single row; its pending left
        // siblings (8, 4, 2 and 1 rows) then stop immediately
        assert_eq!(tree.num_leaves(), 5);
        assert_eq!(tree.leaf_sample_total(), 16);
        assert_abs_diff_eq!(tree.predict(&[0.0]).unwrap(), 3.5, epsilon = 1e-12);
        assert_abs_diff_eq!(tree.predict(&[15.0]).unwrap(), 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lad_leaf_is_median_residual() {
        let params = ParamsBuilder::new().max_level(0).build().unwrap();
        let store = SampleStore::from_rows(vec![vec![0.0]; 5], vec![0.0; 5])
            .unwrap()
            .with_residual(vec![3.0, -1.0, 100.0, 2.0, 0.5])
            .unwrap()
            .with_loss(LossKind::Lad);
        let tree = TreeBuilder::regression(params)
            .unwrap()
            .build(store, &mut NoopObserver)
            .unwrap();
        assert_eq!(tree.predict(&[0.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_partition_shares_rows() {
        let store = scenario_store();
        let split = SplitInfo {
            attr_index: 0,
            partition_value: 0.2,
            gain: 1.0,
            side_values: None,
        };
        let rows: Vec<_> = store.features().to_vec();
        let builder = TreeBuilder::classification(TreeParams::default()).unwrap();
        let (left, right) = builder.partition(store, &split).unwrap();
        assert_eq!((left.len(), right.len()), (2, 2));
        assert!(crate::core::types::Row::ptr_eq(&left.features()[0], &rows[0]));
        assert!(crate::core::types::Row::ptr_eq(&right.features()[1], &rows[3]));
    }

    #[test]
    fn test_empty_store_rejected() {
        let builder = TreeBuilder::regression(TreeParams::default()).unwrap();
        assert!(matches!(
            builder.build(SampleStore::new(), &mut NoopObserver),
            Err(DTreeError::EmptyDataset)
        ));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = TreeParams {
            learning_rate: 0.0,
            ..TreeParams::default()
        };
        assert!(TreeBuilder::regression(params).is_err());
    }
}
