//! Decision tree induction.
//!
//! - [`node`]: training-time and finalized node types
//! - [`tree`]: the trained tree arena and its traversals
//! - [`split`]: split criteria and best-split search
//! - [`builder`]: the work-list induction algorithm
//!
//! ```rust
//! use dtree_gbdt::{NoopObserver, SampleStore, TreeBuilder, TreeParams};
//!
//! let store = SampleStore::from_rows(
//!     vec![vec![0.1], vec![0.2], vec![0.8], vec![0.9]],
//!     vec![1.0, 1.0, 0.0, 0.0],
//! )?;
//! let tree = TreeBuilder::classification(TreeParams::default())?
//!     .build(store, &mut NoopObserver)?;
//! assert_eq!(tree.predict(&[0.15])?, 1.0);
//! # Ok::<(), dtree_gbdt::DTreeError>(())
//! ```

pub mod builder;
pub mod node;
pub mod split;
#[allow(clippy::module_inception)]
pub mod tree;

pub use builder::TreeBuilder;
pub use node::{TrainingNode, TreeNode};
pub use split::{
    candidate_values, entropy, find_best_split, information_gain, InformationGain,
    SplitCriterion, SplitInfo, SplitScore, SquaredError,
};
pub use tree::Tree;
