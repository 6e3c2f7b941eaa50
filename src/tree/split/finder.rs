//! Best-split search over all attributes.

use crate::config::TreeParams;
use crate::core::error::{DTreeError, Result};
use crate::core::types::FeatureIndex;
use crate::dataset::SampleStore;
use crate::tree::split::criterion::SplitCriterion;
use rayon::prelude::*;

/// The winning split of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitInfo {
    /// Attribute tested
    pub attr_index: FeatureIndex,
    /// Rows with `x[attr_index] <= partition_value` go left
    pub partition_value: f64,
    /// Criterion score
    pub gain: f64,
    /// Per-side output values, regression only
    pub side_values: Option<(f64, f64)>,
}

/// Candidate thresholds for `attr_index`.
///
/// Takes the values of the first `min(n, max_attr_try_time)` rows in store
/// order, deduplicated and sorted ascending.
pub fn candidate_values(
    store: &SampleStore,
    attr_index: FeatureIndex,
    max_attr_try_time: usize,
) -> Vec<f64> {
    let take = store.len().min(max_attr_try_time);
    let mut values: Vec<f64> = store.features()[..take]
        .iter()
        .map(|row| row[attr_index])
        .collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

fn best_for_attribute<C: SplitCriterion + ?Sized>(
    store: &SampleStore,
    criterion: &C,
    attr_index: FeatureIndex,
    max_attr_try_time: usize,
) -> Option<SplitInfo> {
    let mut best: Option<SplitInfo> = None;
    let mut best_gain = criterion.initial_gain();

    for value in candidate_values(store, attr_index, max_attr_try_time) {
        let score = criterion.score(store, attr_index, value);
        if score.gain > best_gain {
            best_gain = score.gain;
            best = Some(SplitInfo {
                attr_index,
                partition_value: value,
                gain: score.gain,
                side_values: score.side_values,
            });
        }
    }

    best
}

/// Find the best split of the rows in `store`.
///
/// Candidates are compared with strict `>`: among equal gains the lowest
/// attribute index and, within it, the lowest threshold wins. When
/// `params.parallel_split_search` is set, attributes are scored on the
/// rayon pool and reduced in attribute order, giving the same result as the
/// serial scan.
///
/// Returns `DegenerateSplit` when no candidate beats the criterion's
/// initial gain.
pub fn find_best_split<C: SplitCriterion + ?Sized>(
    store: &SampleStore,
    criterion: &C,
    params: &TreeParams,
    level: usize,
) -> Result<SplitInfo> {
    let attributes = criterion.attribute_range(store);
    let tries = params.max_attr_try_time;

    let per_attribute: Vec<Option<SplitInfo>> = if params.parallel_split_search {
        attributes
            .into_par_iter()
            .map(|attr| best_for_attribute(store, criterion, attr, tries))
            .collect()
    } else {
        attributes
            .map(|attr| best_for_attribute(store, criterion, attr, tries))
            .collect()
    };

    let mut best: Option<SplitInfo> = None;
    let mut best_gain = criterion.initial_gain();
    for candidate in per_attribute.into_iter().flatten() {
        if candidate.gain > best_gain {
            best_gain = candidate.gain;
            best = Some(candidate);
        }
    }

    best.ok_or_else(|| DTreeError::degenerate_split(level, store.len()))
}
