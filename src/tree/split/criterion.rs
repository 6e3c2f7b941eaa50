//! Split criteria.

use crate::core::constants::{INFORMATION_GAIN_SENTINEL, SQUARED_ERROR_SENTINEL};
use crate::core::types::FeatureIndex;
use crate::dataset::SampleStore;
use std::ops::Range;

/// Score of one candidate split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitScore {
    /// Higher is better
    pub gain: f64,
    /// Per-side output values `(left, right)` when the criterion computes them
    pub side_values: Option<(f64, f64)>,
}

/// Scoring rule used to compare candidate splits.
///
/// Implementations are pure: scoring reads the store and nothing else, so
/// attributes can be scored concurrently.
pub trait SplitCriterion: Send + Sync {
    /// Score the split `x[attr_index] <= partition_value` over `store`.
    fn score(&self, store: &SampleStore, attr_index: FeatureIndex, partition_value: f64)
        -> SplitScore;

    /// Gain every real candidate must strictly beat.
    fn initial_gain(&self) -> f64;

    /// Gain of leaving the node unsplit, used to report split improvement.
    fn unsplit_gain(&self, _store: &SampleStore) -> f64 {
        0.0
    }

    /// Attribute indices searched.
    fn attribute_range(&self, store: &SampleStore) -> Range<FeatureIndex> {
        0..store.num_features()
    }

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Binary entropy of a set with the given class counts, in bits.
///
/// Empty and pure sets have entropy 0.
pub fn entropy(positives: usize, negatives: usize) -> f64 {
    if positives == 0 || negatives == 0 {
        return 0.0;
    }
    let n = (positives + negatives) as f64;
    let p = positives as f64 / n;
    let q = negatives as f64 / n;
    -p * p.log2() - q * q.log2()
}

/// Parent entropy minus the size-weighted child entropies.
///
/// Each argument is a `(positives, negatives)` pair.
pub fn information_gain(
    parent: (usize, usize),
    left: (usize, usize),
    right: (usize, usize),
) -> f64 {
    let n = (parent.0 + parent.1) as f64;
    if n == 0.0 {
        return 0.0;
    }
    let n_left = (left.0 + left.1) as f64;
    let n_right = (right.0 + right.1) as f64;
    entropy(parent.0, parent.1)
        - n_left / n * entropy(left.0, left.1)
        - n_right / n * entropy(right.0, right.1)
}

/// Information gain over {0, 1} labels (classification).
#[derive(Debug, Default, Clone, Copy)]
pub struct InformationGain;

impl SplitCriterion for InformationGain {
    fn score(&self, store: &SampleStore, attr_index: FeatureIndex, partition_value: f64) -> SplitScore {
        let mut left = (0usize, 0usize);
        let mut right = (0usize, 0usize);
        for (row, &label) in store.features().iter().zip(store.labels()) {
            let side = if row[attr_index] <= partition_value {
                &mut left
            } else {
                &mut right
            };
            if label == 1.0 {
                side.0 += 1;
            } else {
                side.1 += 1;
            }
        }

        SplitScore {
            gain: information_gain((store.positives(), store.negatives()), left, right),
            side_values: None,
        }
    }

    fn initial_gain(&self) -> f64 {
        INFORMATION_GAIN_SENTINEL
    }

    fn name(&self) -> &'static str {
        "information_gain"
    }
}

/// Negated squared error around the side means of the response
/// (regression).
#[derive(Debug, Default, Clone, Copy)]
pub struct SquaredError;

impl SquaredError {
    fn response(store: &SampleStore) -> &[f64] {
        store.response().unwrap_or_else(|| store.labels())
    }
}

impl SplitCriterion for SquaredError {
    fn score(&self, store: &SampleStore, attr_index: FeatureIndex, partition_value: f64) -> SplitScore {
        let response = Self::response(store);
        let rows = store.features();

        let (mut left_sum, mut left_n, mut right_sum, mut right_n) = (0.0, 0usize, 0.0, 0usize);
        for (row, &r) in rows.iter().zip(response) {
            if row[attr_index] <= partition_value {
                left_sum += r;
                left_n += 1;
            } else {
                right_sum += r;
                right_n += 1;
            }
        }
        let left_mean = if left_n > 0 { left_sum / left_n as f64 } else { 0.0 };
        let right_mean = if right_n > 0 { right_sum / right_n as f64 } else { 0.0 };

        let loss: f64 = rows
            .iter()
            .zip(response)
            .map(|(row, &r)| {
                let mean = if row[attr_index] <= partition_value {
                    left_mean
                } else {
                    right_mean
                };
                (r - mean) * (r - mean)
            })
            .sum();

        SplitScore {
            gain: -loss,
            side_values: Some((left_mean, right_mean)),
        }
    }

    fn initial_gain(&self) -> f64 {
        SQUARED_ERROR_SENTINEL
    }

    fn unsplit_gain(&self, store: &SampleStore) -> f64 {
        let response = Self::response(store);
        if response.is_empty() {
            return 0.0;
        }
        let mean = response.iter().sum::<f64>() / response.len() as f64;
        -response.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>()
    }

    fn name(&self) -> &'static str {
        "squared_error"
    }
}
