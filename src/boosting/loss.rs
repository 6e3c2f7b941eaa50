//! Boosting losses.
//!
//! A [`LossKind`] decides four things for the driver and the tree builder:
//! the base value `F0`, the per-row residual stored for a round, the
//! response the squared-error split search fits, and the value of a leaf.
//!
//! | loss | `F0` | residual | response | leaf |
//! |---|---|---|---|---|
//! | `ls` | mean(y) | `y - F` | residual | mean |
//! | `lad` | median(y) | `y - F` | sign(residual) | median residual |
//! | `logistic` | `0.5 ln((1+m)/(1-m))` | `2y / (1 + e^{2yF})` | residual | Newton step |
//!
//! Logistic labels are read as `+1` for label 1 and `-1` otherwise, and `m`
//! is their mean.

use crate::core::constants::LOGISTIC_EPSILON;
use crate::core::error::{DTreeError, Result};
use crate::core::types::{Label, LossKind, Score};
use crate::metrics::{absolute_error, logistic_loss, squared_error};

/// `+1` for label 1, `-1` for anything else.
pub(crate) fn signed_label(y: Label) -> f64 {
    if y == 1.0 {
        1.0
    } else {
        -1.0
    }
}

/// Lower median: the value at sorted position `(n - 1) / 2`.
pub(crate) fn lower_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    let k = (sorted.len() - 1) / 2;
    let (_, median, _) = sorted.select_nth_unstable_by(k, f64::total_cmp);
    Some(*median)
}

impl LossKind {
    /// Initial constant `F0` for the labels.
    pub fn base_value(&self, labels: &[Label]) -> Result<f64> {
        if labels.is_empty() {
            return Err(DTreeError::EmptyDataset);
        }
        let n = labels.len() as f64;
        let value = match self {
            LossKind::Ls => labels.iter().sum::<f64>() / n,
            LossKind::Lad => lower_median(labels).unwrap_or(0.0),
            LossKind::Logistic => {
                let mean = labels.iter().map(|&y| signed_label(y)).sum::<f64>() / n;
                // single-class stores would give an infinite base value
                let m = mean.clamp(-1.0 + LOGISTIC_EPSILON, 1.0 - LOGISTIC_EPSILON);
                0.5 * ((1.0 + m) / (1.0 - m)).ln()
            }
        };
        Ok(value)
    }

    /// Residual stored for a row with label `y` and current score `f`.
    pub fn residual(&self, y: Label, f: Score) -> f64 {
        match self {
            LossKind::Ls | LossKind::Lad => y - f,
            LossKind::Logistic => {
                let y = signed_label(y);
                2.0 * y / (1.0 + (2.0 * y * f).exp())
            }
        }
    }

    /// Response the split search fits for a given residual.
    pub fn response(&self, residual: f64) -> f64 {
        match self {
            LossKind::Ls | LossKind::Logistic => residual,
            LossKind::Lad => {
                if residual >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }

    /// Output value of a leaf holding `residual`; 0 for an empty leaf.
    pub fn leaf_value(&self, residual: &[f64]) -> f64 {
        if residual.is_empty() {
            return 0.0;
        }
        match self {
            LossKind::Ls => residual.iter().sum::<f64>() / residual.len() as f64,
            LossKind::Lad => lower_median(residual).unwrap_or(0.0),
            LossKind::Logistic => {
                let (numerator, denominator) = residual.iter().fold((0.0, 0.0), |(num, den), &r| {
                    let a = r.abs();
                    (num + r, den + a * (2.0 - a))
                });
                if numerator < LOGISTIC_EPSILON && denominator < LOGISTIC_EPSILON {
                    0.0
                } else {
                    numerator / denominator
                }
            }
        }
    }

    /// Mean training loss of `scores` against `labels`.
    pub fn mean_loss(&self, labels: &[Label], scores: &[Score]) -> Result<f64> {
        match self {
            LossKind::Ls => squared_error(labels, scores),
            LossKind::Lad => absolute_error(labels, scores),
            LossKind::Logistic => logistic_loss(labels, scores),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lower_median() {
        assert_eq!(lower_median(&[]), None);
        assert_eq!(lower_median(&[4.0]), Some(4.0));
        assert_eq!(lower_median(&[3.0, 1.0]), Some(1.0));
        assert_eq!(lower_median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(lower_median(&[4.0, 1.0, 3.0, 2.0]), Some(2.0));
    }

    #[test]
    fn test_base_values() {
        let labels = [1.0, 0.0, 1.0, 1.0];
        assert_abs_diff_eq!(LossKind::Ls.base_value(&labels).unwrap(), 0.75, epsilon = 1e-12);
        assert_eq!(LossKind::Lad.base_value(&[10.0, 1.0, 2.0]).unwrap(), 2.0);
        // m = 0.5
        assert_abs_diff_eq!(
            LossKind::Logistic.base_value(&labels).unwrap(),
            0.5 * 3.0f64.ln(),
            epsilon = 1e-12
        );
        assert!(LossKind::Logistic.base_value(&[1.0, 1.0]).unwrap().is_finite());
        assert!(LossKind::Ls.base_value(&[]).is_err());
    }

    #[test]
    fn test_residuals_and_responses() {
        assert_eq!(LossKind::Ls.residual(3.0, 1.0), 2.0);
        assert_eq!(LossKind::Lad.residual(3.0, 5.0), -2.0);
        assert_eq!(LossKind::Lad.response(-2.0), -1.0);
        assert_eq!(LossKind::Lad.response(0.0), 1.0);
        assert_eq!(LossKind::Ls.response(-2.0), -2.0);
        // at F = 0 the logistic residual is the signed label
        assert_abs_diff_eq!(LossKind::Logistic.residual(1.0, 0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(LossKind::Logistic.residual(0.0, 0.0), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_leaf_values() {
        assert_abs_diff_eq!(LossKind::Ls.leaf_value(&[1.0, 2.0, 6.0]), 3.0, epsilon = 1e-12);
        assert_eq!(LossKind::Lad.leaf_value(&[1.0, 2.0, 600.0]), 2.0);
        // |r| = 1 gives a denominator of one per row
        assert_abs_diff_eq!(LossKind::Logistic.leaf_value(&[1.0, 1.0]), 1.0, epsilon = 1e-12);
        assert_eq!(LossKind::Logistic.leaf_value(&[0.0, 0.0]), 0.0);
        assert_eq!(LossKind::Lad.leaf_value(&[]), 0.0);
    }

    #[test]
    fn test_mean_loss_dispatch() {
        let labels = [0.0, 2.0];
        let scores = [1.0, 1.0];
        assert_eq!(LossKind::Ls.mean_loss(&labels, &scores).unwrap(), 1.0);
        assert_eq!(LossKind::Lad.mean_loss(&labels, &scores).unwrap(), 1.0);
        assert!(LossKind::Logistic.mean_loss(&labels, &[0.0]).is_err());
    }
}
