//! Evaluation metrics.
//!
//! - [`squared_error`]: mean squared error, the boosting training loss
//! - [`absolute_error`]: mean absolute error
//! - [`logistic_loss`]: mean binomial deviance of raw scores
//! - [`accuracy`]: fraction of thresholded probabilities matching {0, 1}
//!   labels
//!
//! Every metric rejects inputs of different lengths with
//! `DimensionMismatch` and empty inputs with `EmptyDataset`.

use crate::core::error::{DTreeError, Result};
use crate::core::types::{Label, Score};
use std::fmt;

fn check_lengths(labels: &[Label], predictions: &[Score]) -> Result<()> {
    if labels.len() != predictions.len() {
        return Err(DTreeError::dimension_mismatch(
            format!("{} predictions", labels.len()),
            format!("{} predictions", predictions.len()),
        ));
    }
    if labels.is_empty() {
        return Err(DTreeError::EmptyDataset);
    }
    Ok(())
}

/// Mean of `(label - prediction)^2`.
pub fn squared_error(labels: &[Label], predictions: &[Score]) -> Result<f64> {
    check_lengths(labels, predictions)?;
    let sum: f64 = labels
        .iter()
        .zip(predictions)
        .map(|(&y, &f)| (y - f).powi(2))
        .sum();
    Ok(sum / labels.len() as f64)
}

/// Mean of `|label - prediction|`.
pub fn absolute_error(labels: &[Label], predictions: &[Score]) -> Result<f64> {
    check_lengths(labels, predictions)?;
    let sum: f64 = labels
        .iter()
        .zip(predictions)
        .map(|(&y, &f)| (y - f).abs())
        .sum();
    Ok(sum / labels.len() as f64)
}

/// Mean of `ln(1 + exp(-2 y F))` with labels read as `+1` (label 1) or
/// `-1` (anything else).
pub fn logistic_loss(labels: &[Label], scores: &[Score]) -> Result<f64> {
    check_lengths(labels, scores)?;
    let sum: f64 = labels
        .iter()
        .zip(scores)
        .map(|(&y, &f)| {
            let y = if y == 1.0 { 1.0 } else { -1.0 };
            softplus(-2.0 * y * f)
        })
        .sum();
    Ok(sum / labels.len() as f64)
}

/// `ln(1 + e^z)` without overflow for large `z`.
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

/// Fraction of rows where `probability >= threshold` agrees with
/// `label == 1`.
pub fn accuracy(labels: &[Label], probabilities: &[Score], threshold: f64) -> Result<f64> {
    check_lengths(labels, probabilities)?;
    let correct = labels
        .iter()
        .zip(probabilities)
        .filter(|&(&y, &p)| (p >= threshold) == (y == 1.0))
        .count();
    Ok(correct as f64 / labels.len() as f64)
}

/// Squared and absolute error of one prediction run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorSummary {
    /// Rows evaluated
    pub samples: usize,
    /// Mean squared error
    pub mse: f64,
    /// Mean absolute error
    pub mae: f64,
}

impl ErrorSummary {
    /// Evaluate `predictions` against `labels`.
    pub fn evaluate(labels: &[Label], predictions: &[Score]) -> Result<Self> {
        Ok(ErrorSummary {
            samples: labels.len(),
            mse: squared_error(labels, predictions)?,
            mae: absolute_error(labels, predictions)?,
        })
    }

    /// Log the summary at info level.
    pub fn log(&self) {
        log::info!("{}", self);
    }
}

impl fmt::Display for ErrorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} samples: ls={:.6} lad={:.6}",
            self.samples, self.mse, self.mae
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_squared_and_absolute_error() {
        let labels = [1.0, 2.0, 3.0];
        let predictions = [1.5, 2.0, 2.0];
        assert_abs_diff_eq!(squared_error(&labels, &predictions).unwrap(), 1.25 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(absolute_error(&labels, &predictions).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_accuracy() {
        let labels = [1.0, 0.0, 1.0, 0.0];
        let probabilities = [0.9, 0.2, 0.4, 0.5];
        assert_abs_diff_eq!(accuracy(&labels, &probabilities, 0.5).unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(accuracy(&labels, &probabilities, 0.3).unwrap(), 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(accuracy(&labels, &probabilities, 0.1).unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(accuracy(&labels, &probabilities, 0.6).unwrap(), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_logistic_loss() {
        // F = 0 costs ln 2 per row whatever the label
        let loss = logistic_loss(&[1.0, 0.0], &[0.0, 0.0]).unwrap();
        assert_abs_diff_eq!(loss, 2.0f64.ln(), epsilon = 1e-12);

        let confident = logistic_loss(&[1.0, 0.0], &[5.0, -5.0]).unwrap();
        let wrong = logistic_loss(&[1.0, 0.0], &[-5.0, 5.0]).unwrap();
        assert!(confident < 1e-4);
        assert_abs_diff_eq!(wrong, 10.0, epsilon = 1e-3);
        assert!(logistic_loss(&[1.0], &[1000.0]).unwrap().is_finite());
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            squared_error(&[1.0], &[1.0, 2.0]),
            Err(DTreeError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            absolute_error(&[], &[]),
            Err(DTreeError::EmptyDataset)
        ));
    }

    #[test]
    fn test_summary_display() {
        let summary = ErrorSummary::evaluate(&[0.0, 2.0], &[1.0, 1.0]).unwrap();
        assert_eq!(summary.samples, 2);
        assert_eq!(summary.mse, 1.0);
        assert_eq!(summary.mae, 1.0);
        assert_eq!(summary.to_string(), "2 samples: ls=1.000000 lad=1.000000");
    }
}
