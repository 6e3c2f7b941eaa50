//! Row-oriented sample store used during tree induction.
//!
//! A store is grown one row at a time and never edited afterwards. Rows are
//! reference-counted: splitting a node or deriving a boosting round store
//! clones row handles, never feature values. The parent store is dropped
//! once partitioned.

use crate::core::error::{DTreeError, Result};
use crate::core::observer::TrainingEvent;
use crate::core::types::{Label, LossKind, Row};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Feature matrix, labels and (for regression) residual/response vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleStore {
    x: Vec<Row>,
    y: Vec<Label>,
    residual: Option<Vec<f64>>,
    response: Option<Vec<f64>>,
    loss: LossKind,
    num_features: usize,
    positives: usize,
    negatives: usize,
}

impl SampleStore {
    /// Create an empty store; the first appended row fixes the width.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store whose rows must have `num_features` values.
    pub fn with_num_features(num_features: usize) -> Self {
        SampleStore {
            num_features,
            ..Self::default()
        }
    }

    /// Empty store with this store's width and loss.
    pub(crate) fn empty_like(&self) -> Self {
        SampleStore {
            num_features: self.num_features,
            loss: self.loss,
            ..Self::default()
        }
    }

    /// Build a store from parallel rows and labels.
    pub fn from_rows(x: Vec<Vec<f64>>, y: Vec<Label>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(DTreeError::dimension_mismatch(
                format!("{} labels", x.len()),
                format!("{} labels", y.len()),
            ));
        }

        let mut store = match x.first() {
            Some(row) => Self::with_num_features(row.len()),
            None => Self::new(),
        };
        store.x.reserve(x.len());
        store.y.reserve(y.len());
        for (row, label) in x.into_iter().zip(y) {
            store.append(row, label)?;
        }
        Ok(store)
    }

    /// Append one row. Fails if the width differs from the store's or if
    /// the store carries a residual.
    pub fn append(&mut self, x: Vec<f64>, y: Label) -> Result<()> {
        self.append_row(Row::from(x), y)
    }

    /// Append a shared row.
    pub fn append_row(&mut self, x: Row, y: Label) -> Result<()> {
        if self.residual.is_some() {
            return Err(DTreeError::dimension_mismatch(
                "a residual for every row",
                "row without residual",
            ));
        }
        self.push_row(x, y)
    }

    /// Append one row together with its residual.
    pub fn append_with_residual(&mut self, x: Vec<f64>, y: Label, residual: f64) -> Result<()> {
        self.append_row_with_residual(Row::from(x), y, residual)
    }

    /// Append a shared row together with its residual.
    pub fn append_row_with_residual(&mut self, x: Row, y: Label, residual: f64) -> Result<()> {
        if self.residual.is_none() {
            if !self.is_empty() {
                return Err(DTreeError::dimension_mismatch(
                    "rows without residual",
                    "row with residual",
                ));
            }
            self.residual = Some(Vec::new());
        }
        self.push_row(x, y)?;
        if let Some(r) = self.residual.as_mut() {
            r.push(residual);
        }
        // response is recomputed before the next split search
        self.response = None;
        Ok(())
    }

    fn push_row(&mut self, x: Row, y: Label) -> Result<()> {
        if self.x.is_empty() && self.num_features == 0 {
            self.num_features = x.len();
        } else if x.len() != self.num_features {
            return Err(DTreeError::dimension_mismatch(
                format!("{} features", self.num_features),
                format!("{} features", x.len()),
            ));
        }

        if y == 1.0 {
            self.positives += 1;
        } else {
            self.negatives += 1;
        }
        self.x.push(x);
        self.y.push(y);
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when the store has no rows.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Width of every feature vector.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Rows whose label is exactly 1.
    pub fn positives(&self) -> usize {
        self.positives
    }

    /// Rows whose label is not 1.
    pub fn negatives(&self) -> usize {
        self.negatives
    }

    /// All feature vectors in store order.
    pub fn features(&self) -> &[Row] {
        &self.x
    }

    /// Feature vector of row `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.x[i]
    }

    /// Labels in store order.
    pub fn labels(&self) -> &[Label] {
        &self.y
    }

    /// Residuals, present only for regression stores.
    pub fn residual(&self) -> Option<&[f64]> {
        self.residual.as_deref()
    }

    /// Responses the next split search fits against.
    pub fn response(&self) -> Option<&[f64]> {
        self.response.as_deref()
    }

    /// Install a residual for every row and recompute the response.
    pub fn set_residual(&mut self, residual: Vec<f64>) -> Result<()> {
        if residual.len() != self.len() {
            return Err(DTreeError::dimension_mismatch(
                format!("{} residuals", self.len()),
                format!("{} residuals", residual.len()),
            ));
        }
        self.residual = Some(residual);
        self.refresh_response();
        Ok(())
    }

    /// Loss that maps residuals to responses and leaves to values.
    pub fn loss(&self) -> LossKind {
        self.loss
    }

    /// Switch the loss and recompute the response.
    pub fn with_loss(mut self, loss: LossKind) -> Self {
        self.loss = loss;
        if self.residual.is_some() {
            self.refresh_response();
        }
        self
    }

    /// Recompute the response from the residual through the store's loss.
    pub fn refresh_response(&mut self) {
        let loss = self.loss;
        self.response = self
            .residual
            .as_ref()
            .map(|r| r.iter().map(|&v| loss.response(v)).collect());
    }

    /// Store sharing this store's rows, with `residual` installed.
    ///
    /// Only the row handles, labels and the new residual/response vectors
    /// are allocated.
    pub fn with_residual(&self, residual: Vec<f64>) -> Result<Self> {
        let mut store = SampleStore {
            x: self.x.clone(),
            y: self.y.clone(),
            residual: None,
            response: None,
            loss: self.loss,
            num_features: self.num_features,
            positives: self.positives,
            negatives: self.negatives,
        };
        store.set_residual(residual)?;
        Ok(store)
    }

    /// Mean label, `None` for an empty store.
    pub fn label_mean(&self) -> Option<f64> {
        mean(&self.y)
    }

    /// Mean response, falling back to the labels when no response is set.
    pub fn response_mean(&self) -> Option<f64> {
        mean(self.response().unwrap_or(&self.y))
    }

    /// Export the feature matrix as an `n x m` array.
    pub fn to_array2(&self) -> Result<Array2<f64>> {
        let flat: Vec<f64> = self.x.iter().flat_map(|row| row.iter().copied()).collect();
        Array2::from_shape_vec((self.len(), self.num_features), flat)
            .map_err(|e| DTreeError::dimension_mismatch(format!("{} x {}", self.len(), self.num_features), e.to_string()))
    }

    /// Summary event describing this store.
    pub fn loaded_event(&self) -> TrainingEvent {
        TrainingEvent::SamplesLoaded {
            samples: self.len(),
            positives: self.positives,
            negatives: self.negatives,
            features: self.num_features,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_store() -> SampleStore {
        SampleStore::from_rows(
            vec![vec![0.1, 1.0], vec![0.2, 2.0], vec![0.8, 3.0]],
            vec![1.0, 1.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_append_updates_counts() {
        let store = small_store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.num_features(), 2);
        assert_eq!(store.positives(), 2);
        assert_eq!(store.negatives(), 1);
        assert_eq!(store.positives() + store.negatives(), store.len());
    }

    #[test]
    fn test_append_rejects_width_change() {
        let mut store = small_store();
        let err = store.append(vec![1.0], 0.0).unwrap_err();
        assert!(matches!(err, DTreeError::DimensionMismatch { .. }));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_from_rows_length_mismatch() {
        assert!(SampleStore::from_rows(vec![vec![1.0]], vec![]).is_err());
    }

    #[test]
    fn test_residual_alignment() {
        let mut store = SampleStore::with_num_features(1);
        store.append_with_residual(vec![0.5], 2.0, -0.5).unwrap();
        store.append_with_residual(vec![0.7], 3.0, 0.5).unwrap();

        assert_eq!(store.residual(), Some(&[-0.5, 0.5][..]));
        assert!(store.response().is_none());
        store.refresh_response();
        assert_eq!(store.response(), store.residual());

        // mixing rows with and without residuals is refused
        assert!(store.append(vec![0.9], 1.0).is_err());
    }

    #[test]
    fn test_with_residual_replaces_only_targets() {
        let store = small_store();
        let boosted = store.with_residual(vec![0.3, 0.3, -0.6]).unwrap();
        assert_eq!(boosted.features(), store.features());
        assert_eq!(boosted.labels(), store.labels());
        assert_eq!(boosted.response(), Some(&[0.3, 0.3, -0.6][..]));
        assert!(store.with_residual(vec![0.0]).is_err());
    }

    #[test]
    fn test_derived_stores_share_rows() {
        let store = small_store();
        let boosted = store.with_residual(vec![0.0; 3]).unwrap();
        for (a, b) in store.features().iter().zip(boosted.features()) {
            assert!(Row::ptr_eq(a, b));
        }

        let mut half = store.empty_like();
        half.append_row(store.features()[1].clone(), 1.0).unwrap();
        assert!(Row::ptr_eq(&half.features()[0], &store.features()[1]));
        assert_eq!(half.num_features(), 2);
    }

    #[test]
    fn test_lad_response_is_residual_sign() {
        let store = small_store()
            .with_residual(vec![-2.5, 0.0, 4.0])
            .unwrap()
            .with_loss(LossKind::Lad);
        assert_eq!(store.loss(), LossKind::Lad);
        assert_eq!(store.response(), Some(&[-1.0, 1.0, 1.0][..]));
        assert_eq!(store.residual(), Some(&[-2.5, 0.0, 4.0][..]));
    }

    #[test]
    fn test_means() {
        let store = small_store();
        assert!((store.label_mean().unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(store.response_mean(), store.label_mean());
        assert_eq!(SampleStore::new().label_mean(), None);
    }

    #[test]
    fn test_to_array2() {
        let arr = small_store().to_array2().unwrap();
        assert_eq!(arr.dim(), (3, 2));
        assert_eq!(arr[[2, 1]], 3.0);
    }
}
