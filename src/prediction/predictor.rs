//! The [`Predict`] trait and its implementations.

use crate::boosting::GbdtModel;
use crate::core::error::Result;
use crate::core::types::Score;
use crate::dataset::SampleStore;
use crate::tree::Tree;
use ndarray::{Array1, ArrayView2, Axis};
use rayon::prelude::*;

/// A trained model that maps a feature vector to a score.
pub trait Predict: Sync {
    /// Score one feature vector.
    fn predict(&self, x: &[f64]) -> Result<Score>;

    /// Score every row of `store`, in store order.
    fn predict_rows(&self, store: &SampleStore) -> Result<Vec<Score>> {
        store.features().iter().map(|x| self.predict(x)).collect()
    }

    /// Score every row of an `n x m` matrix on the rayon pool.
    ///
    /// Fails with the first traversal error encountered.
    fn predict_batch(&self, features: ArrayView2<'_, f64>) -> Result<Array1<Score>> {
        let scores: Vec<Score> = features
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| match row.as_slice() {
                Some(x) => self.predict(x),
                None => self.predict(&row.to_vec()),
            })
            .collect::<Result<Vec<Score>>>()?;
        Ok(Array1::from_vec(scores))
    }
}

impl Predict for Tree {
    fn predict(&self, x: &[f64]) -> Result<Score> {
        Tree::predict(self, x)
    }
}

impl Predict for GbdtModel {
    fn predict(&self, x: &[f64]) -> Result<Score> {
        GbdtModel::predict(self, x)
    }
}
