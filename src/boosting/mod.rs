//! Gradient boosting over regression trees.
//!
//! [`GBDT`] fits `tree_number` regression trees in sequence. Round `i`
//! trains on the residual of the ensemble built so far. With the default
//! `ls` loss the residual is `y - F(x)` and `F` starts at the label mean;
//! the [`loss`] module lists the alternatives. Each finished tree is shrunk
//! by the learning rate before it joins the ensemble.

pub mod ensemble;
pub mod loss;

pub use ensemble::{EnsembleStatistics, GbdtModel, TrainingHistory};

use crate::config::TreeParams;
use crate::core::error::Result;
use crate::core::observer::{TrainingEvent, TrainingObserver};
use crate::dataset::SampleStore;
use crate::tree::TreeBuilder;

/// Gradient Boosting Decision Tree trainer
#[derive(Debug, Clone)]
pub struct GBDT {
    params: TreeParams,
    builder: TreeBuilder,
}

impl GBDT {
    /// Create a trainer; fails if `params` does not validate.
    pub fn new(params: TreeParams) -> Result<Self> {
        let builder = TreeBuilder::regression(params.clone())?;
        Ok(GBDT { params, builder })
    }

    /// Parameters in use.
    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Train an ensemble on `store`'s labels with the configured loss.
    pub fn train(
        &self,
        store: &SampleStore,
        observer: &mut dyn TrainingObserver,
    ) -> Result<GbdtModel> {
        let loss = self.params.loss;
        let labels = store.labels();
        let base_value = loss.base_value(labels)?;
        let rate = self.params.learning_rate;

        log::info!(
            "boosting {} trees over {} samples, {} loss, base value {:.6}",
            self.params.tree_number,
            store.len(),
            loss,
            base_value
        );

        let mut predictions = vec![base_value; store.len()];
        let mut trees = Vec::with_capacity(self.params.tree_number);
        let mut history = TrainingHistory::default();

        for round in 0..self.params.tree_number {
            observer.on_event(&TrainingEvent::RoundStarted { round });

            let residual: Vec<f64> = labels
                .iter()
                .zip(&predictions)
                .map(|(&y, &f)| loss.residual(y, f))
                .collect();
            let round_store = store.with_residual(residual)?.with_loss(loss);

            let mut tree = self.builder.build(round_store, observer)?;
            if rate != 1.0 {
                tree.shrink(rate);
            }

            for (f, x) in predictions.iter_mut().zip(store.features()) {
                *f += tree.predict(x)?;
            }
            let round_loss = loss.mean_loss(labels, &predictions)?;
            history.losses.push(round_loss);

            observer.on_event(&TrainingEvent::RoundFinished {
                round,
                loss: round_loss,
                leaves: tree.num_leaves(),
            });
            trees.push(tree);
        }

        Ok(GbdtModel::new(base_value, trees, history).with_loss(loss))
    }
}
