//! Structured training events.
//!
//! The tree builder and the boosting driver report progress as
//! [`TrainingEvent`] records handed to a [`TrainingObserver`]. Nothing in the
//! training path prints; callers choose whether events are logged, recorded
//! or dropped.

use crate::core::types::FeatureIndex;
use serde::{Deserialize, Serialize};

/// A single progress record emitted during loading or training.
#[deny(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrainingEvent {
    /// A sample file was loaded.
    SamplesLoaded {
        /// Rows read
        samples: usize,
        /// Rows labeled 1
        positives: usize,
        /// Rows labeled 0
        negatives: usize,
        /// Feature count per row
        features: usize,
    },
    /// A node was split.
    NodeSplit {
        /// Depth of the split node; the root is level 0
        level: usize,
        /// Gain of the chosen split
        gain: f64,
        /// Attribute tested
        attr_index: FeatureIndex,
        /// Threshold; rows with `x[attr_index] <= partition_value` go left
        partition_value: f64,
        /// Rows sent left
        left: usize,
        /// Rows sent right
        right: usize,
    },
    /// A node became a leaf.
    LeafCreated {
        /// Depth of the leaf
        level: usize,
        /// Rows reaching the leaf
        samples: usize,
        /// Rows labeled 1
        positives: usize,
        /// Rows labeled 0
        negatives: usize,
        /// Output value
        value: f64,
    },
    /// The split search found nothing better than its sentinel; the node
    /// was forced to a leaf.
    DegenerateSplit {
        /// Depth of the node
        level: usize,
        /// Rows held by the node
        samples: usize,
    },
    /// A boosting round is about to train its tree.
    RoundStarted {
        /// 0-based round index
        round: usize,
    },
    /// A boosting round finished; `loss` is the mean training loss of the
    /// ensemble including this round's tree.
    RoundFinished {
        /// 0-based round index
        round: usize,
        /// Mean training loss after the round
        loss: f64,
        /// Leaves in this round's tree
        leaves: usize,
    },
}

/// Receiver of [`TrainingEvent`]s.
pub trait TrainingObserver {
    /// Handle one event.
    fn on_event(&mut self, event: &TrainingEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl TrainingObserver for LogObserver {
    fn on_event(&mut self, event: &TrainingEvent) {
        match *event {
            TrainingEvent::SamplesLoaded {
                samples,
                positives,
                negatives,
                features,
            } => log::info!(
                "loaded {} samples ({} pos, {} neg), {} features",
                samples,
                positives,
                negatives,
                features
            ),
            TrainingEvent::NodeSplit {
                level,
                gain,
                attr_index,
                partition_value,
                left,
                right,
            } => log::debug!(
                "split level={} gain={:.6} attr_index={} partition_value={} left/right={}/{}",
                level,
                gain,
                attr_index,
                partition_value,
                left,
                right
            ),
            TrainingEvent::LeafCreated {
                level,
                samples,
                positives,
                negatives,
                value,
            } => log::debug!(
                "leaf level={} samples={} pos/neg={}/{} value={:.6}",
                level,
                samples,
                positives,
                negatives,
                value
            ),
            TrainingEvent::DegenerateSplit { level, samples } => log::warn!(
                "no usable split at level {} over {} samples, forcing leaf",
                level,
                samples
            ),
            TrainingEvent::RoundStarted { round } => log::debug!("training tree #{}", round),
            TrainingEvent::RoundFinished {
                round,
                loss,
                leaves,
            } => log::info!("tree #{} done: {} leaves, training loss {:.6}", round, leaves, loss),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TrainingObserver for NoopObserver {
    fn on_event(&mut self, _event: &TrainingEvent) {}
}

/// Keeps every event in arrival order.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Vec<TrainingEvent>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far.
    pub fn events(&self) -> &[TrainingEvent] {
        &self.events
    }

    /// Number of `NodeSplit` events received.
    pub fn split_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TrainingEvent::NodeSplit { .. }))
            .count()
    }

    /// Number of `LeafCreated` events received.
    pub fn leaf_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TrainingEvent::LeafCreated { .. }))
            .count()
    }

    /// Losses carried by `RoundFinished` events, in round order.
    pub fn round_losses(&self) -> Vec<f64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TrainingEvent::RoundFinished { loss, .. } => Some(*loss),
                _ => None,
            })
            .collect()
    }
}

impl TrainingObserver for RecordingObserver {
    fn on_event(&mut self, event: &TrainingEvent) {
        self.events.push(event.clone());
    }
}

impl<T: TrainingObserver + ?Sized> TrainingObserver for &mut T {
    fn on_event(&mut self, event: &TrainingEvent) {
        (**self).on_event(event);
    }
}
