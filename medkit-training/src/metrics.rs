//! Custom metrics computed during training and evaluation.

use std::collections::BTreeMap;

use crate::BatchData;

/// Named metric values, `"loss"` included.
pub type Metrics = BTreeMap<String, f64>;

/// Gathers data batch after batch, then computes metrics once per epoch.
pub trait MetricsComputer {
    /// Extract from a batch the values the metrics need, e.g. references
    /// and predictions.
    fn prepare_batch(&self, model_output: &BatchData, input_batch: &BatchData) -> BatchData;

    /// Compute metrics from the data of every batch of the epoch.
    fn compute(&self, all_data: &BatchData) -> Metrics;
}
