//! Hooks into the training loop.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Metrics, TrainerConfig};

/// Which loop a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Train,
    Eval,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Train => "train",
            Phase::Eval => "eval",
        })
    }
}

/// Metrics of one epoch, for both loops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub train: Metrics,
    pub eval: Metrics,
}

/// Events raised by [`Trainer`](crate::Trainer). Every hook does nothing by
/// default.
pub trait TrainerCallback {
    fn on_train_begin(&mut self, _config: &TrainerConfig) {}

    fn on_train_end(&mut self) {}

    fn on_epoch_begin(&mut self, _epoch: usize) {}

    fn on_epoch_end(&mut self, _metrics: &EpochMetrics, _epoch: usize, _epoch_duration: Duration) {}

    fn on_step_begin(&mut self, _step: usize, _nb_batches: usize, _phase: Phase) {}

    fn on_step_end(&mut self, _step: usize, _nb_batches: usize, _phase: Phase) {}

    /// Called before a checkpoint directory is written.
    fn on_save(&mut self, _checkpoint_dir: &Path) {}
}

/// Reports epoch metrics through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPrinterCallback;

fn format_metrics(metrics: &Metrics) -> String {
    metrics
        .iter()
        .map(|(key, value)| format!("{}:{:8.3}", key, value))
        .collect::<Vec<_>>()
        .join("|")
}

impl TrainerCallback for DefaultPrinterCallback {
    fn on_train_begin(&mut self, config: &TrainerConfig) {
        tracing::info!(
            epochs = config.nb_training_epochs,
            batch_size = config.batch_size,
            output_dir = %config.output_dir.display(),
            "training started"
        );
    }

    fn on_epoch_end(&mut self, metrics: &EpochMetrics, epoch: usize, epoch_duration: Duration) {
        tracing::info!("Training metrics : {}", format_metrics(&metrics.train));
        tracing::info!("Evaluation metrics : {}", format_metrics(&metrics.eval));
        tracing::info!(
            "Epoch state: |epoch_id: {:3} | time: {:5.2}s",
            epoch,
            epoch_duration.as_secs_f64()
        );
    }

    fn on_save(&mut self, checkpoint_dir: &Path) {
        tracing::info!(checkpoint = %checkpoint_dir.display(), "saving checkpoint");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metrics() {
        let metrics: Metrics = [("loss".to_string(), 0.5), ("acc".to_string(), 0.75)]
            .into_iter()
            .collect();
        assert_eq!(format_metrics(&metrics), "acc:   0.750|loss:   0.500");
    }
}
