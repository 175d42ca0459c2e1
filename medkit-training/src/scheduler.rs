//! Learning rate schedulers, stepped once per epoch.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{TrainingError, TrainingResult};

/// File name of the scheduler state inside a checkpoint directory.
pub const SCHEDULER_NAME: &str = "scheduler.toml";

/// Adjusts the learning rate after each epoch.
pub trait LrScheduler {
    /// Whether [`step`](Self::step) needs the tracked eval metric.
    fn requires_metric(&self) -> bool {
        false
    }

    /// New learning rate given the current one and, when required, the
    /// value of the tracked eval metric.
    fn step(&mut self, learning_rate: f64, metric: Option<f64>) -> f64;

    /// Serialized scheduler state, saved with checkpoints.
    fn state(&self) -> TrainingResult<String>;

    fn save(&self, dir: &Path) -> TrainingResult<()> {
        let path = dir.join(SCHEDULER_NAME);
        fs::write(&path, self.state()?).map_err(|e| TrainingError::io(path, e))
    }
}

fn to_toml<T: Serialize>(state: &T) -> TrainingResult<String> {
    toml::to_string(state).map_err(|e| TrainingError::Config {
        message: e.to_string(),
    })
}

/// Multiply the learning rate by `gamma` every `step_size` epochs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepLr {
    pub step_size: usize,
    pub gamma: f64,
    epoch: usize,
}

impl StepLr {
    pub fn new(step_size: usize, gamma: f64) -> Self {
        Self {
            step_size: step_size.max(1),
            gamma,
            epoch: 0,
        }
    }
}

impl LrScheduler for StepLr {
    fn step(&mut self, learning_rate: f64, _metric: Option<f64>) -> f64 {
        self.epoch += 1;
        if self.epoch % self.step_size == 0 {
            learning_rate * self.gamma
        } else {
            learning_rate
        }
    }

    fn state(&self) -> TrainingResult<String> {
        to_toml(self)
    }
}

/// Multiply the learning rate by `factor` once the tracked metric stopped
/// improving for more than `patience` epochs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReduceLrOnPlateau {
    pub minimize: bool,
    pub factor: f64,
    pub patience: usize,
    pub min_lr: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    best: Option<f64>,
    nb_bad_epochs: usize,
}

impl Default for ReduceLrOnPlateau {
    fn default() -> Self {
        Self {
            minimize: true,
            factor: 0.1,
            patience: 10,
            min_lr: 0.0,
            best: None,
            nb_bad_epochs: 0,
        }
    }
}

impl ReduceLrOnPlateau {
    pub fn new(factor: f64, patience: usize) -> Self {
        Self {
            factor,
            patience,
            ..Self::default()
        }
    }

    pub fn maximizing(mut self) -> Self {
        self.minimize = false;
        self
    }

    pub fn with_min_lr(mut self, min_lr: f64) -> Self {
        self.min_lr = min_lr;
        self
    }

    fn improves(&self, metric: f64) -> bool {
        match self.best {
            None => true,
            Some(best) if self.minimize => metric < best,
            Some(best) => metric > best,
        }
    }
}

impl LrScheduler for ReduceLrOnPlateau {
    fn requires_metric(&self) -> bool {
        true
    }

    fn step(&mut self, learning_rate: f64, metric: Option<f64>) -> f64 {
        let Some(metric) = metric else {
            return learning_rate;
        };

        if self.improves(metric) {
            self.best = Some(metric);
            self.nb_bad_epochs = 0;
            return learning_rate;
        }

        self.nb_bad_epochs += 1;
        if self.nb_bad_epochs > self.patience {
            self.nb_bad_epochs = 0;
            return (learning_rate * self.factor).max(self.min_lr);
        }
        learning_rate
    }

    fn state(&self) -> TrainingResult<String> {
        to_toml(self)
    }
}
